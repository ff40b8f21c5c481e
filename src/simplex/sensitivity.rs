use rayon::prelude::{IntoParallelIterator, ParallelIterator};

use super::{SimplexTable, Solution, EPS};

/// Post-optimal analysis of an optimal tableau: one dual value per
/// constraint, plus the verdict on each requested right-hand-side variation.
///
/// Variations are judged one at a time, holding every other bound fixed. A
/// variation is viable while the current basis stays feasible under it; the
/// predicted objective then follows the linear relation
/// `optimal_value + shadow_price * variation` rather than a re-solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityReport {
    pub shadow_prices: Vec<f64>,
    pub variation_viable: Vec<bool>,
    pub new_optimal_values: Vec<f64>,
}

impl SensitivityReport {
    pub fn analyze(
        table: &SimplexTable,
        solution: &Solution,
        requested_variations: &[f64],
    ) -> Self {
        let n_constraints = table.flipped.len();
        debug_assert_eq!(requested_variations.len(), n_constraints);

        let per_constraint = (0..n_constraints)
            .into_par_iter()
            .map(|i| {
                let unit_column = table.unit_columns[i];
                // The unit column stores the basis inverse applied to this
                // row's identity vector, so its reduced cost carries the dual
                // value in the finite component.
                let row_sign = if table.flipped[i] { -1. } else { 1. };
                let sense_sign = if table.is_minimization() { -1. } else { 1. };
                let shadow_price =
                    table.column_estimation(unit_column).small_part() * row_sign * sense_sign;

                let variation = requested_variations[i];
                let shift = variation * row_sign;
                let viable = table
                    .rhs
                    .iter()
                    .zip(table.tableau.column(unit_column).iter())
                    .all(|(basic_value, unit_el)| basic_value + shift * unit_el >= -EPS);
                let new_optimal_value = if viable {
                    solution.objective_value + shadow_price * variation
                } else {
                    0.
                };
                log::debug!(
                    "Constraint {i}: shadow price {shadow_price}, \
                     variation {variation} viable: {viable}"
                );
                (shadow_price, viable, new_optimal_value)
            })
            .collect::<Vec<_>>();

        let mut report = Self {
            shadow_prices: Vec::with_capacity(n_constraints),
            variation_viable: Vec::with_capacity(n_constraints),
            new_optimal_values: Vec::with_capacity(n_constraints),
        };
        for (shadow_price, viable, new_optimal_value) in per_constraint {
            report.shadow_prices.push(shadow_price);
            report.variation_viable.push(viable);
            report.new_optimal_values.push(new_optimal_value);
        }
        report
    }
}
