use nalgebra::{DMatrix, DVector, RowDVector};
use num_traits::Zero;
use rayon::prelude::{IntoParallelIterator, ParallelIterator};

use crate::dbg_display;

use super::big_m::BigM;
use super::{Problem, Solution, SolveError, SolveResult, EPS};

#[derive(Debug, Clone, PartialEq)]
pub struct SimplexTable {
    n_decision: usize,
    minimization: bool,
    pub(crate) flipped: Vec<bool>,
    /// Column that held the identity vector of each row at standardization
    /// time. Pivoting never rewrites history, so at termination column i still
    /// carries the basis inverse applied to the i-th unit vector.
    pub(crate) unit_columns: DVector<usize>,
    /// Indices of basis vectors
    pub(crate) basis: DVector<usize>,
    /// i_max x j_max table of coefficients from constraints
    pub(crate) tableau: DMatrix<f64>,
    pub(crate) rhs: DVector<f64>,
    coefficients: RowDVector<BigM>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    Pivoted,
    Optimal,
}

impl SimplexTable {
    pub(crate) fn new(problem: Problem) -> Self {
        let Problem {
            objective,
            constraints,
            rhs,
            basis,
            n_decision,
            minimization,
            flipped,
        } = problem;
        Self {
            n_decision,
            minimization,
            flipped,
            unit_columns: basis.clone(),
            basis,
            tableau: constraints,
            rhs,
            coefficients: objective,
        }
    }

    pub(crate) fn is_minimization(&self) -> bool {
        self.minimization
    }

    /// Pivot count after which entering-column selection falls back to
    /// Bland's lowest-index rule.
    pub(crate) fn pivot_budget(&self) -> usize {
        2 * (self.tableau.nrows() + self.tableau.ncols())
    }

    pub fn function_estimation(&self) -> BigM {
        dbg_display!(self
            .basis
            .iter()
            .enumerate()
            .fold(BigM::zero(), |acc, (row, basic)| {
                acc + self.coefficients[*basic] * self.rhs[row]
            }))
    }

    /// Reduced cost of a column against the current basis.
    pub(crate) fn column_estimation(&self, index: usize) -> BigM {
        self.basis
            .iter()
            .enumerate()
            .fold(BigM::zero(), |acc, (row, basic)| {
                acc + self.coefficients[*basic] * self.tableau[(row, index)]
            })
            - self.coefficients[index]
    }

    pub(crate) fn step(&mut self, bland: bool) -> SolveResult<StepOutcome> {
        log::debug!("Tableau:{}", self.tableau);
        let pivot_col = if bland {
            (0..self.tableau.ncols()).find(|j| self.column_estimation(*j).is_negative(EPS))
        } else {
            (0..self.tableau.ncols())
                .map(|j| (j, self.column_estimation(j)))
                .filter(|(_, estimation)| estimation.is_negative(EPS))
                .min_by(|(_, es1), (_, es2)| es1.total_cmp(es2))
                .map(|(j, _)| j)
        };
        log::info!("Pivot column: {pivot_col:?}");

        let Some(pivot_col) = pivot_col else {
            if self.holds_artificial_above_tolerance() {
                log::info!("An artificial variable survived at a positive level");
                return Err(SolveError::Infeasible);
            }
            log::info!("Optimal solution was found");
            return Ok(StepOutcome::Optimal);
        };

        // Minimum-ratio test; ratio ties break toward the smallest basic
        // index so degenerate tableaus cannot cycle.
        let mut leaving: Option<(usize, f64)> = None;
        for (row, pivot_col_el) in self.tableau.column(pivot_col).iter().enumerate() {
            if *pivot_col_el <= EPS {
                continue;
            }
            let ratio = self.rhs[row] / pivot_col_el;
            leaving = match leaving {
                None => Some((row, ratio)),
                Some((_, best_ratio)) if ratio < best_ratio - EPS => Some((row, ratio)),
                Some((best_row, best_ratio))
                    if (ratio - best_ratio).abs() <= EPS
                        && self.basis[row] < self.basis[best_row] =>
                {
                    Some((row, ratio))
                }
                best => best,
            };
        }
        let Some((pivot_row, _)) = leaving else {
            // An unbounded ray proves nothing while feasibility has not been
            // attained yet.
            return Err(if self.holds_artificial_above_tolerance() {
                SolveError::Infeasible
            } else {
                SolveError::Unbounded
            });
        };
        log::info!("Pivot row: {pivot_row}");

        let pivot_el = self.tableau[(pivot_row, pivot_col)];
        log::info!("Pivot element: {pivot_el}");

        // divide all elements in a row by pivot element
        self.rhs[pivot_row] /= pivot_el;
        self.tableau.row_mut(pivot_row).apply(|el| *el /= pivot_el);

        // subtract pivot row from other rows till all of elements in pivot
        // column except of pivot element are zero
        let pivot_row_els = self.tableau.row(pivot_row).into_owned();
        let pivot_rhs = self.rhs[pivot_row];
        for row in (0..self.tableau.nrows()).filter(|row| row != &pivot_row) {
            let multiplier = self.tableau[(row, pivot_col)];
            if multiplier == 0. {
                continue;
            }
            self.rhs[row] -= pivot_rhs * multiplier;
            self.tableau
                .row_mut(row)
                .zip_apply(&pivot_row_els, |tableau_row_el, pivot_row_el| {
                    *tableau_row_el -= pivot_row_el * multiplier
                });
        }

        self.basis[pivot_row] = pivot_col;

        Ok(StepOutcome::Pivoted)
    }

    fn holds_artificial_above_tolerance(&self) -> bool {
        let artificial_start = self.n_decision + self.tableau.nrows();
        self.basis
            .iter()
            .enumerate()
            .any(|(row, basic)| *basic >= artificial_start && self.rhs[row] > EPS)
    }

    /// Decision-variable values and the objective value in the caller's
    /// original sense. Slack and artificial levels are dropped.
    pub fn solution(&self) -> SolveResult<Solution> {
        let variables = DVector::from_vec(
            (0..self.n_decision)
                .into_par_iter()
                .map(|i| {
                    self.basis
                        .iter()
                        .enumerate()
                        .find_map(|(row, basic)| (*basic == i).then_some(row))
                        .map_or(0., |row| self.rhs[row])
                })
                .collect(),
        );
        let function_value: f64 = match self.function_estimation().try_into() {
            Ok(val) => val,
            Err(err_msg) => {
                log::error!("{err_msg}");
                return Err(SolveError::Infeasible);
            }
        };
        Ok(Solution {
            variables,
            objective_value: if self.minimization {
                -function_value
            } else {
                function_value
            },
        })
    }
}
