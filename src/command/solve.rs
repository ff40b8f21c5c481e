use nalgebra::RowDVector;
use serde::{Deserialize, Serialize};

use crate::ensure_eq;
use crate::simplex::{self, SensitivityReport, SolveError, SolveResult};

/// One linear-programming request, field names as the form client posts them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimplexInput {
    pub maximize: bool,
    pub objective: Vec<f64>,
    pub lhs_ineq: Vec<Vec<f64>>,
    pub rhs_ineq: Vec<f64>,
    pub desired_variations: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplexOutput {
    pub status: i32,
    pub message: String,
    pub optimal_value: f64,
    pub solution: Vec<f64>,
    pub shadow_prices: Vec<f64>,
    pub variation_viable: Vec<bool>,
    pub new_optimal_values: Vec<f64>,
}

/// Stable wire codes for [`SimplexOutput::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Status {
    /// An optimal solution was found.
    Success = 1,
    /// The feasible region is empty.
    Infeasible = 2,
    /// The objective grows without bound over the feasible region.
    Unbounded = 3,
    /// The request dimensions are malformed.
    InvalidInput = 4,
}

impl Status {
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<&SolveError> for Status {
    fn from(error: &SolveError) -> Self {
        match error {
            SolveError::Infeasible => Self::Infeasible,
            SolveError::Unbounded => Self::Unbounded,
            SolveError::InvalidInput(_) => Self::InvalidInput,
        }
    }
}

/// Solves one request end to end: standardize, pivot to a verdict, analyze
/// the optimal tableau, and map everything back onto the wire contract.
///
/// Every failure becomes a response as well: numeric fields are zero-filled
/// at the contract lengths and `message` carries the verdict.
pub fn solve(input: SimplexInput) -> SimplexOutput {
    log::info!("Received input: {input:?}");
    let n_variables = input.objective.len();
    let n_constraints = input.lhs_ineq.len();

    match try_solve(input) {
        Ok(output) => output,
        Err(error) => {
            log::warn!("{error}");
            SimplexOutput {
                status: Status::from(&error).code(),
                message: error.to_string(),
                optimal_value: 0.,
                solution: vec![0.; n_variables],
                shadow_prices: vec![0.; n_constraints],
                variation_viable: vec![false; n_constraints],
                new_optimal_values: vec![0.; n_constraints],
            }
        }
    }
}

fn try_solve(input: SimplexInput) -> SolveResult<SimplexOutput> {
    let SimplexInput {
        maximize,
        objective,
        lhs_ineq,
        rhs_ineq,
        desired_variations,
    } = input;
    ensure_eq!(lhs_ineq.len(), rhs_ineq.len());
    ensure_eq!(lhs_ineq.len(), desired_variations.len());

    let problem = simplex::Problem::new(
        simplex::ObjectiveFunction::new(RowDVector::from_vec(objective), !maximize),
        lhs_ineq
            .into_iter()
            .zip(rhs_ineq)
            .map(|(coefficients, rhs)| {
                simplex::Constraint::new(RowDVector::from_vec(coefficients), rhs)
            })
            .collect(),
    )?;
    log::info!("Problem formed: {problem}");

    let table = problem.solve()?;
    let solution = table.solution()?;
    log::info!("Solution:\n{solution}");
    let report = SensitivityReport::analyze(&table, &solution, &desired_variations);

    Ok(SimplexOutput {
        status: Status::Success.code(),
        message: "optimal solution found".to_owned(),
        optimal_value: solution.objective_value,
        solution: solution.variables.iter().copied().collect(),
        shadow_prices: report.shadow_prices,
        variation_viable: report.variation_viable,
        new_optimal_values: report.new_optimal_values,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn production_mix_input() -> SimplexInput {
        serde_json::from_value(json!({
            "maximize": true,
            "objective": [3.0, 5.0],
            "lhs_ineq": [[1.0, 0.0], [0.0, 2.0], [3.0, 2.0]],
            "rhs_ineq": [4.0, 12.0, 18.0],
            "desired_variations": [0.0, 6.0, 10.0],
        }))
        .unwrap()
    }

    #[test]
    fn success_response_fills_the_whole_contract() {
        let output = solve(production_mix_input());

        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({
                "status": 1,
                "message": "optimal solution found",
                "optimal_value": 36.0,
                "solution": [2.0, 6.0],
                "shadow_prices": [0.0, 1.5, 1.0],
                "variation_viable": [true, true, false],
                "new_optimal_values": [36.0, 45.0, 0.0],
            })
        );
    }

    #[test]
    fn infeasible_response_is_zero_filled() {
        let output = solve(SimplexInput {
            maximize: true,
            objective: vec![1., 1.],
            lhs_ineq: vec![vec![1., 1.], vec![-1., -1.]],
            rhs_ineq: vec![1., -3.],
            desired_variations: vec![0., 0.],
        });

        assert_eq!(output.status, Status::Infeasible.code());
        assert_eq!(output.message, "the feasible region is empty");
        assert_eq!(output.optimal_value, 0.);
        assert_eq!(output.solution, vec![0., 0.]);
        assert_eq!(output.shadow_prices, vec![0., 0.]);
        assert_eq!(output.variation_viable, vec![false, false]);
        assert_eq!(output.new_optimal_values, vec![0., 0.]);
    }

    #[test]
    fn unbounded_response_reports_the_verdict() {
        let output = solve(SimplexInput {
            maximize: true,
            objective: vec![1.],
            lhs_ineq: vec![vec![-1.]],
            rhs_ineq: vec![0.],
            desired_variations: vec![0.],
        });

        assert_eq!(output.status, Status::Unbounded.code());
        assert_eq!(
            output.message,
            "the objective function is unbounded over the feasible region"
        );
    }

    #[test]
    fn mismatched_dimensions_are_rejected_before_solving() {
        let output = solve(SimplexInput {
            maximize: true,
            objective: vec![1., 2.],
            lhs_ineq: vec![vec![1., 1.]],
            rhs_ineq: vec![1., 2.],
            desired_variations: vec![0.],
        });

        assert_eq!(output.status, Status::InvalidInput.code());
        assert_eq!(output.solution, vec![0., 0.]);
        assert_eq!(output.shadow_prices, vec![0.]);
    }

    #[test]
    fn minimization_request_round_trips_through_the_contract() {
        let output = solve(SimplexInput {
            maximize: false,
            objective: vec![1., 1.],
            lhs_ineq: vec![vec![-1., -1.]],
            rhs_ineq: vec![-4.],
            desired_variations: vec![1.],
        });

        assert_eq!(output.status, Status::Success.code());
        assert!((output.optimal_value - 4.).abs() < 1e-9);
        assert!((output.shadow_prices[0] + 1.).abs() < 1e-9);
        assert_eq!(output.variation_viable, vec![true]);
        assert!((output.new_optimal_values[0] - 3.).abs() < 1e-9);
    }
}
