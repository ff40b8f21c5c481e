mod big_m;
mod problem;
mod sensitivity;
mod solution;
mod table;

pub use big_m::BigM;
pub use problem::{Constraint, ObjectiveFunction, Problem};
pub use sensitivity::SensitivityReport;
pub use solution::Solution;
pub use table::SimplexTable;

use derive_more::{Display, Error, IsVariant};

/// Absolute tolerance for comparisons against zero. Pivoting accumulates
/// floating-point drift, so exact comparisons would misread a dirty zero as a
/// candidate entering column or a violated bound.
pub(crate) const EPS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error, IsVariant)]
pub enum SolveError {
    #[display(fmt = "the feasible region is empty")]
    Infeasible,
    #[display(fmt = "the objective function is unbounded over the feasible region")]
    Unbounded,
    #[display(fmt = "invalid input: {}", _0)]
    InvalidInput(#[error(not(source))] String),
}

impl From<String> for SolveError {
    fn from(message: String) -> Self {
        Self::InvalidInput(message)
    }
}

pub type SolveResult<T> = Result<T, SolveError>;
