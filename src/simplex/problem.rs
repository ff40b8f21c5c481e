use std::ops::{Mul, MulAssign};

use derive_more::Display;
use derive_new::new;
use nalgebra::{DMatrix, DVector, RowDVector};
use num_traits::Zero;

use crate::{ensure, ensure_eq};

use super::big_m::BigM;
use super::table::{SimplexTable, StepOutcome};
use super::SolveResult;

#[derive(Debug, Clone, PartialEq, Display, new)]
#[display(
    fmt = "ObjectiveFunction {{\n    coefficients:\n{}\n    {}\n}}",
    r#"coefficients.to_string().trim().lines().map(|l| format!("{}\n", l.trim())).collect::<String>()"#,
    r#"if *minimization { "Minimization" } else { "Maximization" }"#
)]
pub struct ObjectiveFunction {
    pub(crate) coefficients: RowDVector<f64>,
    pub(crate) minimization: bool,
}

#[derive(Debug, Clone, PartialEq, new)]
pub struct Constraint {
    pub(crate) coefficients: RowDVector<f64>,
    pub(crate) rhs: f64,
}

/// Canonical maximization form: every bound non-negative, one slack column per
/// row, an artificial column (penalized by `-M`) for each row that had to be
/// flipped, and the bookkeeping needed to map results back onto the problem
/// as the caller stated it.
#[derive(Debug, Clone, PartialEq, Display)]
#[display(
    fmt = "Problem {{\n    objective:\n{}\n    constraints:\n{}\n    rhs:\n{}\n}}",
    r#"objective.to_string().trim().lines().map(|l| format!("{}\n", l.trim())).collect::<String>()"#,
    r#"constraints.to_string().trim().lines().map(|l| format!("{}\n", l.trim())).collect::<String>()"#,
    r#"rhs.to_string().trim().lines().map(|l| format!("{}\n", l.trim())).collect::<String>()"#
)]
pub struct Problem {
    pub(crate) objective: RowDVector<BigM>,
    pub(crate) constraints: DMatrix<f64>,
    pub(crate) rhs: DVector<f64>,
    /// Initial basic column of each row: the slack for rows kept as-is, the
    /// artificial for flipped rows. These columns start as identity vectors,
    /// so post-optimal analysis reads the basis inverse out of them.
    pub(crate) basis: DVector<usize>,
    pub(crate) n_decision: usize,
    pub(crate) minimization: bool,
    pub(crate) flipped: Vec<bool>,
}

impl Problem {
    pub fn new(
        objective_function: ObjectiveFunction,
        constraints: Vec<Constraint>,
    ) -> SolveResult<Self> {
        Self::standardize(objective_function, constraints)
    }

    pub fn solve(self) -> SolveResult<SimplexTable> {
        let mut table = SimplexTable::new(self);
        let pivot_budget = table.pivot_budget();
        let mut iteration = 1usize;
        loop {
            log::info!("Iteration: {iteration}");
            match table.step(iteration > pivot_budget)? {
                StepOutcome::Optimal => break,
                StepOutcome::Pivoted => iteration += 1,
            }
        }
        Ok(table)
    }

    fn standardize(
        objective_function: ObjectiveFunction,
        mut constraints: Vec<Constraint>,
    ) -> SolveResult<Self> {
        let n = objective_function.coefficients.len();
        let m = constraints.len();
        ensure!(n > 0, "the objective function has no variables");
        ensure!(m > 0, "the problem has no constraints");
        for constraint in &constraints {
            ensure_eq!(constraint.coefficients.len(), n);
        }

        // Reverse sign on constraints with negative rhs. A flipped row states
        // a `>=` relation, so its slack becomes a surplus and the row starts
        // basic in an artificial column instead.
        let mut flipped = vec![false; m];
        for (i, constraint) in constraints.iter_mut().enumerate() {
            if constraint.rhs < 0. {
                *constraint *= -1.;
                flipped[i] = true;
            }
        }
        let n_artificial = flipped.iter().filter(|flip| **flip).count();
        let total = n + m + n_artificial;

        let decision_coefficients = if objective_function.minimization {
            -objective_function.coefficients
        } else {
            objective_function.coefficients
        };
        let mut objective = RowDVector::from_element(total, BigM::zero());
        for (j, coefficient) in decision_coefficients.iter().enumerate() {
            objective[j] = BigM::from(*coefficient);
        }
        for j in n + m..total {
            objective[j] = -BigM::one_big();
        }

        let mut matrix = DMatrix::zeros(m, total);
        let mut rhs = DVector::zeros(m);
        let mut basis = DVector::from_element(m, 0usize);
        let mut next_artificial = n + m;
        for (i, constraint) in constraints.into_iter().enumerate() {
            for (j, coefficient) in constraint.coefficients.iter().enumerate() {
                matrix[(i, j)] = *coefficient;
            }
            if flipped[i] {
                matrix[(i, n + i)] = -1.;
                matrix[(i, next_artificial)] = 1.;
                basis[i] = next_artificial;
                next_artificial += 1;
            } else {
                matrix[(i, n + i)] = 1.;
                basis[i] = n + i;
            }
            rhs[i] = constraint.rhs;
        }

        Ok(Self {
            objective,
            constraints: matrix,
            rhs,
            basis,
            n_decision: n,
            minimization: objective_function.minimization,
            flipped,
        })
    }
}

impl Mul<f64> for Constraint {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            coefficients: self.coefficients * rhs,
            rhs: self.rhs * rhs,
        }
    }
}

impl MulAssign<f64> for Constraint {
    fn mul_assign(&mut self, rhs: f64) {
        self.coefficients *= rhs;
        self.rhs *= rhs;
    }
}
