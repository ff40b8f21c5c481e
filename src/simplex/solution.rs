use derive_more::Display;
use nalgebra::DVector;

#[derive(Debug, Clone, PartialEq, Display)]
#[display(
    fmt = "Variables:\n{}Objective value: {}",
    r#"variables.to_string().trim().lines().map(|l| format!("{}\n", l.trim())).collect::<String>()"#,
    objective_value
)]
pub struct Solution {
    pub variables: DVector<f64>,
    pub objective_value: f64,
}
