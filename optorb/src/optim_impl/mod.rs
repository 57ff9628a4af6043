//! Classical minimizers for variational parameters
//!
//! This module contains the optimizers driving the MC-VQE parameter search:
//! limited-memory BFGS and plain steepest descent, both with a backtracking
//! line search. Gradients come from the caller, typically through
//! [`finite_difference_gradient`].

mod lbfgs;
mod line_search;
mod steepest_descent;
mod tests;

pub use lbfgs::LBFGS;
pub use steepest_descent::SteepestDescent;

use color_eyre::eyre::Result;
use nalgebra::DVector;
use std::str::FromStr;

/// Scalar objective `f(x)`.
pub type Objective<'a> = dyn Fn(&DVector<f64>) -> Result<f64> + 'a;

/// Gradient `∇f(x)`.
pub type Gradient<'a> = dyn Fn(&DVector<f64>) -> Result<DVector<f64>> + 'a;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerResult {
    pub x: DVector<f64>,
    pub fun: f64,
    /// Iterations taken
    pub nit: usize,
    /// Objective evaluations made by the minimizer itself
    pub nfev: usize,
    pub converged: bool,
}

/// Trait for unconstrained minimization algorithms
pub trait Minimizer: Send + Sync {
    fn minimize(
        &self,
        f: &Objective,
        gradient: &Gradient,
        x0: DVector<f64>,
    ) -> Result<OptimizerResult>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationAlgorithm {
    LBFGS,
    SteepestDescent,
}

impl FromStr for OptimizationAlgorithm {
    type Err = color_eyre::eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "lbfgs" | "lbfgsb" => Ok(Self::LBFGS),
            "sd" | "steepestdescent" => Ok(Self::SteepestDescent),
            _ => Err(color_eyre::eyre::eyre!("Unknown optimization algorithm: {}", s)),
        }
    }
}

/// Create a minimizer based on algorithm choice
pub fn create_minimizer(
    algorithm: &str,
    max_iterations: usize,
    gradient_tolerance: f64,
) -> Result<Box<dyn Minimizer>> {
    let algo = OptimizationAlgorithm::from_str(algorithm)?;
    Ok(match algo {
        OptimizationAlgorithm::LBFGS => Box::new(LBFGS {
            maxiter: max_iterations,
            gtol: gradient_tolerance,
            ..LBFGS::default()
        }),
        OptimizationAlgorithm::SteepestDescent => Box::new(SteepestDescent {
            maxiter: max_iterations,
            gtol: gradient_tolerance,
            ..SteepestDescent::default()
        }),
    })
}

/// Central differences `(f(x + εe_i) − f(x − εe_i)) / 2ε`.
pub fn finite_difference_gradient(f: &Objective, x: &DVector<f64>, eps: f64) -> Result<DVector<f64>> {
    let mut grad = DVector::zeros(x.len());
    let mut shifted = x.clone();
    for i in 0..x.len() {
        shifted[i] = x[i] + eps;
        let forward = f(&shifted)?;
        shifted[i] = x[i] - eps;
        let backward = f(&shifted)?;
        shifted[i] = x[i];
        grad[i] = (forward - backward) / (2.0 * eps);
    }
    Ok(grad)
}
