//! Projected gradient descent over real partial unitaries
//!
//! Minimizes `f(U)` on `{U ∈ R^{N×M} : UᵀU = I}`. Each step moves along the
//! Euclidean gradient and maps back with the polar projection
//! `P(A) = W Vᵀ`, where `A = W Σ Vᵀ`. Step lengths after the first follow
//! Barzilai–Borwein.

use color_eyre::eyre::{eyre, Result};
use nalgebra::DMatrix;
use std::str::FromStr;
use tracing::{debug, warn};

/// Matrix objective `f(U)`.
pub type MatrixObjective<'a> = dyn Fn(&DMatrix<f64>) -> Result<f64> + 'a;

/// Euclidean gradient `∂f/∂U`.
pub type MatrixGradient<'a> = dyn Fn(&DMatrix<f64>) -> Result<DMatrix<f64>> + 'a;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientMethod {
    /// Closed-form gradient supplied by the caller
    Analytic,
    /// Central differences of the objective
    FiniteDifference,
}

impl FromStr for GradientMethod {
    type Err = color_eyre::eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "autograd" | "analytic" => Ok(Self::Analytic),
            "finitedifference" | "fd" => Ok(Self::FiniteDifference),
            _ => Err(eyre!("Unknown gradient method: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PartialUnitaryResult {
    pub u: DMatrix<f64>,
    pub fun: f64,
    pub nit: usize,
    /// Frobenius norm of the Riemannian gradient at `u`
    pub gradient_norm: f64,
    pub converged: bool,
}

#[derive(Debug, Clone)]
pub struct PartialUnitaryProjectionOptimizer {
    pub initial_bb_stepsize: f64,
    pub stopping_tolerance: f64,
    pub maxiter: usize,
    pub gradient_method: GradientMethod,
    pub finite_difference_step: f64,
}

impl Default for PartialUnitaryProjectionOptimizer {
    fn default() -> Self {
        PartialUnitaryProjectionOptimizer {
            initial_bb_stepsize: 1e-3,
            stopping_tolerance: 1e-5,
            maxiter: 10000,
            gradient_method: GradientMethod::Analytic,
            finite_difference_step: 1e-6,
        }
    }
}

/// Polar factor `W Vᵀ` of `a`, the closest matrix with orthonormal columns.
pub fn project(a: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let svd = a.clone().svd(true, true);
    let w = svd
        .u
        .ok_or_else(|| eyre!("SVD did not return left singular vectors"))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| eyre!("SVD did not return right singular vectors"))?;
    Ok(w * v_t)
}

/// `G − U sym(UᵀG)`: the gradient projected onto the tangent space at `U`.
pub fn riemannian_gradient(u: &DMatrix<f64>, g: &DMatrix<f64>) -> DMatrix<f64> {
    let utg = u.transpose() * g;
    let sym = (&utg + utg.transpose()) * 0.5;
    g - u * sym
}

/// `‖UᵀU − I‖_max`.
pub fn orthonormality_error(u: &DMatrix<f64>) -> f64 {
    let m = u.ncols();
    (u.transpose() * u - DMatrix::identity(m, m)).amax()
}

pub fn matrix_finite_difference_gradient(
    f: &MatrixObjective,
    u: &DMatrix<f64>,
    eps: f64,
) -> Result<DMatrix<f64>> {
    let mut grad = DMatrix::zeros(u.nrows(), u.ncols());
    let mut shifted = u.clone();
    for j in 0..u.ncols() {
        for i in 0..u.nrows() {
            shifted[(i, j)] = u[(i, j)] + eps;
            let forward = f(&shifted)?;
            shifted[(i, j)] = u[(i, j)] - eps;
            let backward = f(&shifted)?;
            shifted[(i, j)] = u[(i, j)];
            grad[(i, j)] = (forward - backward) / (2.0 * eps);
        }
    }
    Ok(grad)
}

impl PartialUnitaryProjectionOptimizer {
    pub fn new(initial_bb_stepsize: f64, stopping_tolerance: f64, maxiter: usize) -> Self {
        PartialUnitaryProjectionOptimizer {
            initial_bb_stepsize,
            stopping_tolerance,
            maxiter,
            ..Self::default()
        }
    }

    pub fn with_gradient_method(mut self, method: GradientMethod) -> Self {
        self.gradient_method = method;
        self
    }

    fn gradient(
        &self,
        f: &MatrixObjective,
        gradient: Option<&MatrixGradient>,
        u: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>> {
        match (self.gradient_method, gradient) {
            (GradientMethod::Analytic, Some(g)) => g(u),
            (GradientMethod::Analytic, None) => {
                Err(eyre!("Analytic gradient requested but none was supplied"))
            }
            (GradientMethod::FiniteDifference, _) => {
                matrix_finite_difference_gradient(f, u, self.finite_difference_step)
            }
        }
    }

    pub fn minimize(
        &self,
        f: &MatrixObjective,
        gradient: Option<&MatrixGradient>,
        u0: DMatrix<f64>,
    ) -> Result<PartialUnitaryResult> {
        let mut u = u0;
        let mut g = self.gradient(f, gradient, &u)?;
        let mut previous: Option<(DMatrix<f64>, DMatrix<f64>)> = None;

        for iter in 0..self.maxiter {
            let gradient_norm = riemannian_gradient(&u, &g).norm();
            if iter % 100 == 0 {
                debug!("Partial unitary iteration {}: |grad| = {:.3e}", iter, gradient_norm);
            }
            if gradient_norm < self.stopping_tolerance {
                let fun = f(&u)?;
                return Ok(PartialUnitaryResult { u, fun, nit: iter, gradient_norm, converged: true });
            }

            let step = match &previous {
                Some((s, y)) => {
                    let bb = (s.dot(s) / s.dot(y)).abs();
                    if bb.is_finite() && bb > 0.0 {
                        bb
                    } else {
                        self.initial_bb_stepsize
                    }
                }
                None => self.initial_bb_stepsize,
            };

            let u_next = project(&(&u - &g * step))?;
            let g_next = self.gradient(f, gradient, &u_next)?;
            previous = Some((&u_next - &u, &g_next - &g));
            u = u_next;
            g = g_next;
        }

        let gradient_norm = riemannian_gradient(&u, &g).norm();
        warn!(
            "Partial unitary optimization did not converge in {} iterations (|grad| = {:.3e})",
            self.maxiter, gradient_norm
        );
        let fun = f(&u)?;
        Ok(PartialUnitaryResult { u, fun, nit: self.maxiter, gradient_norm, converged: false })
    }
}
