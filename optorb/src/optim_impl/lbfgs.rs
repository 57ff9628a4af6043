//! Limited-memory BFGS

use color_eyre::eyre::Result;
use nalgebra::DVector;
use std::collections::VecDeque;
use tracing::{debug, warn};

use super::line_search::backtracking;
use super::{Gradient, Minimizer, Objective, OptimizerResult};

/// Curvature pairs with `yᵀs` below this are not stored.
const CURVATURE_EPS: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct LBFGS {
    /// History length
    pub m: usize,
    pub maxiter: usize,
    /// Convergence on the infinity norm of the gradient
    pub gtol: f64,
    /// Convergence on the relative objective decrease
    pub ftol: f64,
}

impl Default for LBFGS {
    fn default() -> Self {
        LBFGS {
            m: 10,
            maxiter: 500,
            gtol: 1e-6,
            ftol: 1e-12,
        }
    }
}

impl LBFGS {
    pub fn new(maxiter: usize, gtol: f64) -> Self {
        LBFGS {
            maxiter,
            gtol,
            ..Self::default()
        }
    }
}

/// Two-loop recursion for `-H g`.
fn compute_search_direction(
    g: &DVector<f64>,
    s_history: &VecDeque<DVector<f64>>,
    y_history: &VecDeque<DVector<f64>>,
    rho_history: &VecDeque<f64>,
) -> DVector<f64> {
    let m = s_history.len();
    let mut q = g.clone();
    let mut alphas = vec![0.0; m];

    for i in (0..m).rev() {
        alphas[i] = rho_history[i] * s_history[i].dot(&q);
        q -= alphas[i] * &y_history[i];
    }

    let gamma = match (s_history.back(), y_history.back()) {
        (Some(s), Some(y)) => s.dot(y) / y.dot(y),
        _ => 1.0,
    };

    let mut r = gamma * q;
    for i in 0..m {
        let beta = rho_history[i] * y_history[i].dot(&r);
        r += (alphas[i] - beta) * &s_history[i];
    }
    -r
}

impl Minimizer for LBFGS {
    fn minimize(
        &self,
        f: &Objective,
        gradient: &Gradient,
        x0: DVector<f64>,
    ) -> Result<OptimizerResult> {
        let mut x = x0;
        let mut fx = f(&x)?;
        let mut nfev = 1;
        let mut g = gradient(&x)?;

        let mut s_history = VecDeque::with_capacity(self.m);
        let mut y_history = VecDeque::with_capacity(self.m);
        let mut rho_history = VecDeque::with_capacity(self.m);

        for iter in 0..self.maxiter {
            let gnorm = g.amax();
            debug!("L-BFGS iteration {}: f = {:.12}, |g|_inf = {:.3e}", iter, fx, gnorm);
            if gnorm < self.gtol {
                return Ok(OptimizerResult { x, fun: fx, nit: iter, nfev, converged: true });
            }

            let mut p = compute_search_direction(&g, &s_history, &y_history, &rho_history);
            let mut slope = g.dot(&p);
            if slope.is_nan() || slope >= 0.0 {
                // Not a descent direction: restart from steepest descent
                s_history.clear();
                y_history.clear();
                rho_history.clear();
                p = -&g;
                slope = g.dot(&p);
            }

            let initial_step = if s_history.is_empty() {
                (1.0 / g.norm()).min(1.0)
            } else {
                1.0
            };
            let (accepted, evals) = backtracking(f, &x, fx, &p, slope, initial_step)?;
            nfev += evals;
            let Some((alpha, fx_next)) = accepted else {
                warn!("L-BFGS line search made no progress at iteration {}", iter);
                return Ok(OptimizerResult { x, fun: fx, nit: iter, nfev, converged: false });
            };

            let s = alpha * p;
            let x_next = &x + &s;
            let g_next = gradient(&x_next)?;
            let y = &g_next - &g;

            let ys = y.dot(&s);
            if ys > CURVATURE_EPS {
                if s_history.len() == self.m {
                    s_history.pop_front();
                    y_history.pop_front();
                    rho_history.pop_front();
                }
                s_history.push_back(s);
                y_history.push_back(y);
                rho_history.push_back(1.0 / ys);
            }

            let decrease = fx - fx_next;
            x = x_next;
            g = g_next;
            fx = fx_next;

            if decrease <= self.ftol * fx.abs().max(1.0) {
                debug!("L-BFGS stalled: relative decrease below {:.1e}", self.ftol);
                return Ok(OptimizerResult { x, fun: fx, nit: iter + 1, nfev, converged: true });
            }
        }

        warn!("L-BFGS did not converge within {} iterations", self.maxiter);
        Ok(OptimizerResult { x, fun: fx, nit: self.maxiter, nfev, converged: false })
    }

    fn name(&self) -> &'static str {
        "L-BFGS"
    }
}
