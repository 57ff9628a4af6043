//! Steepest Descent optimization algorithm

use color_eyre::eyre::Result;
use nalgebra::DVector;
use tracing::{debug, warn};

use super::line_search::backtracking;
use super::{Gradient, Minimizer, Objective, OptimizerResult};

/// Steepest descent with a backtracking line search
#[derive(Debug, Clone)]
pub struct SteepestDescent {
    pub maxiter: usize,
    pub gtol: f64,
    /// Trial step of the first line search
    pub step_size: f64,
}

impl Default for SteepestDescent {
    fn default() -> Self {
        SteepestDescent {
            maxiter: 2000,
            gtol: 1e-6,
            step_size: 0.1,
        }
    }
}

impl Minimizer for SteepestDescent {
    fn minimize(
        &self,
        f: &Objective,
        gradient: &Gradient,
        x0: DVector<f64>,
    ) -> Result<OptimizerResult> {
        let mut x = x0;
        let mut fx = f(&x)?;
        let mut nfev = 1;
        let mut step = self.step_size;

        for iter in 0..self.maxiter {
            let g = gradient(&x)?;
            let gnorm = g.amax();
            debug!("SD iteration {}: f = {:.12}, |g|_inf = {:.3e}", iter, fx, gnorm);
            if gnorm < self.gtol {
                return Ok(OptimizerResult { x, fun: fx, nit: iter, nfev, converged: true });
            }

            let p = -&g;
            let slope = g.dot(&p);
            let (accepted, evals) = backtracking(f, &x, fx, &p, slope, 2.0 * step)?;
            nfev += evals;
            match accepted {
                Some((alpha, fx_next)) => {
                    x += alpha * p;
                    fx = fx_next;
                    step = alpha;
                }
                None => {
                    warn!("Steepest descent line search made no progress at iteration {}", iter);
                    return Ok(OptimizerResult { x, fun: fx, nit: iter, nfev, converged: false });
                }
            }
        }

        warn!("Steepest descent did not converge within {} iterations", self.maxiter);
        Ok(OptimizerResult { x, fun: fx, nit: self.maxiter, nfev, converged: false })
    }

    fn name(&self) -> &'static str {
        "steepest descent"
    }
}
