use color_eyre::eyre::Result;
use nalgebra::DVector;

use super::Objective;

const ARMIJO_C1: f64 = 1e-4;
const MIN_STEP: f64 = 1e-12;

/// Backtracking search along the descent direction `p`.
///
/// Returns the accepted step, the new objective value and the number of
/// evaluations, or `None` when no step satisfies the sufficient-decrease
/// condition before the step shrinks below `MIN_STEP`.
pub(super) fn backtracking(
    f: &Objective,
    x: &DVector<f64>,
    fx: f64,
    p: &DVector<f64>,
    slope: f64,
    initial_step: f64,
) -> Result<(Option<(f64, f64)>, usize)> {
    let mut alpha = initial_step;
    let mut nfev = 0;
    while alpha >= MIN_STEP {
        let fx_new = f(&(x + alpha * p))?;
        nfev += 1;
        if fx_new.is_finite() && fx_new <= fx + ARMIJO_C1 * alpha * slope {
            return Ok((Some((alpha, fx_new)), nfev));
        }
        alpha *= 0.5;
    }
    Ok((None, nfev))
}
