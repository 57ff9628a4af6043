use libm::erf;
use std::f64::consts::PI;

// Above this argument the upward recursion from F_0 is numerically safe.
const UPWARD_THRESHOLD: f64 = 30.0;
const SERIES_TOLERANCE: f64 = 1e-16;

/// Boys function `F_n(x) = ∫_0^1 t^{2n} exp(-x t^2) dt`.
///
/// Small arguments use the convergent series
/// `F_n(x) = exp(-x) Σ_k (2x)^k / ((2n+1)(2n+3)...(2n+2k+1))`;
/// large arguments start from `F_0 = sqrt(pi/x) erf(sqrt(x)) / 2` and recur
/// upwards with `F_{m+1} = ((2m+1) F_m - exp(-x)) / (2x)`.
pub fn boys_function(n: i32, x: f64) -> f64 {
    debug_assert!(n >= 0, "Boys function order must be nonnegative");
    let x = x.max(0.0);

    if x < 1e-14 {
        return 1.0 / (2 * n + 1) as f64;
    }

    if x < UPWARD_THRESHOLD {
        let mut term = 1.0 / (2 * n + 1) as f64;
        let mut sum = term;
        let mut k = 1;
        while term > SERIES_TOLERANCE * sum {
            term *= 2.0 * x / (2 * n + 2 * k + 1) as f64;
            sum += term;
            k += 1;
        }
        return (-x).exp() * sum;
    }

    let sx = x.sqrt();
    let ex = (-x).exp();
    let mut f = 0.5 * (PI / x).sqrt() * erf(sx);
    for m in 0..n {
        f = ((2 * m + 1) as f64 * f - ex) / (2.0 * x);
    }
    f
}
