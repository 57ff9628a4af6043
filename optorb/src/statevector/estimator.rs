use color_eyre::eyre::Result;
use num_complex::Complex64;

use super::state::Statevector;
use crate::operators::SparsePauliOp;

/// Expectation values of qubit operators in prepared states.
pub trait Estimator: Send + Sync {
    fn estimate_complex(&self, state: &Statevector, op: &SparsePauliOp) -> Result<Complex64>;

    /// Real part of `<ψ|O|ψ>`.
    fn estimate(&self, state: &Statevector, op: &SparsePauliOp) -> Result<f64> {
        Ok(self.estimate_complex(state, op)?.re)
    }

    /// `<φ|O|ψ>` for Hermitian `O`, measured through the superpositions
    /// `(φ + ψ)/√2` and `(φ + iψ)/√2`.
    fn estimate_transition(
        &self,
        bra: &Statevector,
        op: &SparsePauliOp,
        ket: &Statevector,
    ) -> Result<Complex64> {
        let e_bra = self.estimate(bra, op)?;
        let e_ket = self.estimate(ket, op)?;
        let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        let plus = &(bra * s) + &(ket * s);
        let plus_i = &(bra * s) + &(ket * Complex64::new(0.0, s.re));
        let mean = 0.5 * (e_bra + e_ket);
        let re = self.estimate(&plus, op)? - mean;
        let im = mean - self.estimate(&plus_i, op)?;
        Ok(Complex64::new(re, im))
    }
}

/// Exact expectation values from the full statevector, without shot noise.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatevectorEstimator;

impl StatevectorEstimator {
    pub fn new() -> Self {
        StatevectorEstimator
    }
}

impl Estimator for StatevectorEstimator {
    fn estimate_complex(&self, state: &Statevector, op: &SparsePauliOp) -> Result<Complex64> {
        state.expectation_value(op)
    }
}
