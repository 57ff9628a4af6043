use num_complex::Complex64;

use super::fermionic::{FermionicOp, Ladder};
use super::pauli::{PauliTerm, SparsePauliOp};

/// Encodes fermionic operators as qubit operators.
pub trait QubitMapper: Send + Sync {
    fn map(&self, op: &FermionicOp) -> SparsePauliOp;
    fn name(&self) -> &'static str;
}

/// Jordan–Wigner encoding: spin orbital `p` is qubit `p` and
/// `a†_p = ½ (X_p - iY_p) Π_{q<p} Z_q`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JordanWignerMapper;

impl JordanWignerMapper {
    pub fn new() -> Self {
        JordanWignerMapper
    }

    // -iY = XZ, so a†_p = ½ X_p Z_{<p} + ½ X_p Z_p Z_{<p}
    fn ladder(&self, num_qubits: usize, op: &Ladder) -> SparsePauliOp {
        let p = op.index();
        let bit = 1u64 << p;
        let below = bit - 1;
        let sign = match op {
            Ladder::Create(_) => 0.5,
            Ladder::Annihilate(_) => -0.5,
        };
        SparsePauliOp::from_terms(
            num_qubits,
            vec![
                PauliTerm::new(bit, below, Complex64::new(0.5, 0.0)),
                PauliTerm::new(bit, below | bit, Complex64::new(sign, 0.0)),
            ],
        )
    }
}

impl QubitMapper for JordanWignerMapper {
    fn map(&self, op: &FermionicOp) -> SparsePauliOp {
        let n = op.num_spin_orbitals();
        let mut terms = Vec::new();
        for (ladders, coeff) in op.terms() {
            let mut product = SparsePauliOp::identity(n, *coeff);
            for l in ladders {
                product = product.compose(&self.ladder(n, l));
                if product.is_empty() {
                    break;
                }
            }
            terms.extend_from_slice(product.terms());
        }
        SparsePauliOp::from_terms(n, terms).simplify()
    }

    fn name(&self) -> &'static str {
        "jordan_wigner"
    }
}
