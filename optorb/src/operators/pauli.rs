use num_complex::Complex64;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul};

/// Coefficients below this magnitude are dropped by [`SparsePauliOp::simplify`].
pub const PRUNE_TOLERANCE: f64 = 1e-12;

/// `coeff · Π_j X_j^{x_j} Z_j^{z_j}` with bit `j` of the masks addressing qubit `j`.
///
/// On qubit `j` the X factor stands to the left of the Z factor, so that
/// `(x, z) = (1, 1)` is `XZ = -iY`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauliTerm {
    pub x: u64,
    pub z: u64,
    pub coeff: Complex64,
}

impl PauliTerm {
    pub fn new(x: u64, z: u64, coeff: Complex64) -> Self {
        PauliTerm { x, z, coeff }
    }

    /// `(X^x1 Z^z1)(X^x2 Z^z2) = (-1)^{|z1 & x2|} X^{x1^x2} Z^{z1^z2}`.
    pub fn compose(&self, other: &PauliTerm) -> PauliTerm {
        let sign = if (self.z & other.x).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        };
        PauliTerm {
            x: self.x ^ other.x,
            z: self.z ^ other.z,
            coeff: self.coeff * other.coeff * sign,
        }
    }

    /// `(X^x Z^z)† = Z^z X^x = (-1)^{|x & z|} X^x Z^z`.
    pub fn adjoint(&self) -> PauliTerm {
        let sign = if (self.x & self.z).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        };
        PauliTerm {
            x: self.x,
            z: self.z,
            coeff: self.coeff.conj() * sign,
        }
    }

    /// Action on a computational basis state: `(amplitude factor, new basis index)`.
    pub fn apply_to_basis(&self, b: u64) -> (Complex64, u64) {
        let sign = if (self.z & b).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        };
        (self.coeff * sign, b ^ self.x)
    }

    /// Label in I/X/Y/Z letters (qubit 0 rightmost) and the coefficient of
    /// that Hermitian Pauli string.
    pub fn label(&self, num_qubits: usize) -> (String, Complex64) {
        let mut label = String::with_capacity(num_qubits);
        let mut n_y = 0;
        for j in (0..num_qubits).rev() {
            let xb = (self.x >> j) & 1 == 1;
            let zb = (self.z >> j) & 1 == 1;
            label.push(match (xb, zb) {
                (false, false) => 'I',
                (true, false) => 'X',
                (false, true) => 'Z',
                (true, true) => {
                    n_y += 1;
                    'Y'
                }
            });
        }
        // XZ = -iY
        let phase = Complex64::new(0.0, -1.0).powi(n_y);
        (label, self.coeff * phase)
    }
}

/// Sum of Pauli terms on at most 64 qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct SparsePauliOp {
    num_qubits: usize,
    terms: Vec<PauliTerm>,
}

impl SparsePauliOp {
    pub fn zero(num_qubits: usize) -> Self {
        assert!(num_qubits <= 64, "at most 64 qubits are supported");
        SparsePauliOp {
            num_qubits,
            terms: Vec::new(),
        }
    }

    pub fn identity(num_qubits: usize, coeff: Complex64) -> Self {
        SparsePauliOp::from_terms(num_qubits, vec![PauliTerm::new(0, 0, coeff)])
    }

    pub fn from_terms(num_qubits: usize, terms: Vec<PauliTerm>) -> Self {
        let mut op = SparsePauliOp::zero(num_qubits);
        op.terms = terms;
        op
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Merge equal Pauli strings and drop negligible coefficients.
    pub fn simplify(&self) -> SparsePauliOp {
        let mut merged: BTreeMap<(u64, u64), Complex64> = BTreeMap::new();
        for t in &self.terms {
            *merged.entry((t.x, t.z)).or_insert(Complex64::new(0.0, 0.0)) += t.coeff;
        }
        let terms = merged
            .into_iter()
            .filter(|(_, c)| c.norm() > PRUNE_TOLERANCE)
            .map(|((x, z), coeff)| PauliTerm { x, z, coeff })
            .collect();
        SparsePauliOp::from_terms(self.num_qubits, terms)
    }

    pub fn scale(&self, factor: Complex64) -> SparsePauliOp {
        let terms = self
            .terms
            .iter()
            .map(|t| PauliTerm::new(t.x, t.z, t.coeff * factor))
            .collect();
        SparsePauliOp::from_terms(self.num_qubits, terms)
    }

    pub fn compose(&self, other: &SparsePauliOp) -> SparsePauliOp {
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        for a in &self.terms {
            for b in &other.terms {
                terms.push(a.compose(b));
            }
        }
        SparsePauliOp::from_terms(self.num_qubits.max(other.num_qubits), terms).simplify()
    }

    pub fn adjoint(&self) -> SparsePauliOp {
        let terms = self.terms.iter().map(PauliTerm::adjoint).collect();
        SparsePauliOp::from_terms(self.num_qubits, terms)
    }

    /// Whether `self == self†` up to `tol`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        let diff = (self.clone() + self.adjoint().scale(Complex64::new(-1.0, 0.0))).simplify();
        diff.terms.iter().all(|t| t.coeff.norm() < tol)
    }

    /// `(label, coefficient)` pairs in Hermitian Pauli form.
    pub fn to_list(&self) -> Vec<(String, Complex64)> {
        self.terms.iter().map(|t| t.label(self.num_qubits)).collect()
    }
}

impl Add for SparsePauliOp {
    type Output = SparsePauliOp;

    fn add(mut self, rhs: SparsePauliOp) -> SparsePauliOp {
        self.num_qubits = self.num_qubits.max(rhs.num_qubits);
        self.terms.extend(rhs.terms);
        self
    }
}

impl Mul<&SparsePauliOp> for &SparsePauliOp {
    type Output = SparsePauliOp;

    fn mul(self, rhs: &SparsePauliOp) -> SparsePauliOp {
        self.compose(rhs)
    }
}

impl fmt::Display for SparsePauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparsePauliOp on {} qubits:", self.num_qubits)?;
        for (label, coeff) in self.to_list() {
            writeln!(f, "  {:+.8}{:+.8}i * {}", coeff.re, coeff.im, label)?;
        }
        Ok(())
    }
}
