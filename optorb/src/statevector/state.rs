use color_eyre::eyre::{bail, Result};
use num_complex::Complex64;
use std::ops::{Add, Mul};

use crate::operators::SparsePauliOp;

/// Dense state over `2^n` computational basis states.
///
/// Bit `j` of a basis index is the occupation of spin orbital `j` under the
/// Jordan–Wigner encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    pub fn zero(num_qubits: usize) -> Self {
        Statevector {
            num_qubits,
            amplitudes: vec![Complex64::new(0.0, 0.0); 1 << num_qubits],
        }
    }

    pub fn from_basis_state(num_qubits: usize, index: u64) -> Self {
        let mut sv = Statevector::zero(num_qubits);
        sv.amplitudes[index as usize] = Complex64::new(1.0, 0.0);
        sv
    }

    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Result<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            bail!("Statevector length {} is not a power of two", len);
        }
        Ok(Statevector {
            num_qubits: len.trailing_zeros() as usize,
            amplitudes,
        })
    }

    /// Linear combination `Σ c_i |b_i>` of basis states.
    pub fn from_basis_combination(num_qubits: usize, components: &[(u64, f64)]) -> Self {
        let mut sv = Statevector::zero(num_qubits);
        for &(index, c) in components {
            sv.amplitudes[index as usize] += Complex64::new(c, 0.0);
        }
        sv
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    pub fn norm(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }

    pub fn normalized(mut self) -> Self {
        let n = self.norm();
        if n > 0.0 {
            self.amplitudes.iter_mut().for_each(|a| *a /= n);
        }
        self
    }

    /// `<self|other>`.
    pub fn inner(&self, other: &Statevector) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// `op |self>`.
    pub fn apply(&self, op: &SparsePauliOp) -> Result<Statevector> {
        if op.num_qubits() > self.num_qubits {
            bail!(
                "Operator acts on {} qubits but the state has {}",
                op.num_qubits(),
                self.num_qubits
            );
        }
        let mut out = Statevector::zero(self.num_qubits);
        for (b, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() == 0.0 {
                continue;
            }
            for term in op.terms() {
                let (factor, target) = term.apply_to_basis(b as u64);
                out.amplitudes[target as usize] += factor * amp;
            }
        }
        Ok(out)
    }

    /// `<self| op |self>`.
    pub fn expectation_value(&self, op: &SparsePauliOp) -> Result<Complex64> {
        Ok(self.inner(&self.apply(op)?))
    }

    /// Basis index with the largest probability.
    pub fn dominant_basis_state(&self) -> u64 {
        self.amplitudes
            .iter()
            .enumerate()
            .max_by(|a, b| {
                a.1.norm_sqr()
                    .partial_cmp(&b.1.norm_sqr())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i as u64)
            .unwrap_or(0)
    }
}

impl Add for &Statevector {
    type Output = Statevector;

    fn add(self, rhs: &Statevector) -> Statevector {
        let amplitudes = self
            .amplitudes
            .iter()
            .zip(rhs.amplitudes.iter())
            .map(|(a, b)| a + b)
            .collect();
        Statevector {
            num_qubits: self.num_qubits,
            amplitudes,
        }
    }
}

impl Mul<Complex64> for &Statevector {
    type Output = Statevector;

    fn mul(self, rhs: Complex64) -> Statevector {
        Statevector {
            num_qubits: self.num_qubits,
            amplitudes: self.amplitudes.iter().map(|a| a * rhs).collect(),
        }
    }
}
