//! Unitary coupled cluster with singles and doubles
//!
//! `U(θ) = Π_k exp(θ_k (T_k − T_k†))` with `T_k` a spin-preserving
//! excitation out of the Hartree–Fock reference. On a determinant basis
//! each factor is a set of independent Givens rotations between pairs
//! `|D>`, `T_k|D>`, so the exponential is applied without truncation.

use color_eyre::eyre::{bail, Result};
use itertools::Itertools;
use num_complex::Complex64;
use tracing::debug;

use super::{Ansatz, HartreeFock};
use crate::operators::{apply_ladders, Ladder};
use crate::statevector::Statevector;

/// `a†_{v0} a†_{v1} .. a_{o1} a_{o0}`: electrons move from `occupied` to
/// `virtuals`, pairwise in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excitation {
    pub occupied: Vec<usize>,
    pub virtuals: Vec<usize>,
}

impl Excitation {
    pub fn rank(&self) -> usize {
        self.occupied.len()
    }

    /// Ladder product of `T`, leftmost operator first.
    pub fn ladders(&self) -> Vec<Ladder> {
        self.virtuals
            .iter()
            .map(|&a| Ladder::Create(a))
            .chain(self.occupied.iter().rev().map(|&i| Ladder::Annihilate(i)))
            .collect()
    }

    /// Apply `T` to a determinant bitstring.
    pub fn apply_to(&self, det: u64) -> Option<(f64, u64)> {
        apply_ladders(&self.ladders(), det)
    }
}

/// Spin-preserving singles and/or doubles out of the reference, ordered as
/// α singles, β singles, αα doubles, ββ doubles, αβ doubles.
pub fn generate_excitations(
    num_spatial_orbitals: usize,
    num_particles: (usize, usize),
    singles: bool,
    doubles: bool,
) -> Vec<Excitation> {
    let n = num_spatial_orbitals;
    let (n_alpha, n_beta) = num_particles;
    let occ_a: Vec<usize> = (0..n_alpha).collect();
    let vir_a: Vec<usize> = (n_alpha..n).collect();
    let occ_b: Vec<usize> = (n..n + n_beta).collect();
    let vir_b: Vec<usize> = (n + n_beta..2 * n).collect();

    let mut excitations = Vec::new();
    if singles {
        for (occ, vir) in [(&occ_a, &vir_a), (&occ_b, &vir_b)] {
            for (&i, &a) in occ.iter().cartesian_product(vir.iter()) {
                excitations.push(Excitation {
                    occupied: vec![i],
                    virtuals: vec![a],
                });
            }
        }
    }
    if doubles {
        for (occ, vir) in [(&occ_a, &vir_a), (&occ_b, &vir_b)] {
            for ij in occ.iter().copied().combinations(2) {
                for ab in vir.iter().copied().combinations(2) {
                    excitations.push(Excitation {
                        occupied: ij.clone(),
                        virtuals: ab,
                    });
                }
            }
        }
        for (&i, &j) in occ_a.iter().cartesian_product(occ_b.iter()) {
            for (&a, &b) in vir_a.iter().cartesian_product(vir_b.iter()) {
                excitations.push(Excitation {
                    occupied: vec![i, j],
                    virtuals: vec![a, b],
                });
            }
        }
    }
    excitations
}

#[derive(Debug, Clone)]
pub struct UCCSD {
    pub num_spatial_orbitals: usize,
    pub num_particles: (usize, usize),
    pub reps: usize,
    excitations: Vec<Excitation>,
}

impl UCCSD {
    pub fn new(num_spatial_orbitals: usize, num_particles: (usize, usize), reps: usize) -> Self {
        let excitations = generate_excitations(num_spatial_orbitals, num_particles, true, true);
        debug!(
            "UCCSD: {} excitations x {} reps on {} spin orbitals",
            excitations.len(),
            reps,
            2 * num_spatial_orbitals
        );
        UCCSD {
            num_spatial_orbitals,
            num_particles,
            reps,
            excitations,
        }
    }

    /// Excitations of a single repetition.
    pub fn excitations(&self) -> &[Excitation] {
        &self.excitations
    }

    pub fn reference(&self) -> HartreeFock {
        HartreeFock::new(self.num_spatial_orbitals, self.num_particles)
    }
}

/// `exp(θ (T − T†))` on every determinant pair connected by `T`.
fn rotate(amplitudes: &mut [Complex64], excitation: &Excitation, theta: f64) {
    let (sin, cos) = theta.sin_cos();
    let ladders = excitation.ladders();
    for det in 0..amplitudes.len() as u64 {
        if let Some((sign, target)) = apply_ladders(&ladders, det) {
            let from = amplitudes[det as usize];
            let to = amplitudes[target as usize];
            amplitudes[det as usize] = from * cos - to * (sign * sin);
            amplitudes[target as usize] = from * (sign * sin) + to * cos;
        }
    }
}

impl Ansatz for UCCSD {
    fn num_qubits(&self) -> usize {
        2 * self.num_spatial_orbitals
    }

    fn num_parameters(&self) -> usize {
        self.reps * self.excitations.len()
    }

    fn apply(&self, params: &[f64], state: &Statevector) -> Result<Statevector> {
        if params.len() != self.num_parameters() {
            bail!(
                "UCCSD expects {} parameters, got {}",
                self.num_parameters(),
                params.len()
            );
        }
        if state.num_qubits() != self.num_qubits() {
            bail!(
                "UCCSD acts on {} qubits but the state has {}",
                self.num_qubits(),
                state.num_qubits()
            );
        }
        let mut out = state.clone();
        let amplitudes = out.amplitudes_mut();
        let chunks = params.chunks(self.excitations.len().max(1));
        for rep in chunks {
            for (excitation, &theta) in self.excitations.iter().zip(rep.iter()) {
                if theta != 0.0 {
                    rotate(amplitudes, excitation, theta);
                }
            }
        }
        Ok(out)
    }
}
