//! Orthogonal reference states for MC-VQE
//!
//! The Hartree–Fock determinant is the first reference. The remaining ones
//! are the lowest eigenvectors of the configuration-interaction matrix over
//! excited determinants, built from estimator matrix elements.

use color_eyre::eyre::{bail, Result};
use nalgebra::DMatrix;
use std::str::FromStr;
use tracing::{debug, info};

use crate::ansatz::{generate_excitations, HartreeFock};
use crate::driver::sorted_symmetric_eigen;
use crate::operators::SparsePauliOp;
use crate::statevector::{Estimator, Statevector};

/// Excitation space spanned by the excited references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceExcitations {
    /// Single excitations (CIS)
    Singles,
    /// Single and double excitations (CISD without the reference)
    SinglesDoubles,
}

impl FromStr for ReferenceExcitations {
    type Err = color_eyre::eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" => Ok(Self::Singles),
            "sd" => Ok(Self::SinglesDoubles),
            _ => Err(color_eyre::eyre::eyre!(
                "Unknown excitations '{}', expected 's' or 'sd'",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReferenceExcitations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Singles => write!(f, "s"),
            Self::SinglesDoubles => write!(f, "sd"),
        }
    }
}

/// Excited determinants reachable from `reference`, in excitation order.
pub fn excited_configurations(reference: &HartreeFock, excitations: ReferenceExcitations) -> Vec<u64> {
    let doubles = excitations == ReferenceExcitations::SinglesDoubles;
    generate_excitations(
        reference.num_spatial_orbitals,
        reference.num_particles,
        true,
        doubles,
    )
    .iter()
    .filter_map(|e| e.apply_to(reference.bitstring()))
    .map(|(_, det)| det)
    .collect()
}

/// `[|HF>, |c_1>, .., |c_{k-1}>]` with `c_i` the lowest CI eigenvectors.
pub fn build_reference_states(
    hamiltonian: &SparsePauliOp,
    estimator: &dyn Estimator,
    reference: &HartreeFock,
    excitations: ReferenceExcitations,
    k: usize,
) -> Result<Vec<Statevector>> {
    let num_qubits = reference.num_qubits();
    let mut states = vec![reference.state()];
    if k <= 1 {
        return Ok(states);
    }

    let configurations = excited_configurations(reference, excitations);
    let n = configurations.len();
    if n < k - 1 {
        bail!(
            "Only {} excited configurations ('{}') available for k = {}",
            n,
            excitations,
            k
        );
    }

    let determinants: Vec<Statevector> = configurations
        .iter()
        .map(|&det| Statevector::from_basis_state(num_qubits, det))
        .collect();
    let mut ci = DMatrix::zeros(n, n);
    for a in 0..n {
        ci[(a, a)] = estimator.estimate(&determinants[a], hamiltonian)?;
        for b in 0..a {
            let h = estimator
                .estimate_transition(&determinants[a], hamiltonian, &determinants[b])?
                .re;
            ci[(a, b)] = h;
            ci[(b, a)] = h;
        }
    }
    debug!("Reference CI matrix:\n{}", ci);

    let (values, vectors) = sorted_symmetric_eigen(ci);
    info!(
        "Reference CI ({} configurations): lowest roots {:?}",
        n,
        values.iter().take(k - 1).collect::<Vec<_>>()
    );

    for root in 0..k - 1 {
        let components: Vec<(u64, f64)> = configurations
            .iter()
            .zip(vectors.column(root).iter())
            .map(|(&det, &c)| (det, c))
            .collect();
        states.push(Statevector::from_basis_combination(num_qubits, &components).normalized());
    }
    Ok(states)
}
