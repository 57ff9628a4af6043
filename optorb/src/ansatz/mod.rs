//! Reference states and parametrized ansatz circuits
//!
//! Circuits act directly on a Fock-space [`Statevector`]; every excitation
//! generator is exponentiated exactly instead of being compiled to gates.
//!
//! # Available Ansätze
//!
//! - **HartreeFock**: occupation bitstring of the closed-shell reference
//! - **UCCSD**: unitary coupled cluster with singles and doubles

mod hartree_fock;
mod tests;
mod uccsd;

pub use hartree_fock::HartreeFock;
pub use uccsd::{generate_excitations, Excitation, UCCSD};

use crate::statevector::Statevector;
use color_eyre::eyre::Result;

/// A parametrized unitary `U(θ)`.
pub trait Ansatz: Send + Sync {
    fn num_qubits(&self) -> usize;

    fn num_parameters(&self) -> usize;

    /// `U(θ)|state>`; errors when `params` has the wrong length.
    fn apply(&self, params: &[f64], state: &Statevector) -> Result<Statevector>;
}
