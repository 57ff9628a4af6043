//! Fermionic and qubit operators
//!
//! The electronic Hamiltonian and the density-matrix elements are written as
//! [`FermionicOp`]s and encoded into [`SparsePauliOp`]s by a [`QubitMapper`].

mod fermionic;
mod mapper;
mod pauli;
mod tests;

pub use fermionic::{apply_ladders, FermionicOp, Ladder};
pub use mapper::{JordanWignerMapper, QubitMapper};
pub use pauli::{PauliTerm, SparsePauliOp, PRUNE_TOLERANCE};
