//! Spin-orbital integral tensors and reduced density matrices
//!
//! The active-space Hamiltonian used by the solvers is obtained by rotating
//! the full spin-orbital integrals with a partial unitary and contracting
//! them with the state-averaged density matrices.

mod rdm;
mod tensors;
mod tests;

pub use rdm::ReducedDensityMatrices;
pub use tensors::{
    half_transform_two_body, to_physicist_ordering, transform_two_body, IntegralTensors,
};
