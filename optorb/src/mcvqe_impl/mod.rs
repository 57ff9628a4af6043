//! Multi-configurational VQE (MC-VQE)
//!
//! This module provides the excited-state solver used inside the orbital
//! optimization loop. It returns the lowest `k` eigenvalues of a qubit
//! Hamiltonian together with the optimized ansatz parameters.
//!
//! # Usage
//!
//! ```rust,ignore
//! use optorb::mcvqe_impl::{MCVQE, ReferenceExcitations};
//!
//! let solver = MCVQE::new(2, ReferenceExcitations::Singles, (1, 1), ansatz, optimizer, estimator)?;
//! let result = solver.compute_eigenvalues(&hamiltonian)?;
//! ```

mod mcvqe;
mod references;
mod tests;

pub use mcvqe::{EigensolverResult, DEFAULT_FINITE_DIFFERENCE_STEP, MCVQE};
pub use references::{build_reference_states, excited_configurations, ReferenceExcitations};
