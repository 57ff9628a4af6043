//! Orbital optimization for MC-VQE
//!
//! The active space is the column span of a real partial unitary `U`. The
//! outer loop alternates MC-VQE solves with Stiefel-manifold minimization of
//! the state-averaged energy over `U`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use optorb::orbital_impl::{OptOrbMCVQE, PartialUnitaryProjectionOptimizer};
//!
//! let mut solver = OptOrbMCVQE::new(
//!     Some(problem), None, 4, mcvqe, mapper, estimator,
//!     PartialUnitaryProjectionOptimizer::new(1e-3, 1e-5, 10000),
//!     20, true, true,
//! )?;
//! let result = solver.compute_energies()?;
//! ```

mod gradient;
mod optorb;
mod partial_unitary;
mod rdm;

pub use gradient::{
    active_space_energy, active_space_energy_gradient, fold_spin_blocks, spin_block_diagonal,
};
pub use optorb::{
    default_state_weights, OptOrbMCVQE, OptOrbResult, OuterIteration, OuterLoopCallback,
};
pub use partial_unitary::{
    matrix_finite_difference_gradient, orthonormality_error, project, riemannian_gradient,
    GradientMethod, MatrixGradient, MatrixObjective, PartialUnitaryProjectionOptimizer,
    PartialUnitaryResult,
};
pub use rdm::measure_rdms;
