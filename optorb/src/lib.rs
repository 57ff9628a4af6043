// Orbital-optimized multistate-contracted VQE

pub mod ansatz;
pub mod app;
pub mod config;
pub mod driver;
pub mod integrals;
pub mod io;
pub mod mcvqe_impl;
pub mod operators;
pub mod optim_impl;
pub mod orbital_impl;
pub mod statevector;

pub use mcvqe_impl::{EigensolverResult, MCVQE};
pub use orbital_impl::{OptOrbMCVQE, OptOrbResult, PartialUnitaryProjectionOptimizer};
