//! Fock-space statevectors and expectation-value estimators

mod estimator;
mod state;
mod tests;

pub use estimator::{Estimator, StatevectorEstimator};
pub use state::Statevector;
