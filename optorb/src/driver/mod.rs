//! Electronic-structure driver
//!
//! Turns a molecule description into the molecular-orbital integrals the
//! quantum solvers work with:
//!
//! ```rust,ignore
//! use optorb::driver::{ElectronicStructureDriver, MoleculeSpec};
//!
//! let molecule = MoleculeSpec::new("H 0 0 0; H 0 0 0.735", "6-31g");
//! let problem = ElectronicStructureDriver::new(molecule).run()?;
//! ```

mod molecule;
mod problem;
mod rhf;

pub use molecule::{nuclear_repulsion, DistanceUnit, MoleculeSpec, BOHR};
pub use problem::{ao_to_mo_eri, ElectronicStructureDriver, ElectronicStructureProblem};
pub use rhf::{align_eigenvectors, sorted_symmetric_eigen, RestrictedHF, DIIS, SCF};
