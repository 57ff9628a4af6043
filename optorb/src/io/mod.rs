//! Input/Output operations
//!
//! This module handles logging setup, result formatting and basis set loading.

mod basis_loader;
mod output;

pub use basis_loader::{fetch_basis, local_basis_filename};
pub use output::{setup_output, write_energies};
