//! Gaussian basis functions and their one- and two-electron integrals.
//!
//! Primitive Cartesian Gaussians live in [`gto`], contracted functions and
//! the NWChem reader in [`cgto`], and a small set of embedded basis sets in
//! [`library`].

pub mod basis;
pub mod cgto;
pub mod gto;
pub mod helper;
pub mod library;

#[cfg(test)]
mod gto_test;
