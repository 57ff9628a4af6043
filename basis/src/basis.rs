#![allow(non_snake_case)]

use nalgebra::Vector3;
use std::fmt;
use std::sync::Arc;

/// Integrals between two (or four) basis functions of the same kind.
///
/// Two-electron integrals are in chemist notation, `JKabcd = (ab|cd)`.
pub trait Basis {
    fn evaluate(&self, r: &Vector3<f64>) -> f64;
    fn Sab(a: &Self, b: &Self) -> f64;
    fn Tab(a: &Self, b: &Self) -> f64;
    /// Attraction of the charge distribution `ab` to a nucleus of charge `Z` at `R`.
    fn Vab(a: &Self, b: &Self, R: Vector3<f64>, Z: u32) -> f64;
    fn JKabcd(a: &Self, b: &Self, c: &Self, d: &Self) -> f64;
}

/// An atom-centred collection of basis functions.
pub trait AOBasis {
    type BasisType: Basis;

    fn basis_size(&self) -> usize;
    fn get_basis(&self) -> Vec<Arc<Self::BasisType>>;
    fn set_center(&mut self, center: Vector3<f64>);
    fn get_center(&self) -> Option<Vector3<f64>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum BasisError {
    UnknownElement(String),
    MixedElements { expected: String, found: String },
    UnsupportedShell(String),
    MalformedLine(String),
    Empty,
    NotInLibrary { symbol: String, basis: String },
}

impl fmt::Display for BasisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisError::UnknownElement(s) => write!(f, "unknown element symbol '{}'", s),
            BasisError::MixedElements { expected, found } => write!(
                f,
                "basis text mixes elements: expected {}, found {}",
                expected, found
            ),
            BasisError::UnsupportedShell(s) => write!(f, "unsupported shell type '{}'", s),
            BasisError::MalformedLine(l) => write!(f, "malformed basis line '{}'", l),
            BasisError::Empty => write!(f, "no shells found in basis text"),
            BasisError::NotInLibrary { symbol, basis } => {
                write!(f, "no built-in {} basis for {}", basis, symbol)
            }
        }
    }
}

impl std::error::Error for BasisError {}
