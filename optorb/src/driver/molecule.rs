use color_eyre::eyre::{bail, eyre, Result};
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bohr radius in Angstrom.
pub const BOHR: f64 = 0.52917721092;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceUnit {
    #[default]
    Angstrom,
    Bohr,
}

impl DistanceUnit {
    pub fn to_bohr(&self, value: f64) -> f64 {
        match self {
            DistanceUnit::Angstrom => value / BOHR,
            DistanceUnit::Bohr => value,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = color_eyre::eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "angstrom" | "a" | "ang" => Ok(Self::Angstrom),
            "bohr" | "au" | "b" => Ok(Self::Bohr),
            _ => Err(eyre!("Unknown distance unit: {}", s)),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Angstrom => write!(f, "Angstrom"),
            DistanceUnit::Bohr => write!(f, "Bohr"),
        }
    }
}

/// Molecule as handed to the electronic-structure driver.
///
/// `atom` uses the compact `"H 0 0 0; H 0 0 0.735"` notation; entries may
/// also be separated by newlines. `spin` is `n_alpha - n_beta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeSpec {
    pub atom: String,
    pub charge: i32,
    pub spin: i32,
    pub unit: DistanceUnit,
    pub basis: String,
}

impl MoleculeSpec {
    pub fn new(atom: &str, basis: &str) -> Self {
        MoleculeSpec {
            atom: atom.to_string(),
            charge: 0,
            spin: 0,
            unit: DistanceUnit::Angstrom,
            basis: basis.to_string(),
        }
    }

    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_spin(mut self, spin: i32) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Elements and coordinates in bohr.
    pub fn geometry(&self) -> Result<(Vec<Element>, Vec<Vector3<f64>>)> {
        let mut elements = Vec::new();
        let mut coords = Vec::new();

        for entry in self
            .atom
            .split(|c| c == ';' || c == '\n')
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            let tokens: Vec<&str> = entry.split_whitespace().collect();
            if tokens.len() != 4 {
                bail!("Malformed atom entry '{}': expected 'Symbol x y z'", entry);
            }
            let element = Element::from_symbol(tokens[0])
                .ok_or_else(|| eyre!("Invalid element symbol: {}", tokens[0]))?;
            let xyz = tokens[1..]
                .iter()
                .map(|t| {
                    t.parse::<f64>()
                        .map_err(|_| eyre!("Invalid coordinate '{}' in entry '{}'", t, entry))
                })
                .collect::<Result<Vec<f64>>>()?;
            elements.push(element);
            coords.push(Vector3::new(
                self.unit.to_bohr(xyz[0]),
                self.unit.to_bohr(xyz[1]),
                self.unit.to_bohr(xyz[2]),
            ));
        }

        if elements.is_empty() {
            bail!("Molecule specification contains no atoms");
        }
        Ok((elements, coords))
    }

    /// `(n_alpha, n_beta)` implied by the nuclear charges, `charge` and `spin`.
    pub fn num_particles(&self, elements: &[Element]) -> Result<(usize, usize)> {
        let nuclear: i64 = elements.iter().map(|e| e.get_atomic_number() as i64).sum();
        let n_electrons = nuclear - self.charge as i64;
        if n_electrons <= 0 {
            bail!("Charge {} leaves no electrons", self.charge);
        }
        let spin = self.spin as i64;
        if (n_electrons + spin) % 2 != 0 || spin.abs() > n_electrons {
            bail!(
                "Spin {} is incompatible with {} electrons",
                self.spin,
                n_electrons
            );
        }
        let n_alpha = (n_electrons + spin) / 2;
        let n_beta = (n_electrons - spin) / 2;
        Ok((n_alpha as usize, n_beta as usize))
    }
}

/// Nuclear repulsion `Σ_{i<j} Z_i Z_j / r_ij` in hartree, coordinates in bohr.
pub fn nuclear_repulsion(elements: &[Element], coords: &[Vector3<f64>]) -> f64 {
    let mut energy = 0.0;
    for i in 0..elements.len() {
        for j in (i + 1)..elements.len() {
            let r = (coords[i] - coords[j]).norm();
            if r > 1e-10 {
                energy += elements[i].get_atomic_number() as f64
                    * elements[j].get_atomic_number() as f64
                    / r;
            }
        }
    }
    energy
}
