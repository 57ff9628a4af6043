#![allow(non_snake_case)]
/* Contracted Gaussian type orbitals (CGTO) built on the primitives in gto.rs,
   and the per-element container read from NWChem-formatted basis text.
*/

use crate::basis::{AOBasis, Basis, BasisError};
use crate::gto::GTO;
use itertools::iproduct;
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractedGTO {
    pub primitives: Vec<GTO>,
    pub coefficients: Vec<f64>,
    // 1s, 2s, 2px, ...
    pub shell_type: String,
    pub n: i32,
    pub l_xyz: Vector3<i32>,
}

impl ContractedGTO {
    pub fn new(
        exponents: &[f64],
        coefficients: &[f64],
        l_xyz: Vector3<i32>,
        center: Vector3<f64>,
        shell_type: String,
        n: i32,
    ) -> Self {
        let primitives = exponents
            .iter()
            .map(|&alpha| GTO::new(alpha, l_xyz, center))
            .collect();
        let mut cgto = ContractedGTO {
            primitives,
            coefficients: coefficients.to_vec(),
            shell_type,
            n,
            l_xyz,
        };
        cgto.normalize();
        cgto
    }

    /// Rescale the contraction coefficients to unit self-overlap.
    fn normalize(&mut self) {
        let s = ContractedGTO::Sab(self, self);
        if s > 0.0 {
            let scale = 1.0 / s.sqrt();
            self.coefficients.iter_mut().for_each(|c| *c *= scale);
        }
    }

    pub fn center(&self) -> Vector3<f64> {
        self.primitives
            .first()
            .map(|p| p.center)
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn set_center(&mut self, center: Vector3<f64>) {
        for p in self.primitives.iter_mut() {
            *p = GTO::new(p.alpha, p.l_xyz, center);
        }
    }

    fn pairs<'a>(a: &'a Self, b: &'a Self) -> impl Iterator<Item = (f64, &'a GTO, &'a GTO)> {
        iproduct!(
            a.coefficients.iter().zip(a.primitives.iter()),
            b.coefficients.iter().zip(b.primitives.iter())
        )
        .map(|((ca, pa), (cb, pb))| (ca * cb, pa, pb))
    }
}

impl Basis for ContractedGTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.coefficients
            .iter()
            .zip(self.primitives.iter())
            .map(|(c, p)| c * p.evaluate(r))
            .sum()
    }

    fn Sab(a: &Self, b: &Self) -> f64 {
        ContractedGTO::pairs(a, b)
            .map(|(c, pa, pb)| c * GTO::Sab(pa, pb))
            .sum()
    }

    fn Tab(a: &Self, b: &Self) -> f64 {
        ContractedGTO::pairs(a, b)
            .map(|(c, pa, pb)| c * GTO::Tab(pa, pb))
            .sum()
    }

    fn Vab(a: &Self, b: &Self, R: Vector3<f64>, Z: u32) -> f64 {
        ContractedGTO::pairs(a, b)
            .map(|(c, pa, pb)| c * GTO::Vab(pa, pb, R, Z))
            .sum()
    }

    fn JKabcd(a: &Self, b: &Self, c: &Self, d: &Self) -> f64 {
        let bra: Vec<(f64, &GTO, &GTO)> = ContractedGTO::pairs(a, b).collect();
        let ket: Vec<(f64, &GTO, &GTO)> = ContractedGTO::pairs(c, d).collect();
        bra.par_iter()
            .map(|&(cab, pa, pb)| {
                ket.iter()
                    .map(|&(ccd, pc, pd)| cab * ccd * GTO::JKabcd(pa, pb, pc, pd))
                    .sum::<f64>()
            })
            .sum()
    }
}

/// All contracted functions one element carries in one basis set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomicBasis {
    pub name: String,
    pub symbol: String,
    pub atomic_number: u32,
    pub center: Vector3<f64>,
    pub basis_set: Vec<ContractedGTO>,
}

// Cartesian components of one angular momentum shell, in the order they are emitted.
fn cartesian_components(l: i32) -> Vec<(&'static str, Vector3<i32>)> {
    match l {
        0 => vec![("s", Vector3::new(0, 0, 0))],
        _ => vec![
            ("px", Vector3::new(1, 0, 0)),
            ("py", Vector3::new(0, 1, 0)),
            ("pz", Vector3::new(0, 0, 1)),
        ],
    }
}

fn parse_float(token: &str) -> Option<f64> {
    token.replace(['D', 'd'], "E").parse::<f64>().ok()
}

struct ShellBlock {
    kind: String,
    exponents: Vec<f64>,
    columns: Vec<Vec<f64>>,
}

impl AtomicBasis {
    // Example of the accepted format:
    //
    // BASIS "ao basis" PRINT
    // #BASIS SET: (4s) -> [2s]
    // H    S
    //       18.7311370              0.03349460
    //        2.8253937              0.23472695
    //        0.6401217              0.81375733
    // H    S
    //        0.1612778              1.0000000
    // END
    pub fn parse_nwchem(name: &str, input: &str) -> Result<Self, BasisError> {
        let mut symbol: Option<String> = None;
        let mut blocks: Vec<ShellBlock> = Vec::new();

        for raw in input.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let upper = line.to_uppercase();
            if upper.starts_with("BASIS") {
                continue;
            }
            if upper == "END" {
                break;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let first_is_symbol = tokens[0].chars().all(char::is_alphabetic);
            if first_is_symbol {
                if tokens.len() < 2 {
                    return Err(BasisError::MalformedLine(line.to_string()));
                }
                let sym = tokens[0];
                match &symbol {
                    None => symbol = Some(sym.to_string()),
                    Some(expected) if !expected.eq_ignore_ascii_case(sym) => {
                        return Err(BasisError::MixedElements {
                            expected: expected.clone(),
                            found: sym.to_string(),
                        })
                    }
                    Some(_) => {}
                }
                let kind = tokens[1].to_uppercase();
                let n_columns = match kind.as_str() {
                    "S" | "P" => 1,
                    "SP" => 2,
                    _ => return Err(BasisError::UnsupportedShell(tokens[1].to_string())),
                };
                blocks.push(ShellBlock {
                    kind,
                    exponents: Vec::new(),
                    columns: vec![Vec::new(); n_columns],
                });
                continue;
            }

            let block = blocks
                .last_mut()
                .ok_or_else(|| BasisError::MalformedLine(line.to_string()))?;
            let numbers: Option<Vec<f64>> = tokens.iter().map(|t| parse_float(t)).collect();
            let numbers = numbers.ok_or_else(|| BasisError::MalformedLine(line.to_string()))?;
            if numbers.len() != block.columns.len() + 1 {
                return Err(BasisError::MalformedLine(line.to_string()));
            }
            block.exponents.push(numbers[0]);
            for (col, value) in block.columns.iter_mut().zip(&numbers[1..]) {
                col.push(*value);
            }
        }

        let symbol = symbol.ok_or(BasisError::Empty)?;
        let element = Element::from_symbol(&capitalize(&symbol))
            .ok_or_else(|| BasisError::UnknownElement(symbol.clone()))?;

        let center = Vector3::zeros();
        let mut basis_set = Vec::new();
        let mut shell_counter = [0i32; 2];
        for block in &blocks {
            if block.exponents.is_empty() {
                return Err(BasisError::Empty);
            }
            let ls: Vec<i32> = match block.kind.as_str() {
                "S" => vec![0],
                "P" => vec![1],
                _ => vec![0, 1],
            };
            for (l, coeffs) in ls.iter().zip(block.columns.iter()) {
                shell_counter[*l as usize] += 1;
                let n = shell_counter[*l as usize] + l;
                for (label, l_xyz) in cartesian_components(*l) {
                    basis_set.push(ContractedGTO::new(
                        &block.exponents,
                        coeffs,
                        l_xyz,
                        center,
                        format!("{}{}", n, label),
                        n,
                    ));
                }
            }
        }

        Ok(AtomicBasis {
            name: name.to_string(),
            symbol: element.get_symbol().to_string(),
            atomic_number: element.get_atomic_number() as u32,
            center,
            basis_set,
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

impl AOBasis for AtomicBasis {
    type BasisType = ContractedGTO;

    fn basis_size(&self) -> usize {
        self.basis_set.len()
    }

    fn get_basis(&self) -> Vec<Arc<Self::BasisType>> {
        self.basis_set.iter().cloned().map(Arc::new).collect()
    }

    fn set_center(&mut self, center: Vector3<f64>) {
        self.center = center;
        for cgto in self.basis_set.iter_mut() {
            cgto.set_center(center);
        }
    }

    fn get_center(&self) -> Option<Vector3<f64>> {
        Some(self.center)
    }
}
