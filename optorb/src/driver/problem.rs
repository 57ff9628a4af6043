extern crate nalgebra as na;

use basis::cgto::AtomicBasis;
use color_eyre::eyre::{bail, Result};
use na::{DMatrix, DVector};
use ndarray::Array4;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

use super::molecule::MoleculeSpec;
use super::rhf::{RestrictedHF, SCF};
use crate::io::fetch_basis;

/// Molecular-orbital Hamiltonian of a closed-shell molecule.
///
/// Integrals are over spatial orbitals; `two_body` is in chemist order
/// `(pq|rs)`.
#[derive(Debug, Clone)]
pub struct ElectronicStructureProblem {
    pub molecule: MoleculeSpec,
    pub one_body: DMatrix<f64>,
    pub two_body: Array4<f64>,
    pub nuclear_repulsion_energy: f64,
    pub num_particles: (usize, usize),
    pub num_spatial_orbitals: usize,
    pub reference_energy: f64,
    pub orbital_energies: DVector<f64>,
    pub mo_coeff: DMatrix<f64>,
    pub scf_converged: bool,
}

impl ElectronicStructureProblem {
    pub fn num_spin_orbitals(&self) -> usize {
        2 * self.num_spatial_orbitals
    }

    pub fn num_electrons(&self) -> usize {
        self.num_particles.0 + self.num_particles.1
    }

    /// Electronic energy plus nuclear repulsion.
    pub fn total_energy(&self, electronic: f64) -> f64 {
        electronic + self.nuclear_repulsion_energy
    }
}

/// `(pq|rs) = Σ C_μp C_νq C_λr C_σs (μν|λσ)`, one index at a time.
pub fn ao_to_mo_eri(eri: &Array4<f64>, c: &DMatrix<f64>) -> Array4<f64> {
    let n = c.nrows();
    let m = c.ncols();

    let mut t1 = Array4::<f64>::zeros((m, n, n, n));
    for p in 0..m {
        for mu in 0..n {
            let c_mp = c[(mu, p)];
            if c_mp == 0.0 {
                continue;
            }
            for nu in 0..n {
                for la in 0..n {
                    for si in 0..n {
                        t1[[p, nu, la, si]] += c_mp * eri[[mu, nu, la, si]];
                    }
                }
            }
        }
    }

    let mut t2 = Array4::<f64>::zeros((m, m, n, n));
    for p in 0..m {
        for q in 0..m {
            for nu in 0..n {
                let c_nq = c[(nu, q)];
                for la in 0..n {
                    for si in 0..n {
                        t2[[p, q, la, si]] += c_nq * t1[[p, nu, la, si]];
                    }
                }
            }
        }
    }

    let mut t3 = Array4::<f64>::zeros((m, m, m, n));
    for p in 0..m {
        for q in 0..m {
            for r in 0..m {
                for la in 0..n {
                    let c_lr = c[(la, r)];
                    for si in 0..n {
                        t3[[p, q, r, si]] += c_lr * t2[[p, q, la, si]];
                    }
                }
            }
        }
    }

    let mut mo = Array4::<f64>::zeros((m, m, m, m));
    for p in 0..m {
        for q in 0..m {
            for r in 0..m {
                for s in 0..m {
                    mo[[p, q, r, s]] = (0..n).map(|si| c[(si, s)] * t3[[p, q, r, si]]).sum();
                }
            }
        }
    }
    mo
}

/// Runs restricted Hartree–Fock on a [`MoleculeSpec`] and produces the
/// molecular-orbital problem.
pub struct ElectronicStructureDriver {
    pub molecule: MoleculeSpec,
    pub basis_dir: Option<PathBuf>,
    pub max_cycle: usize,
    pub convergence_threshold: f64,
    pub diis_subspace_size: usize,
}

impl ElectronicStructureDriver {
    pub fn new(molecule: MoleculeSpec) -> Self {
        ElectronicStructureDriver {
            molecule,
            basis_dir: None,
            max_cycle: 100,
            convergence_threshold: 1e-10,
            diis_subspace_size: 8,
        }
    }

    pub fn with_basis_dir(mut self, dir: PathBuf) -> Self {
        self.basis_dir = Some(dir);
        self
    }

    pub fn run(&self) -> Result<ElectronicStructureProblem> {
        let (elements, coords) = self.molecule.geometry()?;
        let num_particles = self.molecule.num_particles(&elements)?;
        if num_particles.0 != num_particles.1 {
            bail!(
                "Only closed-shell molecules are supported (spin = {})",
                self.molecule.spin
            );
        }

        info!("===========================================");
        info!("        Electronic Structure Driver");
        info!("===========================================");
        info!("Atoms: {}", self.molecule.atom);
        info!(
            "Basis: {}, charge: {}, spin: {}, unit: {}",
            self.molecule.basis, self.molecule.charge, self.molecule.spin, self.molecule.unit
        );

        let mut cache: HashMap<&str, AtomicBasis> = HashMap::new();
        let mut atomic_bases = Vec::with_capacity(elements.len());
        for element in &elements {
            let symbol = element.get_symbol();
            if !cache.contains_key(symbol) {
                let basis = fetch_basis(symbol, &self.molecule.basis, self.basis_dir.as_deref())?;
                cache.insert(symbol, basis);
            }
            atomic_bases.push(cache[symbol].clone());
        }

        let mut scf = RestrictedHF::<AtomicBasis>::new();
        scf.max_cycle = self.max_cycle;
        scf.set_convergence_threshold(self.convergence_threshold);
        scf.enable_diis(self.diis_subspace_size);
        scf.init_basis(&elements, atomic_bases)?;
        scf.init_geometry(&coords);
        scf.set_num_electrons(num_particles.0 + num_particles.1)?;
        scf.init_density_matrix();
        let converged = scf.scf_cycle();

        let reference_energy = scf.calculate_total_energy();
        let nuclear_repulsion_energy = scf.nuclear_repulsion();
        let c = &scf.coeffs;
        let one_body = c.transpose() * &scf.h_core * c;
        let two_body = ao_to_mo_eri(&scf.eri, c);

        info!("RHF total energy: {:.10} Eh", reference_energy);
        info!("Nuclear repulsion: {:.10} Eh", nuclear_repulsion_energy);
        info!("Orbital energies: {:?}", scf.e_level.as_slice());
        info!("===========================================");

        Ok(ElectronicStructureProblem {
            molecule: self.molecule.clone(),
            one_body,
            two_body,
            nuclear_repulsion_energy,
            num_particles,
            num_spatial_orbitals: scf.num_basis,
            reference_energy,
            orbital_energies: scf.e_level.clone(),
            mo_coeff: scf.coeffs.clone(),
            scf_converged: converged,
        })
    }
}
