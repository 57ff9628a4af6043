//! Closed-shell Hartree–Fock with DIIS acceleration.
//!
//! Provides the canonical orbitals and AO integrals that the problem
//! builder rotates into the molecular-orbital basis.

extern crate nalgebra as na;

use basis::basis::{AOBasis, Basis};
use color_eyre::eyre::{bail, Result};
use itertools::iproduct;
use na::{DMatrix, DVector, Vector3};
use ndarray::Array4;
use periodic_table_on_an_enum::Element;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

use super::molecule::nuclear_repulsion;

/// Interface shared by the SCF solvers.
pub trait SCF {
    type BasisType: AOBasis;

    fn init_basis(&mut self, elems: &[Element], basis: Vec<Self::BasisType>) -> Result<()>;
    fn init_geometry(&mut self, coords: &[Vector3<f64>]);
    fn init_density_matrix(&mut self);
    fn scf_cycle(&mut self) -> bool;
    fn calculate_total_energy(&self) -> f64;
}

/// DIIS extrapolation of the Fock matrix.
///
/// The error vector is the commutator `FDS - SDF`; the extrapolated Fock
/// matrix is `Σ c_i F_i` with `Σ c_i = 1` minimizing `||Σ c_i e_i||`.
#[derive(Clone)]
pub struct DIIS {
    error_matrices: Vec<DMatrix<f64>>,
    fock_matrices: Vec<DMatrix<f64>>,
    max_subspace_size: usize,
}

impl DIIS {
    pub fn new(max_subspace_size: usize) -> Self {
        DIIS {
            error_matrices: Vec::new(),
            fock_matrices: Vec::new(),
            max_subspace_size: max_subspace_size.max(1),
        }
    }

    pub fn error_matrix(
        fock: &DMatrix<f64>,
        density: &DMatrix<f64>,
        overlap: &DMatrix<f64>,
    ) -> DMatrix<f64> {
        fock * density * overlap - overlap * density * fock
    }

    pub fn update(
        &mut self,
        fock_matrix: DMatrix<f64>,
        density_matrix: &DMatrix<f64>,
        overlap_matrix: &DMatrix<f64>,
    ) -> f64 {
        let error = DIIS::error_matrix(&fock_matrix, density_matrix, overlap_matrix);
        let max_error = error.amax();

        if self.error_matrices.len() >= self.max_subspace_size {
            self.error_matrices.remove(0);
            self.fock_matrices.remove(0);
        }
        self.error_matrices.push(error);
        self.fock_matrices.push(fock_matrix);
        max_error
    }

    /// `None` while the subspace is too small or the B matrix is singular.
    pub fn extrapolate(&self) -> Option<DMatrix<f64>> {
        let n = self.error_matrices.len();
        if n < 2 {
            return None;
        }

        let mut b = DMatrix::zeros(n + 1, n + 1);
        for i in 0..n {
            for j in 0..n {
                b[(i, j)] = self.error_matrices[i].dot(&self.error_matrices[j]);
            }
            b[(i, n)] = -1.0;
            b[(n, i)] = -1.0;
        }
        let mut rhs = DVector::zeros(n + 1);
        rhs[n] = -1.0;

        let coeffs = match b.lu().solve(&rhs) {
            Some(x) => x,
            None => {
                info!("DIIS extrapolation failed: singular B matrix");
                return None;
            }
        };

        let mut fock = DMatrix::zeros(self.fock_matrices[0].nrows(), self.fock_matrices[0].ncols());
        for i in 0..n {
            fock += &self.fock_matrices[i] * coeffs[i];
        }
        Some(fock)
    }

    pub fn reset(&mut self) {
        self.error_matrices.clear();
        self.fock_matrices.clear();
    }

    pub fn size(&self) -> usize {
        self.error_matrices.len()
    }
}

/// Flip each eigenvector so that its largest-magnitude entry is positive.
pub fn align_eigenvectors(mut eigvecs: DMatrix<f64>) -> DMatrix<f64> {
    for j in 0..eigvecs.ncols() {
        let max_val = eigvecs
            .column(j)
            .iter()
            .copied()
            .max_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap_or(Ordering::Less))
            .unwrap_or(0.0);
        if max_val < 0.0 {
            eigvecs.column_mut(j).neg_mut();
        }
    }
    eigvecs
}

/// Eigen-decomposition of a symmetric matrix with ascending eigenvalues.
pub fn sorted_symmetric_eigen(m: DMatrix<f64>) -> (DVector<f64>, DMatrix<f64>) {
    let eig = m.symmetric_eigen();
    let mut indices: Vec<usize> = (0..eig.eigenvalues.len()).collect();
    indices.sort_by(|&a, &b| {
        eig.eigenvalues[a]
            .partial_cmp(&eig.eigenvalues[b])
            .unwrap_or(Ordering::Equal)
    });
    let values = DVector::from_fn(indices.len(), |i, _| eig.eigenvalues[indices[i]]);
    let vectors = eig.eigenvectors.select_columns(&indices);
    (values, vectors)
}

#[derive(Clone)]
pub struct RestrictedHF<B: AOBasis> {
    pub num_atoms: usize,
    pub num_basis: usize,
    pub num_occ: usize,
    ao_basis: Vec<B>,
    mo_basis: Vec<Arc<B::BasisType>>,
    pub coords: Vec<Vector3<f64>>,
    pub elems: Vec<Element>,
    pub coeffs: DMatrix<f64>,
    pub density_matrix: DMatrix<f64>,
    pub fock_matrix: DMatrix<f64>,
    pub h_core: DMatrix<f64>,
    pub overlap_matrix: DMatrix<f64>,
    pub eri: Array4<f64>,
    pub e_level: DVector<f64>,
    pub max_cycle: usize,
    pub convergence_threshold: f64,
    pub diis: Option<DIIS>,
    pub num_electrons: usize,
}

impl<B: AOBasis + Clone> RestrictedHF<B>
where
    B::BasisType: Send + Sync,
{
    pub fn new() -> Self {
        RestrictedHF {
            num_atoms: 0,
            num_basis: 0,
            num_occ: 0,
            ao_basis: Vec::new(),
            mo_basis: Vec::new(),
            coords: Vec::new(),
            elems: Vec::new(),
            coeffs: DMatrix::zeros(0, 0),
            density_matrix: DMatrix::zeros(0, 0),
            fock_matrix: DMatrix::zeros(0, 0),
            h_core: DMatrix::zeros(0, 0),
            overlap_matrix: DMatrix::zeros(0, 0),
            eri: Array4::zeros((0, 0, 0, 0)),
            e_level: DVector::zeros(0),
            max_cycle: 100,
            convergence_threshold: 1e-10,
            diis: None,
            num_electrons: 0,
        }
    }

    pub fn set_num_electrons(&mut self, num_electrons: usize) -> Result<()> {
        if num_electrons % 2 != 0 {
            bail!(
                "Restricted Hartree-Fock needs an even electron count, got {}",
                num_electrons
            );
        }
        self.num_electrons = num_electrons;
        self.num_occ = num_electrons / 2;
        Ok(())
    }

    pub fn set_convergence_threshold(&mut self, threshold: f64) {
        self.convergence_threshold = threshold;
        info!("Convergence threshold set to {:.2e}", threshold);
    }

    pub fn enable_diis(&mut self, subspace_size: usize) {
        self.diis = Some(DIIS::new(subspace_size));
        info!("DIIS enabled with subspace size {}", subspace_size);
    }

    /// Symmetric orthogonalizer `S^{-1/2}`, dropping near-null overlap directions.
    pub fn orthogonalizer(&self) -> DMatrix<f64> {
        let eig = self.overlap_matrix.clone().symmetric_eigen();
        let inv_sqrt = eig
            .eigenvalues
            .map(|v| if v > 1e-10 { 1.0 / v.sqrt() } else { 0.0 });
        &eig.eigenvectors * DMatrix::from_diagonal(&inv_sqrt) * eig.eigenvectors.transpose()
    }

    fn compute_one_electron_integrals(&mut self) {
        let n = self.num_basis;
        let ij_pairs: Vec<(usize, usize)> = iproduct!(0..n, 0..n).filter(|(i, j)| i <= j).collect();

        let values: Vec<(f64, f64)> = ij_pairs
            .par_iter()
            .map(|&(i, j)| {
                let a = &self.mo_basis[i];
                let b = &self.mo_basis[j];
                let s = B::BasisType::Sab(a, b);
                let t = B::BasisType::Tab(a, b);
                let v: f64 = (0..self.num_atoms)
                    .map(|k| {
                        B::BasisType::Vab(
                            a,
                            b,
                            self.coords[k],
                            self.elems[k].get_atomic_number() as u32,
                        )
                    })
                    .sum();
                (s, t + v)
            })
            .collect();

        self.overlap_matrix = DMatrix::zeros(n, n);
        self.h_core = DMatrix::zeros(n, n);
        for (&(i, j), &(s, h)) in ij_pairs.iter().zip(values.iter()) {
            self.overlap_matrix[(i, j)] = s;
            self.overlap_matrix[(j, i)] = s;
            self.h_core[(i, j)] = h;
            self.h_core[(j, i)] = h;
        }
    }

    fn compute_two_electron_integrals(&mut self) {
        let n = self.num_basis;
        // canonical quartets i>=j, k>=l, ij>=kl
        let quartets: Vec<(usize, usize, usize, usize)> = iproduct!(0..n, 0..n, 0..n, 0..n)
            .filter(|&(i, j, k, l)| i >= j && k >= l && i * (i + 1) / 2 + j >= k * (k + 1) / 2 + l)
            .collect();

        let values: Vec<f64> = quartets
            .par_iter()
            .map(|&(i, j, k, l)| {
                B::BasisType::JKabcd(
                    &self.mo_basis[i],
                    &self.mo_basis[j],
                    &self.mo_basis[k],
                    &self.mo_basis[l],
                )
            })
            .collect();

        let mut eri = Array4::zeros((n, n, n, n));
        for (&(i, j, k, l), &v) in quartets.iter().zip(values.iter()) {
            for (a, b, c, d) in [
                (i, j, k, l),
                (j, i, k, l),
                (i, j, l, k),
                (j, i, l, k),
                (k, l, i, j),
                (l, k, i, j),
                (k, l, j, i),
                (l, k, j, i),
            ] {
                eri[[a, b, c, d]] = v;
            }
        }
        info!("Computed {} unique two-electron integrals", quartets.len());
        self.eri = eri;
    }

    pub fn update_fock_matrix(&mut self) {
        let n = self.num_basis;
        let p = &self.density_matrix;
        let eri = &self.eri;

        let g_values: Vec<f64> = iproduct!(0..n, 0..n)
            .collect::<Vec<_>>()
            .par_iter()
            .map(|&(i, j)| {
                let mut g_ij = 0.0;
                for k in 0..n {
                    for l in 0..n {
                        g_ij += p[(k, l)] * (eri[[i, j, k, l]] - 0.5 * eri[[i, k, j, l]]);
                    }
                }
                g_ij
            })
            .collect();

        let g = DMatrix::from_row_slice(n, n, &g_values);
        self.fock_matrix = &self.h_core + g;
    }

    fn diagonalize_fock(&mut self, fock: &DMatrix<f64>) {
        let x = self.orthogonalizer();
        let f_prime = x.transpose() * fock * &x;
        let (values, vectors) = sorted_symmetric_eigen(f_prime);
        self.coeffs = align_eigenvectors(x * vectors);
        self.e_level = values;
    }

    fn density_from_coeffs(&self) -> DMatrix<f64> {
        let occ = self.coeffs.columns(0, self.num_occ);
        2.0 * &occ * occ.transpose()
    }

    pub fn get_mo_basis(&self) -> &Vec<Arc<B::BasisType>> {
        &self.mo_basis
    }

    pub fn electronic_energy(&self) -> f64 {
        0.5 * self
            .density_matrix
            .component_mul(&(&self.h_core + &self.fock_matrix))
            .sum()
    }

    pub fn nuclear_repulsion(&self) -> f64 {
        nuclear_repulsion(&self.elems, &self.coords)
    }
}

impl<B: AOBasis + Clone> Default for RestrictedHF<B>
where
    B::BasisType: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AOBasis + Clone> SCF for RestrictedHF<B>
where
    B::BasisType: Send + Sync,
{
    type BasisType = B;

    fn init_basis(&mut self, elems: &[Element], basis: Vec<B>) -> Result<()> {
        if elems.len() != basis.len() {
            bail!(
                "Got {} atomic bases for {} atoms",
                basis.len(),
                elems.len()
            );
        }
        self.elems = elems.to_vec();
        self.num_atoms = elems.len();
        self.ao_basis = basis;
        Ok(())
    }

    fn init_geometry(&mut self, coords: &[Vector3<f64>]) {
        self.coords = coords.to_vec();
        self.mo_basis.clear();
        for (ao, center) in self.ao_basis.iter_mut().zip(coords.iter()) {
            ao.set_center(*center);
            self.mo_basis.extend(ao.get_basis());
        }
        self.num_basis = self.mo_basis.len();
        info!(
            "Geometry initialized: {} atoms, {} basis functions",
            self.num_atoms, self.num_basis
        );
    }

    fn init_density_matrix(&mut self) {
        self.compute_one_electron_integrals();
        self.compute_two_electron_integrals();

        let h = self.h_core.clone();
        self.diagonalize_fock(&h);
        self.density_matrix = self.density_from_coeffs();
        self.fock_matrix = self.h_core.clone();
    }

    /// Returns whether the energy and density converged within `max_cycle`.
    fn scf_cycle(&mut self) -> bool {
        let mut old_energy = 0.0;
        for cycle in 0..self.max_cycle {
            self.update_fock_matrix();

            let fock = match self.diis.as_mut() {
                Some(diis) => {
                    diis.update(
                        self.fock_matrix.clone(),
                        &self.density_matrix,
                        &self.overlap_matrix,
                    );
                    diis.extrapolate().unwrap_or_else(|| self.fock_matrix.clone())
                }
                None => self.fock_matrix.clone(),
            };

            let energy = self.calculate_total_energy();
            self.diagonalize_fock(&fock);
            let new_density = self.density_from_coeffs();
            let density_rms = (&new_density - &self.density_matrix).norm()
                / (self.num_basis as f64);
            self.density_matrix = new_density;

            let energy_change = energy - old_energy;
            info!(
                "Cycle {}: E = {:.12} au, dE = {:.3e} au, rms(dP) = {:.3e}",
                cycle, energy, energy_change, density_rms
            );

            if energy_change.abs() < self.convergence_threshold
                && density_rms < self.convergence_threshold.sqrt()
            {
                self.update_fock_matrix();
                info!("SCF converged in {} cycles.", cycle + 1);
                return true;
            }
            old_energy = energy;
        }
        self.update_fock_matrix();
        warn!("SCF did not converge in {} cycles", self.max_cycle);
        false
    }

    fn calculate_total_energy(&self) -> f64 {
        self.electronic_energy() + self.nuclear_repulsion()
    }
}
