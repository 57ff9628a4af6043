//! Core MC-VQE implementation
//!
//! A single unitary `U(θ)` is optimized against the sum of the energies of
//! `k` orthogonal reference states. The lowest `k` eigenvalues then follow
//! from diagonalizing the Hamiltonian in the span of `U(θ)|φ_i>`.

use std::cell::Cell;
use std::sync::Arc;

use color_eyre::eyre::{bail, Result};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::info;

use super::references::{build_reference_states, ReferenceExcitations};
use crate::ansatz::{Ansatz, HartreeFock};
use crate::driver::sorted_symmetric_eigen;
use crate::operators::SparsePauliOp;
use crate::optim_impl::{finite_difference_gradient, Minimizer};
use crate::statevector::{Estimator, Statevector};

/// Step of the central-difference parameter gradient.
pub const DEFAULT_FINITE_DIFFERENCE_STEP: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct EigensolverResult {
    /// Lowest `k` eigenvalues, ascending
    pub eigenvalues: Vec<f64>,
    pub eigenstates: Vec<Statevector>,
    pub optimal_point: Vec<f64>,
    /// Summed reference-state energy at `optimal_point`
    pub optimal_value: f64,
    pub cost_function_evals: usize,
    /// `<φ_i|U† H U|φ_i>` at `optimal_point`
    pub reference_energies: Vec<f64>,
    pub subspace_hamiltonian: DMatrix<f64>,
}

/// Multi-configurational VQE excited-state solver
pub struct MCVQE {
    /// Number of states
    pub k: usize,
    pub excitations: ReferenceExcitations,
    pub num_particles: (usize, usize),
    pub ansatz: Box<dyn Ansatz>,
    pub initial_point: Option<Vec<f64>>,
    pub optimizer: Box<dyn Minimizer>,
    pub estimator: Arc<dyn Estimator>,
    pub finite_difference_step: f64,
}

impl MCVQE {
    pub fn new(
        k: usize,
        excitations: ReferenceExcitations,
        num_particles: (usize, usize),
        ansatz: Box<dyn Ansatz>,
        optimizer: Box<dyn Minimizer>,
        estimator: Arc<dyn Estimator>,
    ) -> Result<Self> {
        if k == 0 {
            bail!("MC-VQE needs at least one state");
        }
        let num_qubits = ansatz.num_qubits();
        if num_qubits % 2 != 0 {
            bail!("Ansatz acts on an odd number of qubits ({})", num_qubits);
        }
        let (n_alpha, n_beta) = num_particles;
        if n_alpha > num_qubits / 2 || n_beta > num_qubits / 2 {
            bail!(
                "{:?} particles do not fit into {} spin orbitals",
                num_particles,
                num_qubits
            );
        }
        Ok(MCVQE {
            k,
            excitations,
            num_particles,
            ansatz,
            initial_point: None,
            optimizer,
            estimator,
            finite_difference_step: DEFAULT_FINITE_DIFFERENCE_STEP,
        })
    }

    pub fn with_initial_point(mut self, point: Vec<f64>) -> Self {
        self.initial_point = Some(point);
        self
    }

    pub fn set_initial_point(&mut self, point: Option<Vec<f64>>) {
        self.initial_point = point;
    }

    pub fn num_spin_orbitals(&self) -> usize {
        self.ansatz.num_qubits()
    }

    pub fn reference(&self) -> HartreeFock {
        HartreeFock::new(self.ansatz.num_qubits() / 2, self.num_particles)
    }

    fn reference_energies(
        &self,
        params: &[f64],
        references: &[Statevector],
        hamiltonian: &SparsePauliOp,
    ) -> Result<Vec<f64>> {
        references
            .par_iter()
            .map(|phi| {
                let psi = self.ansatz.apply(params, phi)?;
                self.estimator.estimate(&psi, hamiltonian)
            })
            .collect()
    }

    /// Lowest `k` eigenvalues of `hamiltonian` in the space reached by the ansatz.
    pub fn compute_eigenvalues(&self, hamiltonian: &SparsePauliOp) -> Result<EigensolverResult> {
        let num_qubits = self.ansatz.num_qubits();
        if hamiltonian.num_qubits() > num_qubits {
            bail!(
                "Hamiltonian acts on {} qubits but the ansatz on {}",
                hamiltonian.num_qubits(),
                num_qubits
            );
        }

        info!("");
        info!("===========================================");
        info!("    Starting MC-VQE Calculation");
        info!("===========================================");
        info!("Number of states: {}", self.k);
        info!("Reference excitations: {}", self.excitations);
        info!("Ansatz parameters: {}", self.ansatz.num_parameters());
        info!("Optimizer: {}", self.optimizer.name());

        let references = build_reference_states(
            hamiltonian,
            self.estimator.as_ref(),
            &self.reference(),
            self.excitations,
            self.k,
        )?;

        let num_parameters = self.ansatz.num_parameters();
        let x0 = match &self.initial_point {
            Some(point) if point.len() != num_parameters => bail!(
                "Initial point has {} entries but the ansatz has {} parameters",
                point.len(),
                num_parameters
            ),
            Some(point) => DVector::from_column_slice(point),
            None => DVector::zeros(num_parameters),
        };

        let evals = Cell::new(0usize);
        let cost = |theta: &DVector<f64>| -> Result<f64> {
            evals.set(evals.get() + 1);
            Ok(self
                .reference_energies(theta.as_slice(), &references, hamiltonian)?
                .iter()
                .sum())
        };
        let gradient = |theta: &DVector<f64>| {
            finite_difference_gradient(&cost, theta, self.finite_difference_step)
        };
        let opt = self.optimizer.minimize(&cost, &gradient, x0)?;
        info!(
            "Optimizer finished: cost = {:.10}, iterations = {}, converged = {}",
            opt.fun, opt.nit, opt.converged
        );

        let optimal_point: Vec<f64> = opt.x.iter().copied().collect();
        let rotated: Vec<Statevector> = references
            .iter()
            .map(|phi| self.ansatz.apply(&optimal_point, phi))
            .collect::<Result<_>>()?;

        let k = rotated.len();
        let mut subspace = DMatrix::zeros(k, k);
        for i in 0..k {
            subspace[(i, i)] = self.estimator.estimate(&rotated[i], hamiltonian)?;
            for j in 0..i {
                let h = self
                    .estimator
                    .estimate_transition(&rotated[i], hamiltonian, &rotated[j])?
                    .re;
                subspace[(i, j)] = h;
                subspace[(j, i)] = h;
            }
        }
        let reference_energies: Vec<f64> = subspace.diagonal().iter().copied().collect();

        let (values, vectors) = sorted_symmetric_eigen(subspace.clone());
        let eigenstates: Vec<Statevector> = (0..k)
            .map(|root| {
                let mut state = Statevector::zero(num_qubits);
                for (j, psi) in rotated.iter().enumerate() {
                    let c = vectors[(j, root)];
                    for (out, amp) in state.amplitudes_mut().iter_mut().zip(psi.amplitudes()) {
                        *out += *amp * c;
                    }
                }
                state
            })
            .collect();
        let eigenvalues: Vec<f64> = values.iter().copied().collect();

        info!("");
        info!("===========================================");
        info!("       MC-VQE Results Summary");
        info!("===========================================");
        for (i, e) in eigenvalues.iter().enumerate() {
            info!("  State {}: E = {:.10} Eh", i, e);
        }
        info!("Cost function evaluations: {}", evals.get());
        info!("===========================================");

        Ok(EigensolverResult {
            eigenvalues,
            eigenstates,
            optimal_point,
            optimal_value: opt.fun,
            cost_function_evals: evals.get(),
            reference_energies,
            subspace_hamiltonian: subspace,
        })
    }
}
