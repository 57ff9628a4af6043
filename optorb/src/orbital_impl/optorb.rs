//! Orbital-optimized MC-VQE
//!
//! Alternates between an MC-VQE solve in the active space spanned by the
//! partial unitary `U` and a minimization of the state-averaged energy with
//! respect to `U` at fixed density matrices.

use std::sync::Arc;

use color_eyre::eyre::{bail, Result};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use super::gradient::{
    active_space_energy, active_space_energy_gradient, fold_spin_blocks, spin_block_diagonal,
};
use super::partial_unitary::{
    orthonormality_error, project, MatrixGradient, PartialUnitaryProjectionOptimizer,
};
use super::rdm::measure_rdms;
use crate::driver::ElectronicStructureProblem;
use crate::integrals::{IntegralTensors, ReducedDensityMatrices};
use crate::mcvqe_impl::{EigensolverResult, MCVQE};
use crate::operators::{FermionicOp, QubitMapper};
use crate::statevector::Estimator;

const ORTHONORMALITY_TOLERANCE: f64 = 1e-8;

/// Snapshot passed to the outer-loop callback after every MC-VQE solve.
#[derive(Debug, Clone)]
pub struct OuterIteration<'a> {
    pub iteration: usize,
    pub eigenvalues: &'a [f64],
    pub state_averaged_energy: f64,
    pub partial_unitary: &'a DMatrix<f64>,
}

pub type OuterLoopCallback = Box<dyn FnMut(&OuterIteration) + Send>;

#[derive(Debug, Clone)]
pub struct OptOrbResult {
    /// Electronic energies of the lowest `k` states
    pub eigenvalues: Vec<f64>,
    /// Eigenvalues plus nuclear repulsion, when a problem was given
    pub total_energies: Option<Vec<f64>>,
    /// Spin-orbital partial unitary, `N × M`
    pub partial_unitary: DMatrix<f64>,
    /// Orbital optimization steps taken
    pub num_iterations: usize,
    /// State-averaged energy after each MC-VQE solve
    pub energy_history: Vec<f64>,
    pub converged: bool,
    pub mcvqe_result: EigensolverResult,
}

pub struct OptOrbMCVQE {
    pub problem: Option<ElectronicStructureProblem>,
    pub integral_tensors: Option<IntegralTensors>,
    /// Active spin orbitals `M`
    pub num_spin_orbitals: usize,
    pub excited_states_solver: MCVQE,
    pub mapper: Box<dyn QubitMapper>,
    pub estimator: Arc<dyn Estimator>,
    pub partial_unitary_optimizer: PartialUnitaryProjectionOptimizer,
    /// Outer iterations
    pub maxiter: usize,
    pub wavefunction_real: bool,
    pub spin_conserving: bool,
    /// Spatial `n × M/2` when spin conserving, spin-orbital `N × M` otherwise
    pub initial_partial_unitary: Option<DMatrix<f64>>,
    pub stopping_tolerance: f64,
    pub state_weights: Option<Vec<f64>>,
    pub partial_unitary_random_perturbation: Option<f64>,
    pub eigensolver_random_perturbation: Option<f64>,
    pub seed: Option<u64>,
    pub outer_loop_callback: Option<OuterLoopCallback>,
}

/// `w_i ∝ k − i`, normalized.
pub fn default_state_weights(k: usize) -> Vec<f64> {
    let total = (k * (k + 1) / 2) as f64;
    (0..k).map(|i| (k - i) as f64 / total).collect()
}

impl OptOrbMCVQE {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        problem: Option<ElectronicStructureProblem>,
        integral_tensors: Option<IntegralTensors>,
        num_spin_orbitals: usize,
        excited_states_solver: MCVQE,
        mapper: Box<dyn QubitMapper>,
        estimator: Arc<dyn Estimator>,
        partial_unitary_optimizer: PartialUnitaryProjectionOptimizer,
        maxiter: usize,
        wavefunction_real: bool,
        spin_conserving: bool,
    ) -> Result<Self> {
        let solver = OptOrbMCVQE {
            problem,
            integral_tensors,
            num_spin_orbitals,
            excited_states_solver,
            mapper,
            estimator,
            partial_unitary_optimizer,
            maxiter,
            wavefunction_real,
            spin_conserving,
            initial_partial_unitary: None,
            stopping_tolerance: 1e-6,
            state_weights: None,
            partial_unitary_random_perturbation: None,
            eigensolver_random_perturbation: None,
            seed: None,
            outer_loop_callback: None,
        };
        solver.validate()?;
        Ok(solver)
    }

    pub fn with_initial_partial_unitary(mut self, u: DMatrix<f64>) -> Result<Self> {
        self.initial_partial_unitary = Some(u);
        self.validate()?;
        Ok(self)
    }

    pub fn with_state_weights(mut self, weights: Vec<f64>) -> Result<Self> {
        self.state_weights = Some(weights);
        self.validate()?;
        Ok(self)
    }

    pub fn with_stopping_tolerance(mut self, tolerance: f64) -> Self {
        self.stopping_tolerance = tolerance;
        self
    }

    pub fn with_random_perturbations(
        mut self,
        partial_unitary: Option<f64>,
        eigensolver: Option<f64>,
        seed: Option<u64>,
    ) -> Self {
        self.partial_unitary_random_perturbation = partial_unitary;
        self.eigensolver_random_perturbation = eigensolver;
        self.seed = seed;
        self
    }

    pub fn with_outer_loop_callback(mut self, callback: OuterLoopCallback) -> Self {
        self.outer_loop_callback = Some(callback);
        self
    }

    /// Spin orbitals `N` of the full space.
    pub fn num_full_spin_orbitals(&self) -> usize {
        match (&self.problem, &self.integral_tensors) {
            (_, Some(tensors)) => tensors.num_spin_orbitals(),
            (Some(problem), None) => problem.num_spin_orbitals(),
            (None, None) => 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.problem.is_some() == self.integral_tensors.is_some() {
            bail!("Exactly one of problem and integral_tensors must be provided");
        }
        if let Some(tensors) = &self.integral_tensors {
            tensors.validate()?;
        }
        let full = self.num_full_spin_orbitals();
        let m = self.num_spin_orbitals;
        if m == 0 || m % 2 != 0 {
            bail!("Active spin orbitals must be even and positive, got {}", m);
        }
        if m > full {
            bail!("{} active spin orbitals exceed the {} available", m, full);
        }
        if self.excited_states_solver.num_spin_orbitals() != m {
            bail!(
                "Excited-state solver acts on {} spin orbitals, expected {}",
                self.excited_states_solver.num_spin_orbitals(),
                m
            );
        }
        let (n_alpha, n_beta) = self.excited_states_solver.num_particles;
        if n_alpha + n_beta > m || n_alpha > m / 2 || n_beta > m / 2 {
            bail!(
                "{:?} particles do not fit into {} active spin orbitals",
                (n_alpha, n_beta),
                m
            );
        }
        if let Some(problem) = &self.problem {
            if problem.num_particles != (n_alpha, n_beta) {
                bail!(
                    "Solver particle numbers {:?} differ from the problem's {:?}",
                    (n_alpha, n_beta),
                    problem.num_particles
                );
            }
        }
        if let Some(u) = &self.initial_partial_unitary {
            let expected = if self.spin_conserving {
                (full / 2, m / 2)
            } else {
                (full, m)
            };
            if u.shape() != expected {
                bail!(
                    "Initial partial unitary has shape {:?}, expected {:?}",
                    u.shape(),
                    expected
                );
            }
            let err = orthonormality_error(u);
            if err > ORTHONORMALITY_TOLERANCE {
                bail!("Initial partial unitary columns are not orthonormal (error {:.2e})", err);
            }
        }
        if let Some(weights) = &self.state_weights {
            let k = self.excited_states_solver.k;
            if weights.len() != k {
                bail!("{} state weights given for {} states", weights.len(), k);
            }
            if weights.iter().any(|&w| w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
                bail!("State weights must be non-negative with a positive sum");
            }
        }
        Ok(())
    }

    fn full_integrals(&self) -> Result<IntegralTensors> {
        match (&self.problem, &self.integral_tensors) {
            (_, Some(tensors)) => Ok(tensors.clone()),
            (Some(problem), None) => IntegralTensors::from_problem(problem),
            (None, None) => bail!("No integrals available"),
        }
    }

    fn weights(&self) -> Vec<f64> {
        match &self.state_weights {
            Some(w) => {
                let total: f64 = w.iter().sum();
                w.iter().map(|x| x / total).collect()
            }
            None => default_state_weights(self.excited_states_solver.k),
        }
    }

    /// Lowest `M/2` α and `M/2` β orbitals, in the optimized parametrization.
    fn initial_parameters(&self) -> DMatrix<f64> {
        if let Some(u) = &self.initial_partial_unitary {
            return u.clone();
        }
        let n = self.num_full_spin_orbitals() / 2;
        let m = self.num_spin_orbitals / 2;
        let spatial = DMatrix::identity(n, m);
        if self.spin_conserving {
            spatial
        } else {
            spin_block_diagonal(&spatial)
        }
    }

    fn expand(&self, parameters: &DMatrix<f64>) -> DMatrix<f64> {
        if self.spin_conserving {
            spin_block_diagonal(parameters)
        } else {
            parameters.clone()
        }
    }

    /// MC-VQE in the active space of `u`, returning the result and the
    /// state-averaged RDMs.
    fn solve_active_space(
        &self,
        integrals: &IntegralTensors,
        u: &DMatrix<f64>,
        weights: &[f64],
    ) -> Result<(EigensolverResult, ReducedDensityMatrices)> {
        let active = integrals.transform(u)?;
        let hamiltonian = self
            .mapper
            .map(&FermionicOp::electronic_hamiltonian(&active));
        let result = self.excited_states_solver.compute_eigenvalues(&hamiltonian)?;

        let rdms = result
            .eigenstates
            .iter()
            .map(|state| {
                measure_rdms(
                    state,
                    self.num_spin_orbitals,
                    self.mapper.as_ref(),
                    self.estimator.as_ref(),
                    self.wavefunction_real,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        let averaged = ReducedDensityMatrices::weighted_sum(&rdms, weights);

        let weighted: f64 = weights.iter().zip(&result.eigenvalues).map(|(w, e)| w * e).sum();
        let from_rdm = active.energy(&averaged);
        if (weighted - from_rdm).abs() > 1e-6 {
            warn!(
                "State-averaged energy from RDMs ({:.10}) differs from eigenvalues ({:.10})",
                from_rdm, weighted
            );
        }
        Ok((result, averaged))
    }

    fn optimize_orbitals(
        &self,
        integrals: &IntegralTensors,
        parameters: DMatrix<f64>,
        rdm: &ReducedDensityMatrices,
    ) -> Result<DMatrix<f64>> {
        let cost = |p: &DMatrix<f64>| active_space_energy(integrals, &self.expand(p), rdm);
        let gradient = |p: &DMatrix<f64>| -> Result<DMatrix<f64>> {
            let full = active_space_energy_gradient(integrals, &self.expand(p), rdm);
            Ok(if self.spin_conserving {
                fold_spin_blocks(&full)
            } else {
                full
            })
        };
        let result = self
            .partial_unitary_optimizer
            .minimize(&cost, Some(&gradient as &MatrixGradient), parameters)?;
        info!(
            "Orbital step: E_SA = {:.10}, iterations = {}, |grad| = {:.2e}",
            result.fun, result.nit, result.gradient_norm
        );
        Ok(result.u)
    }

    fn perturb(rng: &mut StdRng, values: &mut [f64], magnitude: f64) {
        for v in values.iter_mut() {
            *v += rng.gen_range(-magnitude..=magnitude);
        }
    }

    pub fn compute_energies(&mut self) -> Result<OptOrbResult> {
        self.validate()?;
        let integrals = self.full_integrals()?;
        let weights = self.weights();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!("");
        info!("===========================================");
        info!("    Orbital-Optimized MC-VQE");
        info!("===========================================");
        info!("Full spin orbitals: {}", integrals.num_spin_orbitals());
        info!("Active spin orbitals: {}", self.num_spin_orbitals);
        info!("Particles: {:?}", self.excited_states_solver.num_particles);
        info!("State weights: {:?}", weights);
        info!("Spin conserving: {}", self.spin_conserving);
        info!("Real wavefunction: {}", self.wavefunction_real);
        info!("Max outer iterations: {}", self.maxiter);
        info!("===========================================");

        let mut parameters = self.initial_parameters();
        let mut energy_history = Vec::new();
        let mut num_iterations = 0;
        let mut converged = false;
        let mut final_result = None;

        for iteration in 0..self.maxiter {
            if let Some(magnitude) = self.eigensolver_random_perturbation {
                let mut point = self.excited_states_solver.initial_point.clone().unwrap_or_else(|| {
                    vec![0.0; self.excited_states_solver.ansatz.num_parameters()]
                });
                Self::perturb(&mut rng, &mut point, magnitude);
                self.excited_states_solver.set_initial_point(Some(point));
            }

            let u = self.expand(&parameters);
            let (result, rdm) = self.solve_active_space(&integrals, &u, &weights)?;
            self.excited_states_solver
                .set_initial_point(Some(result.optimal_point.clone()));

            let energy: f64 = weights.iter().zip(&result.eigenvalues).map(|(w, e)| w * e).sum();
            info!(
                "Outer iteration {}: E_SA = {:.10}, eigenvalues = {:?}",
                iteration, energy, result.eigenvalues
            );
            if let Some(callback) = self.outer_loop_callback.as_mut() {
                callback(&OuterIteration {
                    iteration,
                    eigenvalues: &result.eigenvalues,
                    state_averaged_energy: energy,
                    partial_unitary: &u,
                });
            }

            let previous = energy_history.last().copied();
            energy_history.push(energy);
            if let Some(previous) = previous {
                if (energy - previous).abs() < self.stopping_tolerance {
                    converged = true;
                    final_result = Some(result);
                    break;
                }
            }

            parameters = self.optimize_orbitals(&integrals, parameters, &rdm)?;
            if let Some(magnitude) = self.partial_unitary_random_perturbation {
                Self::perturb(&mut rng, parameters.as_mut_slice(), magnitude);
                parameters = project(&parameters)?;
            }
            num_iterations = iteration + 1;
        }

        let mcvqe_result = match final_result {
            Some(result) => result,
            None => {
                if self.maxiter > 0 {
                    warn!(
                        "Orbital optimization did not converge in {} outer iterations",
                        self.maxiter
                    );
                }
                let u = self.expand(&parameters);
                let (result, _) = self.solve_active_space(&integrals, &u, &weights)?;
                result
            }
        };

        let eigenvalues = mcvqe_result.eigenvalues.clone();
        let total_energies = self.problem.as_ref().map(|problem| {
            eigenvalues
                .iter()
                .map(|&e| problem.total_energy(e))
                .collect::<Vec<f64>>()
        });

        info!("");
        info!("===========================================");
        info!("   Orbital-Optimized MC-VQE Summary");
        info!("===========================================");
        for (i, e) in eigenvalues.iter().enumerate() {
            match total_energies.as_ref() {
                Some(total) => info!("  State {}: E = {:.10} Eh (total {:.10} Eh)", i, e, total[i]),
                None => info!("  State {}: E = {:.10} Eh", i, e),
            }
        }
        info!("Outer iterations: {}, converged: {}", num_iterations, converged);
        info!("===========================================");

        Ok(OptOrbResult {
            eigenvalues,
            total_energies,
            partial_unitary: self.expand(&parameters),
            num_iterations,
            energy_history,
            converged,
            mcvqe_result,
        })
    }
}
