use crate::ansatz::UCCSD;
use crate::config::{Args, Config};
use crate::driver::{DistanceUnit, ElectronicStructureDriver, ElectronicStructureProblem, MoleculeSpec};
use crate::mcvqe_impl::{ReferenceExcitations, MCVQE};
use crate::optim_impl::{create_minimizer, Minimizer};
use crate::operators::JordanWignerMapper;
use crate::orbital_impl::{GradientMethod, OptOrbMCVQE, PartialUnitaryProjectionOptimizer};
use crate::statevector::{Estimator, StatevectorEstimator};
use color_eyre::eyre::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Run the reference RHF for the configured molecule.
pub fn build_problem(args: &Args, config: &Config) -> Result<ElectronicStructureProblem> {
    let molecule_params = &config.molecule;
    let basis = args
        .basis
        .clone()
        .or_else(|| molecule_params.basis.clone())
        .unwrap_or_else(|| "sto-3g".to_string());
    let unit: DistanceUnit = molecule_params
        .unit
        .as_deref()
        .unwrap_or("angstrom")
        .parse()?;

    let molecule = MoleculeSpec::new(&molecule_params.atom, &basis)
        .with_charge(molecule_params.charge.unwrap_or(0))
        .with_spin(molecule_params.spin.unwrap_or(0))
        .with_unit(unit);

    let scf = config.scf.clone().unwrap_or_default().with_defaults();
    let mut driver = ElectronicStructureDriver::new(molecule);
    if let Some(max_cycle) = scf.max_cycle {
        driver.max_cycle = max_cycle;
    }
    if let Some(threshold) = scf.convergence_threshold {
        driver.convergence_threshold = threshold;
    }
    if let Some(size) = scf.diis_subspace_size {
        driver.diis_subspace_size = size;
    }
    if let Some(dir) = &config.basis_dir {
        driver = driver.with_basis_dir(PathBuf::from(dir));
    }

    driver.run()
}

/// Active spin orbitals `M`, falling back to the full space.
pub fn resolve_active_space(
    args: &Args,
    config: &Config,
    problem: &ElectronicStructureProblem,
) -> Result<usize> {
    let num_spin_orbitals = args
        .num_spin_orbitals
        .or_else(|| {
            config
                .active_space
                .as_ref()
                .and_then(|space| space.num_spin_orbitals)
        })
        .unwrap_or_else(|| problem.num_spin_orbitals());

    if num_spin_orbitals % 2 != 0 {
        bail!(
            "Active space must hold an even number of spin orbitals, got {}",
            num_spin_orbitals
        );
    }
    let (n_alpha, n_beta) = problem.num_particles;
    if n_alpha.max(n_beta) > num_spin_orbitals / 2 {
        bail!(
            "{} active spin orbitals cannot hold {:?} particles",
            num_spin_orbitals,
            problem.num_particles
        );
    }
    Ok(num_spin_orbitals)
}

/// Assemble MC-VQE and its orbital-optimization driver from the configuration.
pub fn build_solver(
    problem: ElectronicStructureProblem,
    args: &Args,
    config: &Config,
) -> Result<OptOrbMCVQE> {
    let num_spin_orbitals = resolve_active_space(args, config, &problem)?;
    let num_particles = problem.num_particles;

    let mcvqe_params = config.mcvqe.clone().unwrap_or_default().with_defaults();
    let k = args.k.or(mcvqe_params.k).unwrap_or(2);
    let excitations: ReferenceExcitations =
        mcvqe_params.excitations.as_deref().unwrap_or("s").parse()?;
    let reps = mcvqe_params.reps.unwrap_or(1);
    let optimizer = create_minimizer(
        mcvqe_params.optimizer.as_deref().unwrap_or("lbfgs"),
        mcvqe_params.maxiter.unwrap_or(500),
        mcvqe_params.gtol.unwrap_or(1e-7),
    )?;

    let estimator: Arc<dyn Estimator> = Arc::new(StatevectorEstimator::new());
    let ansatz = UCCSD::new(num_spin_orbitals / 2, num_particles, reps);
    info!(
        "MC-VQE: k = {}, references = {}, UCCSD reps = {}, optimizer = {}",
        k,
        excitations,
        reps,
        optimizer.name()
    );
    let mcvqe = MCVQE::new(
        k,
        excitations,
        num_particles,
        Box::new(ansatz),
        optimizer,
        Arc::clone(&estimator),
    )?;

    let pu_params = config
        .partial_unitary
        .clone()
        .unwrap_or_default()
        .with_defaults();
    let gradient_method: GradientMethod = pu_params
        .gradient_method
        .as_deref()
        .unwrap_or("autograd")
        .parse()?;
    let pu_optimizer = PartialUnitaryProjectionOptimizer::new(
        pu_params.initial_bb_stepsize.unwrap_or(1e-3),
        pu_params.stopping_tolerance.unwrap_or(1e-5),
        pu_params.maxiter.unwrap_or(10000),
    )
    .with_gradient_method(gradient_method);

    let oo_params = config
        .orbital_optimization
        .clone()
        .unwrap_or_default()
        .with_defaults();
    let maxiter = args.maxiter.or(oo_params.maxiter).unwrap_or(20);
    let spin_conserving = !args.no_spin_conserving && oo_params.spin_conserving.unwrap_or(true);
    let wavefunction_real =
        !args.complex_wavefunction && oo_params.wavefunction_real.unwrap_or(true);
    info!(
        "Orbital optimization: M = {}, maxiter = {}, spin conserving = {}, real wavefunction = {}",
        num_spin_orbitals, maxiter, spin_conserving, wavefunction_real
    );

    let mut solver = OptOrbMCVQE::new(
        Some(problem),
        None,
        num_spin_orbitals,
        mcvqe,
        Box::new(JordanWignerMapper::new()),
        estimator,
        pu_optimizer,
        maxiter,
        wavefunction_real,
        spin_conserving,
    )?
    .with_stopping_tolerance(oo_params.stopping_tolerance.unwrap_or(1e-6))
    .with_random_perturbations(
        oo_params.partial_unitary_random_perturbation,
        oo_params.eigensolver_random_perturbation,
        args.seed.or(oo_params.seed),
    );
    if let Some(weights) = oo_params.state_weights {
        solver = solver.with_state_weights(weights)?;
    }

    Ok(solver)
}
