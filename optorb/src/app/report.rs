use crate::driver::ElectronicStructureProblem;
use crate::io::write_energies;
use crate::orbital_impl::OptOrbResult;
use color_eyre::eyre::Result;
use tracing::{info, warn};

pub fn report_problem_summary(problem: &ElectronicStructureProblem) {
    info!("\nElectronic structure problem:");
    info!(
        "  Spatial orbitals: {}, particles (α, β): {:?}",
        problem.num_spatial_orbitals, problem.num_particles
    );
    info!("  Hartree-Fock total energy: {:.10} au", problem.reference_energy);
    if !problem.scf_converged {
        warn!("Reference SCF did not converge");
    }
}

pub fn report_optorb_summary(result: &OptOrbResult) -> Result<()> {
    info!("\nOrbital-optimized MC-VQE finished.");
    info!("\nState-averaged energy per outer iteration:");
    for (i, energy) in result.energy_history.iter().enumerate() {
        info!("  Iteration {:>3}: {:.10} au", i, energy);
    }

    let mut table = Vec::new();
    write_energies(&mut table, result)?;
    info!("\nFinal energies:");
    for line in String::from_utf8_lossy(&table).lines() {
        info!("  {}", line);
    }

    info!(
        "\nPartial unitary: {} x {}",
        result.partial_unitary.nrows(),
        result.partial_unitary.ncols()
    );
    Ok(())
}
