//! Command-line argument parsing

use clap::Parser;

/// Orbital-optimized MC-VQE with YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the number of outer orbital-optimization iterations
    #[arg(long)]
    pub maxiter: Option<usize>,

    /// Override the number of MC-VQE states
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Override the number of active spin orbitals
    #[arg(long)]
    pub num_spin_orbitals: Option<usize>,

    /// Override the basis set name
    #[arg(long)]
    pub basis: Option<String>,

    /// Optimize separate α and β orbitals
    #[arg(long)]
    pub no_spin_conserving: bool,

    /// Measure every density-matrix element instead of the real-symmetric subset
    #[arg(long)]
    pub complex_wavefunction: bool,

    /// Seed for the random perturbations
    #[arg(long)]
    pub seed: Option<u64>,
}
