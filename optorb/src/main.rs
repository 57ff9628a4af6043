//! Orbital-optimized MC-VQE command-line interface
//!
//! Reads a YAML configuration, runs the reference RHF and then the
//! orbital-optimized MC-VQE outer loop.

use color_eyre::eyre::Result;
use optorb::app::OptOrbApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    OptOrbApplication::from_cli()?.run()
}
