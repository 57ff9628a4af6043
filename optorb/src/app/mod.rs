mod report;
mod runner;

pub use runner::{build_problem, build_solver, resolve_active_space};

use self::report::{report_problem_summary, report_optorb_summary};
use crate::config::{Args, Config};
use crate::io::setup_output;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

pub struct OptOrbApplication {
    args: Args,
    config: Config,
}

impl OptOrbApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref());
        info!("Configuration loaded from: {}", self.args.config_file);

        let problem = build_problem(&self.args, &self.config)?;
        report_problem_summary(&problem);

        let mut solver = build_solver(problem, &self.args, &self.config)?;
        let result = solver.compute_energies()?;
        report_optorb_summary(&result)?;

        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config_content = fs::read_to_string(&args.config_file)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", args.config_file))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}
