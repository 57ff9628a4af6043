//! Logging setup and result formatting

use color_eyre::eyre::Result;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

use crate::orbital_impl::OptOrbResult;

/// Wall-clock timer printed as HH:MM:SS
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let total_seconds = StdSystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        write!(
            w,
            "{:02}:{:02}:{:02}",
            (total_seconds / 3600) % 24,
            (total_seconds / 60) % 60,
            total_seconds % 60
        )
    }
}

/// Route tracing output to a file (no ANSI colours) or to stdout.
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => match File::create(path) {
            Ok(log) => {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            }
            Err(_) => eprintln!("Could not create output file: {}", path),
        },
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
        }
    }
}

/// Write the converged eigenvalues in a plain table.
pub fn write_energies<W: Write>(writer: &mut W, result: &OptOrbResult) -> Result<()> {
    writeln!(writer, "State   Electronic (Eh)     Total (Eh)")?;
    for (i, e) in result.eigenvalues.iter().enumerate() {
        match result.total_energies.as_ref() {
            Some(total) => writeln!(writer, "{:>5}   {:>16.10}   {:>16.10}", i, e, total[i])?,
            None => writeln!(writer, "{:>5}   {:>16.10}   {:>16}", i, e, "-")?,
        }
    }
    writeln!(
        writer,
        "Outer iterations: {}, converged: {}",
        result.num_iterations, result.converged
    )?;
    Ok(())
}
