//! Basis set loading utilities

use basis::cgto::AtomicBasis;
use basis::library;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::fs;
use std::path::Path;
use tracing::info;

/// File name used for locally stored basis sets, e.g. `6-31g.h.nwchem`.
pub fn local_basis_filename(basis_name: &str, atomic_symbol: &str) -> String {
    format!(
        "{}.{}.nwchem",
        basis_name.to_lowercase(),
        atomic_symbol.to_lowercase()
    )
}

/// Resolve the basis for one element.
///
/// Lookup order: embedded library, `<basis_dir>/<basis>.<symbol>.nwchem`,
/// then the Basis Set Exchange REST API.
pub fn fetch_basis(
    atomic_symbol: &str,
    basis_name: &str,
    basis_dir: Option<&Path>,
) -> Result<AtomicBasis> {
    if library::builtin_text(atomic_symbol, basis_name).is_some() {
        info!("Using built-in {} basis for {}", basis_name, atomic_symbol);
        return library::builtin(atomic_symbol, basis_name)
            .map_err(|e| eyre!("Built-in basis for {} is invalid: {}", atomic_symbol, e));
    }

    if let Some(dir) = basis_dir {
        let local_path = dir.join(local_basis_filename(basis_name, atomic_symbol));
        if local_path.exists() {
            info!("Loading basis from local file: {}", local_path.display());
            let basis_str = fs::read_to_string(&local_path).wrap_err_with(|| {
                format!("Failed to read local basis set file: {}", local_path.display())
            })?;
            return AtomicBasis::parse_nwchem(basis_name, &basis_str)
                .map_err(|e| eyre!("Failed to parse {}: {}", local_path.display(), e));
        }
    }

    let url = format!(
        "https://www.basissetexchange.org/api/basis/{}/format/nwchem?elements={}",
        basis_name.to_lowercase(),
        atomic_symbol
    );
    info!("Fetching {} basis for {} from {}", basis_name, atomic_symbol, url);
    let response = reqwest::blocking::get(&url)
        .wrap_err_with(|| format!("Failed to fetch basis set for {}", atomic_symbol))?;
    let basis_str = response
        .text()
        .wrap_err("Failed to get response text from basis set API")?;
    AtomicBasis::parse_nwchem(basis_name, &basis_str)
        .map_err(|e| eyre!("Downloaded basis for {} is invalid: {}", atomic_symbol, e))
}
