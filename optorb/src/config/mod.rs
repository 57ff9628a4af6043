//! Configuration management for orbital-optimized MC-VQE runs
//!
//! This module handles configuration structures and defaults. Every section
//! is optional except `molecule`; missing values are filled in by
//! `with_defaults`.

mod args;

pub use args::Args;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub molecule: MoleculeParams,
    /// Directory of `<basis>.<symbol>.nwchem` files
    pub basis_dir: Option<String>,
    pub scf: Option<ScfParams>,
    pub active_space: Option<ActiveSpaceParams>,
    pub mcvqe: Option<McvqeParams>,
    pub partial_unitary: Option<PartialUnitaryParams>,
    pub orbital_optimization: Option<OrbitalOptimizationParams>,
}

impl Config {
    pub fn with_defaults(mut self) -> Self {
        self.molecule = self.molecule.with_defaults();
        self.scf = Some(self.scf.unwrap_or_default().with_defaults());
        self.active_space = Some(self.active_space.unwrap_or_default().with_defaults());
        self.mcvqe = Some(self.mcvqe.unwrap_or_default().with_defaults());
        self.partial_unitary = Some(self.partial_unitary.unwrap_or_default().with_defaults());
        self.orbital_optimization = Some(
            self.orbital_optimization
                .unwrap_or_default()
                .with_defaults(),
        );
        self
    }
}

/// Molecule given the way electronic-structure drivers take it
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MoleculeParams {
    /// `;`-separated `Symbol x y z` entries
    pub atom: String,
    pub charge: Option<i32>,
    /// `n_alpha - n_beta`
    pub spin: Option<i32>,
    pub unit: Option<String>,
    pub basis: Option<String>,
}

impl MoleculeParams {
    pub fn with_defaults(mut self) -> Self {
        if self.charge.is_none() {
            self.charge = Some(0);
        }
        if self.spin.is_none() {
            self.spin = Some(0);
        }
        if self.unit.is_none() {
            self.unit = Some("angstrom".to_string());
        }
        if self.basis.is_none() {
            self.basis = Some("sto-3g".to_string());
        }
        self
    }
}

/// RHF parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScfParams {
    pub max_cycle: Option<usize>,
    pub diis_subspace_size: Option<usize>,
    pub convergence_threshold: Option<f64>,
}

impl Default for ScfParams {
    fn default() -> Self {
        ScfParams {
            max_cycle: Some(100),
            diis_subspace_size: Some(8),
            convergence_threshold: Some(1e-10),
        }
    }
}

impl ScfParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.max_cycle.is_none() {
            self.max_cycle = defaults.max_cycle;
        }
        if self.diis_subspace_size.is_none() {
            self.diis_subspace_size = defaults.diis_subspace_size;
        }
        if self.convergence_threshold.is_none() {
            self.convergence_threshold = defaults.convergence_threshold;
        }
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ActiveSpaceParams {
    /// Defaults to the full spin-orbital space
    pub num_spin_orbitals: Option<usize>,
}

impl ActiveSpaceParams {
    pub fn with_defaults(self) -> Self {
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct McvqeParams {
    pub k: Option<usize>,
    /// "s" or "sd"
    pub excitations: Option<String>,
    pub reps: Option<usize>,
    /// "lbfgs" or "sd"
    pub optimizer: Option<String>,
    pub maxiter: Option<usize>,
    pub gtol: Option<f64>,
}

impl Default for McvqeParams {
    fn default() -> Self {
        McvqeParams {
            k: Some(2),
            excitations: Some("s".to_string()),
            reps: Some(1),
            optimizer: Some("lbfgs".to_string()),
            maxiter: Some(500),
            gtol: Some(1e-7),
        }
    }
}

impl McvqeParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.k.is_none() {
            self.k = defaults.k;
        }
        if self.excitations.is_none() {
            self.excitations = defaults.excitations;
        }
        if self.reps.is_none() {
            self.reps = defaults.reps;
        }
        if self.optimizer.is_none() {
            self.optimizer = defaults.optimizer;
        }
        if self.maxiter.is_none() {
            self.maxiter = defaults.maxiter;
        }
        if self.gtol.is_none() {
            self.gtol = defaults.gtol;
        }
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PartialUnitaryParams {
    pub initial_bb_stepsize: Option<f64>,
    pub stopping_tolerance: Option<f64>,
    pub maxiter: Option<usize>,
    /// "autograd" or "finite_difference"
    pub gradient_method: Option<String>,
}

impl Default for PartialUnitaryParams {
    fn default() -> Self {
        PartialUnitaryParams {
            initial_bb_stepsize: Some(1e-3),
            stopping_tolerance: Some(1e-5),
            maxiter: Some(10000),
            gradient_method: Some("autograd".to_string()),
        }
    }
}

impl PartialUnitaryParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.initial_bb_stepsize.is_none() {
            self.initial_bb_stepsize = defaults.initial_bb_stepsize;
        }
        if self.stopping_tolerance.is_none() {
            self.stopping_tolerance = defaults.stopping_tolerance;
        }
        if self.maxiter.is_none() {
            self.maxiter = defaults.maxiter;
        }
        if self.gradient_method.is_none() {
            self.gradient_method = defaults.gradient_method;
        }
        self
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OrbitalOptimizationParams {
    pub maxiter: Option<usize>,
    pub stopping_tolerance: Option<f64>,
    pub spin_conserving: Option<bool>,
    pub wavefunction_real: Option<bool>,
    pub state_weights: Option<Vec<f64>>,
    pub partial_unitary_random_perturbation: Option<f64>,
    pub eigensolver_random_perturbation: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for OrbitalOptimizationParams {
    fn default() -> Self {
        OrbitalOptimizationParams {
            maxiter: Some(20),
            stopping_tolerance: Some(1e-6),
            spin_conserving: Some(true),
            wavefunction_real: Some(true),
            state_weights: None,
            partial_unitary_random_perturbation: None,
            eigensolver_random_perturbation: None,
            seed: None,
        }
    }
}

impl OrbitalOptimizationParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.maxiter.is_none() {
            self.maxiter = defaults.maxiter;
        }
        if self.stopping_tolerance.is_none() {
            self.stopping_tolerance = defaults.stopping_tolerance;
        }
        if self.spin_conserving.is_none() {
            self.spin_conserving = defaults.spin_conserving;
        }
        if self.wavefunction_real.is_none() {
            self.wavefunction_real = defaults.wavefunction_real;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let yaml = "molecule:\n  atom: \"H 0 0 0; H 0 0 0.735\"\n  basis: 6-31g\n";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.molecule.charge, Some(0));
        assert_eq!(config.molecule.unit.as_deref(), Some("angstrom"));
        assert_eq!(config.molecule.basis.as_deref(), Some("6-31g"));
        let mcvqe = config.mcvqe.unwrap();
        assert_eq!(mcvqe.k, Some(2));
        assert_eq!(mcvqe.excitations.as_deref(), Some("s"));
        let pu = config.partial_unitary.unwrap();
        assert_eq!(pu.maxiter, Some(10000));
        assert_eq!(pu.initial_bb_stepsize, Some(1e-3));
        let oo = config.orbital_optimization.unwrap();
        assert_eq!(oo.maxiter, Some(20));
        assert_eq!(oo.spin_conserving, Some(true));
        assert!(config.active_space.unwrap().num_spin_orbitals.is_none());
    }

    #[test]
    fn test_partial_sections_keep_given_values() {
        let yaml = r#"
molecule:
  atom: "H 0 0 0; H 0 0 1.4"
  unit: bohr
active_space:
  num_spin_orbitals: 4
orbital_optimization:
  maxiter: 3
  wavefunction_real: false
  state_weights: [0.5, 0.5]
partial_unitary:
  gradient_method: finite_difference
"#;
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.active_space.unwrap().num_spin_orbitals, Some(4));
        let oo = config.orbital_optimization.unwrap();
        assert_eq!(oo.maxiter, Some(3));
        assert_eq!(oo.wavefunction_real, Some(false));
        assert_eq!(oo.spin_conserving, Some(true));
        assert_eq!(oo.state_weights, Some(vec![0.5, 0.5]));
        let pu = config.partial_unitary.unwrap();
        assert_eq!(pu.gradient_method.as_deref(), Some("finite_difference"));
        assert_eq!(pu.stopping_tolerance, Some(1e-5));
    }

    #[test]
    fn test_missing_molecule_is_an_error() {
        assert!(serde_yml::from_str::<Config>("mcvqe:\n  k: 2\n").is_err());
    }
}
