extern crate nalgebra as na;

use na::DMatrix;
use ndarray::Array4;

/// Spin-orbital reduced density matrices.
///
/// `one_body[p, q] = <a†_p a_q>` and `two_body[p, q, r, s] = <a†_p a†_q a_s a_r>`,
/// matching the physicist-ordered integrals.
#[derive(Debug, Clone)]
pub struct ReducedDensityMatrices {
    pub one_body: DMatrix<f64>,
    pub two_body: Array4<f64>,
}

impl ReducedDensityMatrices {
    pub fn zeros(n: usize) -> Self {
        ReducedDensityMatrices {
            one_body: DMatrix::zeros(n, n),
            two_body: Array4::zeros((n, n, n, n)),
        }
    }

    pub fn num_spin_orbitals(&self) -> usize {
        self.one_body.nrows()
    }

    /// RDMs of a single determinant with the given occupied spin orbitals.
    pub fn from_occupations(n: usize, occupied: &[usize]) -> Self {
        let mut rdm = ReducedDensityMatrices::zeros(n);
        for &i in occupied {
            rdm.one_body[(i, i)] = 1.0;
            for &j in occupied {
                if i != j {
                    rdm.two_body[[i, j, i, j]] = 1.0;
                    rdm.two_body[[i, j, j, i]] = -1.0;
                }
            }
        }
        rdm
    }

    /// `Σ_i w_i D_i`.
    pub fn weighted_sum(rdms: &[ReducedDensityMatrices], weights: &[f64]) -> Self {
        let n = rdms.first().map(|r| r.num_spin_orbitals()).unwrap_or(0);
        let mut out = ReducedDensityMatrices::zeros(n);
        for (rdm, &w) in rdms.iter().zip(weights.iter()) {
            out.one_body += &rdm.one_body * w;
            out.two_body.scaled_add(w, &rdm.two_body);
        }
        out
    }

    /// Trace of the one-body matrix, i.e. the electron count.
    pub fn trace(&self) -> f64 {
        self.one_body.trace()
    }
}
