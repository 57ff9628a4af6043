extern crate nalgebra as na;

use color_eyre::eyre::{bail, Result};
use na::DMatrix;
use ndarray::Array4;

use super::rdm::ReducedDensityMatrices;
use crate::driver::ElectronicStructureProblem;

/// One- and two-electron integrals over spin orbitals.
///
/// Spin orbitals are blocked, `[α_0 .. α_{n-1}, β_0 .. β_{n-1}]`, and the
/// two-body tensor is in physicist order so that
/// `H = Σ h_pq a†_p a_q + ½ Σ <pq|rs> a†_p a†_q a_s a_r`.
#[derive(Debug, Clone)]
pub struct IntegralTensors {
    pub one_body: DMatrix<f64>,
    pub two_body: Array4<f64>,
}

/// Chemist `(pr|qs)` to physicist `<pq|rs>` index order.
pub fn to_physicist_ordering(chemist: &Array4<f64>) -> Array4<f64> {
    chemist.view().permuted_axes([0, 2, 1, 3]).to_owned()
}

impl IntegralTensors {
    pub fn new(one_body: DMatrix<f64>, two_body: Array4<f64>) -> Result<Self> {
        let tensors = IntegralTensors { one_body, two_body };
        tensors.validate()?;
        Ok(tensors)
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.one_body.nrows();
        if self.one_body.ncols() != n {
            bail!(
                "One-body tensor must be square, got {}x{}",
                n,
                self.one_body.ncols()
            );
        }
        if self.two_body.shape() != [n, n, n, n] {
            bail!(
                "Two-body tensor shape {:?} does not match {} spin orbitals",
                self.two_body.shape(),
                n
            );
        }
        if n == 0 || n % 2 != 0 {
            bail!("Number of spin orbitals must be even and positive, got {}", n);
        }
        Ok(())
    }

    pub fn num_spin_orbitals(&self) -> usize {
        self.one_body.nrows()
    }

    pub fn num_spatial_orbitals(&self) -> usize {
        self.one_body.nrows() / 2
    }

    /// Spin-orbital tensors from spatial `h_pq` and chemist `(pq|rs)`.
    pub fn from_spatial(h: &DMatrix<f64>, eri_chemist: &Array4<f64>) -> Result<Self> {
        let n = h.nrows();
        if h.ncols() != n || eri_chemist.shape() != [n, n, n, n] {
            bail!("Spatial integrals have inconsistent dimensions");
        }
        let m = 2 * n;

        let mut one_body = DMatrix::zeros(m, m);
        for p in 0..n {
            for q in 0..n {
                one_body[(p, q)] = h[(p, q)];
                one_body[(p + n, q + n)] = h[(p, q)];
            }
        }

        // <pq|rs> = (pr|qs) δ(σp,σr) δ(σq,σs)
        let mut two_body = Array4::zeros((m, m, m, m));
        for (sp, sq) in [(0, 0), (0, n), (n, 0), (n, n)] {
            for p in 0..n {
                for q in 0..n {
                    for r in 0..n {
                        for s in 0..n {
                            two_body[[p + sp, q + sq, r + sp, s + sq]] = eri_chemist[[p, r, q, s]];
                        }
                    }
                }
            }
        }

        IntegralTensors::new(one_body, two_body)
    }

    pub fn from_problem(problem: &ElectronicStructureProblem) -> Result<Self> {
        IntegralTensors::from_spatial(&problem.one_body, &problem.two_body)
    }

    /// Rotate into the space spanned by the columns of the real partial
    /// unitary `u` (`N × M`, `uᵀu = I`).
    pub fn transform(&self, u: &DMatrix<f64>) -> Result<IntegralTensors> {
        let n = self.num_spin_orbitals();
        if u.nrows() != n {
            bail!(
                "Partial unitary has {} rows but there are {} spin orbitals",
                u.nrows(),
                n
            );
        }
        let one_body = u.transpose() * &self.one_body * u;
        let two_body = transform_two_body(&self.two_body, u);
        IntegralTensors::new(one_body, two_body)
    }

    /// `Σ γ_pq h_pq + ½ Σ Γ_pqrs <pq|rs>`.
    pub fn energy(&self, rdm: &ReducedDensityMatrices) -> f64 {
        let one = self.one_body.component_mul(&rdm.one_body).sum();
        let two: f64 = self
            .two_body
            .iter()
            .zip(rdm.two_body.iter())
            .map(|(g, d)| g * d)
            .sum();
        one + 0.5 * two
    }
}

/// `G_xqrs = Σ U_bq U_cr U_ds g_xbcd`: every index but the first rotated.
pub fn half_transform_two_body(g: &Array4<f64>, u: &DMatrix<f64>) -> Array4<f64> {
    let n = u.nrows();
    let m = u.ncols();

    let mut t1 = Array4::<f64>::zeros((n, n, n, m));
    for a in 0..n {
        for b in 0..n {
            for c in 0..n {
                for s in 0..m {
                    t1[[a, b, c, s]] = (0..n).map(|d| g[[a, b, c, d]] * u[(d, s)]).sum();
                }
            }
        }
    }
    let mut t2 = Array4::<f64>::zeros((n, n, m, m));
    for a in 0..n {
        for b in 0..n {
            for r in 0..m {
                for s in 0..m {
                    t2[[a, b, r, s]] = (0..n).map(|c| t1[[a, b, c, s]] * u[(c, r)]).sum();
                }
            }
        }
    }
    let mut t3 = Array4::<f64>::zeros((n, m, m, m));
    for a in 0..n {
        for q in 0..m {
            for r in 0..m {
                for s in 0..m {
                    t3[[a, q, r, s]] = (0..n).map(|b| t2[[a, b, r, s]] * u[(b, q)]).sum();
                }
            }
        }
    }
    t3
}

/// `g'_pqrs = Σ U_ap U_bq U_cr U_ds g_abcd`.
pub fn transform_two_body(g: &Array4<f64>, u: &DMatrix<f64>) -> Array4<f64> {
    let n = u.nrows();
    let m = u.ncols();
    let t3 = half_transform_two_body(g, u);
    let mut out = Array4::<f64>::zeros((m, m, m, m));
    for p in 0..m {
        for q in 0..m {
            for r in 0..m {
                for s in 0..m {
                    out[[p, q, r, s]] = (0..n).map(|a| t3[[a, q, r, s]] * u[(a, p)]).sum();
                }
            }
        }
    }
    out
}
