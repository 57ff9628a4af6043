//! Active-space energy as a function of the partial unitary, and its gradient

use color_eyre::eyre::Result;
use nalgebra::DMatrix;
use ndarray::Array4;

use crate::integrals::{half_transform_two_body, IntegralTensors, ReducedDensityMatrices};

/// `E(U) = Σ γ_pq (UᵀhU)_pq + ½ Σ Γ_pqrs g'_pqrs(U)`.
pub fn active_space_energy(
    integrals: &IntegralTensors,
    u: &DMatrix<f64>,
    rdm: &ReducedDensityMatrices,
) -> Result<f64> {
    Ok(integrals.transform(u)?.energy(rdm))
}

/// `Σ_xqrs Γ_yqrs G_xqrs` with `G` the half-transformed `g`.
fn contract_half_transformed(
    g: &Array4<f64>,
    gamma: &Array4<f64>,
    u: &DMatrix<f64>,
) -> DMatrix<f64> {
    let n = u.nrows();
    let m = u.ncols();
    let half = half_transform_two_body(g, u);
    let mut out = DMatrix::zeros(n, m);
    for x in 0..n {
        for y in 0..m {
            let mut acc = 0.0;
            for q in 0..m {
                for r in 0..m {
                    for s in 0..m {
                        acc += gamma[[y, q, r, s]] * half[[x, q, r, s]];
                    }
                }
            }
            out[(x, y)] = acc;
        }
    }
    out
}

/// `∂E/∂U` for a real `N × M` partial unitary.
///
/// The one-body part is `hUγᵀ + hᵀUγ`; the two-body part sums the four
/// contractions with one integral index left unrotated.
pub fn active_space_energy_gradient(
    integrals: &IntegralTensors,
    u: &DMatrix<f64>,
    rdm: &ReducedDensityMatrices,
) -> DMatrix<f64> {
    let h = &integrals.one_body;
    let gamma = &rdm.one_body;
    let mut grad = h * u * gamma.transpose() + h.transpose() * u * gamma;

    for axes in [[0, 1, 2, 3], [1, 0, 2, 3], [2, 1, 0, 3], [3, 1, 2, 0]] {
        let g = integrals
            .two_body
            .view()
            .permuted_axes(axes)
            .as_standard_layout()
            .into_owned();
        let big_gamma = rdm
            .two_body
            .view()
            .permuted_axes(axes)
            .as_standard_layout()
            .into_owned();
        grad += contract_half_transformed(&g, &big_gamma, u) * 0.5;
    }
    grad
}

/// `U_σ ⊕ U_σ` in blocked spin order.
pub fn spin_block_diagonal(spatial: &DMatrix<f64>) -> DMatrix<f64> {
    let (n, m) = spatial.shape();
    let mut full = DMatrix::zeros(2 * n, 2 * m);
    full.view_mut((0, 0), (n, m)).copy_from(spatial);
    full.view_mut((n, m), (n, m)).copy_from(spatial);
    full
}

/// Gradient with respect to the shared spatial block: both spin blocks summed.
pub fn fold_spin_blocks(full: &DMatrix<f64>) -> DMatrix<f64> {
    let n = full.nrows() / 2;
    let m = full.ncols() / 2;
    full.view((0, 0), (n, m)) + full.view((n, m), (n, m))
}
