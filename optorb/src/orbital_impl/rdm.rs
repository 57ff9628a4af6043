//! Density matrices measured through the qubit mapping
//!
//! Every element `<a†_p a_q>` or `<a†_p a†_q a_s a_r>` is mapped with the
//! configured mapper and evaluated with the estimator, the same way the
//! energy itself is obtained.

use color_eyre::eyre::Result;
use rayon::prelude::*;

use crate::integrals::ReducedDensityMatrices;
use crate::operators::{FermionicOp, QubitMapper};
use crate::statevector::{Estimator, Statevector};

fn element(
    op: &FermionicOp,
    state: &Statevector,
    mapper: &dyn QubitMapper,
    estimator: &dyn Estimator,
) -> Result<f64> {
    Ok(estimator.estimate_complex(state, &mapper.map(op))?.re)
}

/// 1- and 2-RDMs of `state` over `n` spin orbitals.
///
/// With `wavefunction_real` only the elements unique under `γ_pq = γ_qp`,
/// `Γ_pqrs = Γ_rspq` and pair antisymmetry are measured and then mirrored.
/// Otherwise all elements are measured and the real part of the Hermitian
/// average is kept.
pub fn measure_rdms(
    state: &Statevector,
    n: usize,
    mapper: &dyn QubitMapper,
    estimator: &dyn Estimator,
    wavefunction_real: bool,
) -> Result<ReducedDensityMatrices> {
    let mut rdm = ReducedDensityMatrices::zeros(n);

    let one_body_indices: Vec<(usize, usize)> = (0..n)
        .flat_map(|p| (0..n).map(move |q| (p, q)))
        .filter(|&(p, q)| !wavefunction_real || p <= q)
        .collect();
    let one_body: Vec<f64> = one_body_indices
        .par_iter()
        .map(|&(p, q)| element(&FermionicOp::one_body_density(n, p, q), state, mapper, estimator))
        .collect::<Result<_>>()?;
    for (&(p, q), &v) in one_body_indices.iter().zip(one_body.iter()) {
        rdm.one_body[(p, q)] = v;
        if wavefunction_real {
            rdm.one_body[(q, p)] = v;
        }
    }

    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|p| (0..n).map(move |q| (p, q)))
        .filter(|&(p, q)| if wavefunction_real { p < q } else { p != q })
        .collect();
    let two_body_indices: Vec<((usize, usize), (usize, usize))> = pairs
        .iter()
        .flat_map(|&pq| pairs.iter().map(move |&rs| (pq, rs)))
        .filter(|&(pq, rs)| !wavefunction_real || pq <= rs)
        .collect();
    let two_body: Vec<f64> = two_body_indices
        .par_iter()
        .map(|&((p, q), (r, s))| {
            element(&FermionicOp::two_body_density(n, p, q, r, s), state, mapper, estimator)
        })
        .collect::<Result<_>>()?;
    for (&((p, q), (r, s)), &v) in two_body_indices.iter().zip(two_body.iter()) {
        if wavefunction_real {
            for ((a, b, c, d), sign) in [
                ((p, q, r, s), 1.0),
                ((q, p, r, s), -1.0),
                ((p, q, s, r), -1.0),
                ((q, p, s, r), 1.0),
            ] {
                rdm.two_body[[a, b, c, d]] = sign * v;
                rdm.two_body[[c, d, a, b]] = sign * v;
            }
        } else {
            rdm.two_body[[p, q, r, s]] = v;
        }
    }

    if !wavefunction_real {
        let gamma = rdm.one_body.clone();
        rdm.one_body = (&gamma + gamma.transpose()) * 0.5;
        let big_gamma = rdm.two_body.clone();
        let swapped = big_gamma.view().permuted_axes([2, 3, 0, 1]);
        rdm.two_body = (&big_gamma + &swapped) * 0.5;
    }
    Ok(rdm)
}
