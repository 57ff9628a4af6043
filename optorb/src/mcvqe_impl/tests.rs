//! Tests for the MC-VQE solver on a two-orbital model Hamiltonian

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::ansatz::{HartreeFock, UCCSD};
    use crate::driver::sorted_symmetric_eigen;
    use crate::integrals::IntegralTensors;
    use crate::operators::{FermionicOp, JordanWignerMapper, QubitMapper, SparsePauliOp};
    use crate::optim_impl::LBFGS;
    use crate::statevector::{Estimator, Statevector, StatevectorEstimator};
    use nalgebra::DMatrix;
    use ndarray::Array4;
    use std::str::FromStr;
    use std::sync::Arc;

    fn model_hamiltonian() -> SparsePauliOp {
        let h = DMatrix::from_row_slice(2, 2, &[-1.25, 0.0, 0.0, -0.47]);
        let mut eri = Array4::zeros((2, 2, 2, 2));
        let values = [
            ((0, 0, 0, 0), 0.67),
            ((1, 1, 1, 1), 0.70),
            ((0, 0, 1, 1), 0.66),
            ((0, 1, 0, 1), 0.18),
        ];
        for &((i, j, k, l), v) in values.iter() {
            for (a, b, c, d) in [
                (i, j, k, l),
                (j, i, k, l),
                (i, j, l, k),
                (j, i, l, k),
                (k, l, i, j),
                (l, k, i, j),
                (k, l, j, i),
                (l, k, j, i),
            ] {
                eri[[a, b, c, d]] = v;
            }
        }
        let ints = IntegralTensors::from_spatial(&h, &eri).unwrap();
        JordanWignerMapper::new().map(&FermionicOp::electronic_hamiltonian(&ints))
    }

    /// Exact eigenvalues in the two-electron, zero-Sz sector.
    fn sector_eigenvalues(hamiltonian: &SparsePauliOp) -> Vec<f64> {
        let dets = [0b0101u64, 0b0110, 0b1001, 0b1010];
        let states: Vec<Statevector> = dets
            .iter()
            .map(|&d| Statevector::from_basis_state(4, d))
            .collect();
        let m = DMatrix::from_fn(4, 4, |i, j| {
            states[i]
                .inner(&states[j].apply(hamiltonian).unwrap())
                .re
        });
        sorted_symmetric_eigen(m).0.iter().copied().collect()
    }

    fn solver(k: usize, excitations: &str) -> MCVQE {
        MCVQE::new(
            k,
            ReferenceExcitations::from_str(excitations).unwrap(),
            (1, 1),
            Box::new(UCCSD::new(2, (1, 1), 1)),
            Box::new(LBFGS::new(200, 1e-7)),
            Arc::new(StatevectorEstimator::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_excitations_parse() {
        assert_eq!(
            ReferenceExcitations::from_str("S").unwrap(),
            ReferenceExcitations::Singles
        );
        assert_eq!(
            ReferenceExcitations::from_str("sd").unwrap(),
            ReferenceExcitations::SinglesDoubles
        );
        assert!(ReferenceExcitations::from_str("sdt").is_err());
    }

    #[test]
    fn test_excited_configurations() {
        let hf = HartreeFock::new(2, (1, 1));
        assert_eq!(
            excited_configurations(&hf, ReferenceExcitations::Singles),
            vec![0b0110, 0b1001]
        );
        assert_eq!(
            excited_configurations(&hf, ReferenceExcitations::SinglesDoubles),
            vec![0b0110, 0b1001, 0b1010]
        );
    }

    #[test]
    fn test_reference_states_are_orthonormal() {
        let hamiltonian = model_hamiltonian();
        let est = StatevectorEstimator::new();
        let hf = HartreeFock::new(2, (1, 1));
        let refs =
            build_reference_states(&hamiltonian, &est, &hf, ReferenceExcitations::SinglesDoubles, 3)
                .unwrap();
        assert_eq!(refs.len(), 3);
        for i in 0..3 {
            for j in 0..3 {
                let overlap = refs[i].inner(&refs[j]);
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((overlap.re - expected).abs() < 1e-12);
            }
        }
        assert!(build_reference_states(&hamiltonian, &est, &hf, ReferenceExcitations::Singles, 4)
            .is_err());
    }

    #[test]
    fn test_mcvqe_eigenvalues_bounded_by_exact_spectrum() {
        let hamiltonian = model_hamiltonian();
        let exact = sector_eigenvalues(&hamiltonian);
        let hf_energy = StatevectorEstimator::new()
            .estimate(&HartreeFock::new(2, (1, 1)).state(), &hamiltonian)
            .unwrap();

        let result = solver(2, "s").compute_eigenvalues(&hamiltonian).unwrap();
        assert_eq!(result.eigenvalues.len(), 2);
        assert_eq!(result.optimal_point.len(), 3);
        assert!(result.cost_function_evals > 0);
        assert!(result.eigenvalues[0] <= result.eigenvalues[1]);
        // interlacing for a two-dimensional subspace of the sector
        assert!(result.eigenvalues[0] >= exact[0] - 1e-9);
        assert!(result.eigenvalues[1] >= exact[1] - 1e-9);
        assert!(result.eigenvalues[0] <= hf_energy + 1e-12);

        let trace: f64 = result.reference_energies.iter().sum();
        assert!((trace - result.optimal_value).abs() < 1e-9);
        assert!((trace - result.eigenvalues.iter().sum::<f64>()).abs() < 1e-9);

        // eigenstates are normalized eigenvectors of the subspace problem
        let est = StatevectorEstimator::new();
        for (state, e) in result.eigenstates.iter().zip(result.eigenvalues.iter()) {
            assert!((state.norm() - 1.0).abs() < 1e-10);
            assert!((est.estimate(state, &hamiltonian).unwrap() - e).abs() < 1e-10);
        }
    }

    #[test]
    fn test_single_state_reaches_ground_state() {
        // one reference: plain VQE, UCCSD is exact for two electrons in two orbitals
        let hamiltonian = model_hamiltonian();
        let exact = sector_eigenvalues(&hamiltonian);
        let result = solver(1, "s").compute_eigenvalues(&hamiltonian).unwrap();
        assert!((result.eigenvalues[0] - exact[0]).abs() < 1e-7);
    }

    #[test]
    fn test_initial_point_validation() {
        let hamiltonian = model_hamiltonian();
        let mut mcvqe = solver(2, "s");
        mcvqe.set_initial_point(Some(vec![0.0; 2]));
        assert!(mcvqe.compute_eigenvalues(&hamiltonian).is_err());

        let warm = solver(2, "s").compute_eigenvalues(&hamiltonian).unwrap();
        mcvqe.set_initial_point(Some(warm.optimal_point.clone()));
        let again = mcvqe.compute_eigenvalues(&hamiltonian).unwrap();
        assert!((again.eigenvalues[0] - warm.eigenvalues[0]).abs() < 1e-7);
    }

    #[test]
    fn test_invalid_constructor_arguments() {
        let build = |k: usize, particles: (usize, usize)| {
            MCVQE::new(
                k,
                ReferenceExcitations::Singles,
                particles,
                Box::new(UCCSD::new(2, (1, 1), 1)),
                Box::new(LBFGS::default()),
                Arc::new(StatevectorEstimator::new()),
            )
        };
        assert!(build(0, (1, 1)).is_err());
        assert!(build(2, (3, 1)).is_err());
        assert!(build(2, (1, 1)).is_ok());
    }
}
