#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::integrals::{IntegralTensors, ReducedDensityMatrices};
    use crate::statevector::{Estimator, Statevector, StatevectorEstimator};
    use nalgebra::DMatrix;
    use ndarray::Array4;
    use num_complex::Complex64;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn single(n: usize, op: Ladder) -> FermionicOp {
        let mut f = FermionicOp::new(n);
        f.push(vec![op], c(1.0));
        f
    }

    #[test]
    fn test_pauli_compose_and_adjoint() {
        // X Z = -i Y, Z X = i Y
        let x = PauliTerm::new(1, 0, c(1.0));
        let z = PauliTerm::new(0, 1, c(1.0));
        let xz = x.compose(&z);
        let zx = z.compose(&x);
        assert_eq!((xz.x, xz.z), (1, 1));
        assert_eq!(xz.coeff, c(1.0));
        assert_eq!(zx.coeff, c(-1.0));
        assert_eq!(xz.adjoint().coeff, c(-1.0));

        let (label, coeff) = xz.label(1);
        assert_eq!(label, "Y");
        assert_eq!(coeff, Complex64::new(0.0, -1.0));
    }

    #[test]
    fn test_simplify_merges_and_prunes() {
        let op = SparsePauliOp::from_terms(
            2,
            vec![
                PauliTerm::new(1, 0, c(0.5)),
                PauliTerm::new(1, 0, c(0.5)),
                PauliTerm::new(0, 2, c(1e-15)),
            ],
        )
        .simplify();
        assert_eq!(op.len(), 1);
        assert_eq!(op.terms()[0].coeff, c(1.0));
    }

    #[test]
    fn test_number_operator_labels() {
        let mapper = JordanWignerMapper::new();
        let n0 = mapper.map(&FermionicOp::one_body_density(2, 0, 0));
        let mut list = n0.to_list();
        list.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].0, "II");
        assert!((list[0].1 - c(0.5)).norm() < 1e-15);
        assert_eq!(list[1].0, "IZ");
        assert!((list[1].1 - c(-0.5)).norm() < 1e-15);
    }

    #[test]
    fn test_jordan_wigner_creation_signs() {
        let mapper = JordanWignerMapper::new();
        let a2_dag = mapper.map(&single(3, Ladder::Create(2)));
        // orbital 0 occupied: one Z in the string below orbital 2
        let sv = Statevector::from_basis_state(3, 0b001).apply(&a2_dag).unwrap();
        assert_eq!(sv.amplitudes()[0b101], c(-1.0));
        // Pauli exclusion
        let occupied = Statevector::from_basis_state(3, 0b100).apply(&a2_dag).unwrap();
        assert!(occupied.norm() < 1e-15);
    }

    #[test]
    fn test_canonical_anticommutation() {
        let mapper = JordanWignerMapper::new();
        let n = 3;
        for p in 0..n {
            for q in 0..n {
                let a = mapper.map(&single(n, Ladder::Annihilate(p)));
                let b = mapper.map(&single(n, Ladder::Create(q)));
                let anti = (&a * &b + &b * &a).simplify();
                if p == q {
                    assert_eq!(anti.len(), 1);
                    assert_eq!((anti.terms()[0].x, anti.terms()[0].z), (0, 0));
                    assert!((anti.terms()[0].coeff - c(1.0)).norm() < 1e-14);
                } else {
                    assert!(anti.is_empty(), "{{a_{}, a+_{}}} = {}", p, q, anti);
                }
            }
        }
    }

    #[test]
    fn test_fermionic_adjoint() {
        let op = FermionicOp::two_body_density(4, 0, 1, 2, 3);
        let adj = op.adjoint();
        assert_eq!(
            adj.terms()[0].0,
            vec![
                Ladder::Create(2),
                Ladder::Create(3),
                Ladder::Annihilate(1),
                Ladder::Annihilate(0)
            ]
        );
        let mapper = JordanWignerMapper::new();
        let mapped_adj = mapper.map(&adj);
        let adj_mapped = mapper.map(&op).adjoint().simplify();
        assert_eq!(mapped_adj, adj_mapped);
    }

    fn model_integrals() -> IntegralTensors {
        let h = DMatrix::from_row_slice(2, 2, &[-1.1, 0.2, 0.2, -0.3]);
        let mut eri = Array4::zeros((2, 2, 2, 2));
        let values = [
            ((0, 0, 0, 0), 0.6),
            ((1, 1, 1, 1), 0.55),
            ((0, 0, 1, 1), 0.5),
            ((0, 1, 0, 1), 0.15),
            ((0, 0, 0, 1), 0.04),
            ((0, 1, 1, 1), 0.02),
        ];
        for &((i, j, k, l), v) in values.iter() {
            for (a, b, cc, d) in [
                (i, j, k, l),
                (j, i, k, l),
                (i, j, l, k),
                (j, i, l, k),
                (k, l, i, j),
                (l, k, i, j),
                (k, l, j, i),
                (l, k, j, i),
            ] {
                eri[[a, b, cc, d]] = v;
            }
        }
        IntegralTensors::from_spatial(&h, &eri).unwrap()
    }

    #[test]
    fn test_hamiltonian_hermitian_and_determinant_energies() {
        let ints = model_integrals();
        let mapper = JordanWignerMapper::new();
        let hamiltonian = mapper.map(&FermionicOp::electronic_hamiltonian(&ints));
        assert!(hamiltonian.is_hermitian(1e-12));

        let est = StatevectorEstimator::new();
        for occupied in [vec![0usize, 2], vec![1, 3], vec![0, 3], vec![0, 1]] {
            let index = occupied.iter().fold(0u64, |acc, &i| acc | (1 << i));
            let sv = Statevector::from_basis_state(4, index);
            let rdm = ReducedDensityMatrices::from_occupations(4, &occupied);
            let e = est.estimate(&sv, &hamiltonian).unwrap();
            assert!(
                (e - ints.energy(&rdm)).abs() < 1e-12,
                "occupation {:?}: {} vs {}",
                occupied,
                e,
                ints.energy(&rdm)
            );
        }
    }
}
