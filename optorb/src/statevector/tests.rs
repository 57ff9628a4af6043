#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::operators::{FermionicOp, JordanWignerMapper, PauliTerm, QubitMapper, SparsePauliOp};
    use num_complex::Complex64;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_basis_state_and_norm() {
        let sv = Statevector::from_basis_state(3, 0b101);
        assert_eq!(sv.amplitudes().len(), 8);
        assert_eq!(sv.amplitudes()[5], c(1.0));
        assert!((sv.norm() - 1.0).abs() < 1e-15);
        assert_eq!(sv.dominant_basis_state(), 5);

        let mixed = Statevector::from_basis_combination(2, &[(0, 3.0), (3, 4.0)]).normalized();
        assert!((mixed.amplitudes()[3].re - 0.8).abs() < 1e-15);
        assert!(Statevector::from_amplitudes(vec![c(1.0); 3]).is_err());
    }

    #[test]
    fn test_pauli_expectations() {
        // Z on qubit 0 of |1> gives -1, X on |0> gives 0
        let one = Statevector::from_basis_state(1, 1);
        let z = SparsePauliOp::from_terms(1, vec![PauliTerm::new(0, 1, c(1.0))]);
        let x = SparsePauliOp::from_terms(1, vec![PauliTerm::new(1, 0, c(1.0))]);
        let est = StatevectorEstimator::new();
        assert!((est.estimate(&one, &z).unwrap() + 1.0).abs() < 1e-15);
        assert!(est.estimate(&one, &x).unwrap().abs() < 1e-15);

        let plus = Statevector::from_basis_combination(1, &[(0, 1.0), (1, 1.0)]).normalized();
        assert!((est.estimate(&plus, &x).unwrap() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_number_operator_counts_occupations() {
        let mapper = JordanWignerMapper::new();
        let n_op = mapper.map(&FermionicOp::number(4));
        let est = StatevectorEstimator::new();
        for (index, count) in [(0b0000u64, 0.0), (0b0101, 2.0), (0b1110, 3.0)] {
            let sv = Statevector::from_basis_state(4, index);
            assert!((est.estimate(&sv, &n_op).unwrap() - count).abs() < 1e-14);
        }
    }

    #[test]
    fn test_transition_matches_direct_inner_product() {
        let mapper = JordanWignerMapper::new();
        // hopping a†_0 a_1 + a†_1 a_0 couples |01> and |10>
        let mut hop = FermionicOp::one_body_density(2, 0, 1);
        for t in FermionicOp::one_body_density(2, 1, 0).terms() {
            hop.push(t.0.clone(), t.1);
        }
        let op = mapper.map(&hop);
        let bra = Statevector::from_basis_state(2, 0b01);
        let ket = Statevector::from_basis_state(2, 0b10);
        let est = StatevectorEstimator::new();
        let via_estimator = est.estimate_transition(&bra, &op, &ket).unwrap();
        let direct = bra.inner(&ket.apply(&op).unwrap());
        assert!((via_estimator - direct).norm() < 1e-14);
        assert!((direct.re - 1.0).abs() < 1e-14);

        let ket_i = &ket * Complex64::new(0.0, 1.0);
        let via_estimator = est.estimate_transition(&bra, &op, &ket_i).unwrap();
        let direct = bra.inner(&ket_i.apply(&op).unwrap());
        assert!((via_estimator - direct).norm() < 1e-14);
    }

    #[test]
    fn test_operator_wider_than_state_is_rejected() {
        let sv = Statevector::from_basis_state(1, 0);
        let op = SparsePauliOp::identity(2, c(1.0));
        assert!(sv.apply(&op).is_err());
    }
}
