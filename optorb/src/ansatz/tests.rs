#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::operators::{FermionicOp, JordanWignerMapper, QubitMapper};
    use num_complex::Complex64;

    #[test]
    fn test_hartree_fock_bitstring() {
        let hf = HartreeFock::new(2, (1, 1));
        assert_eq!(hf.bitstring(), 0b0101);
        assert_eq!(hf.occupied(), vec![0, 2]);

        let hf = HartreeFock::new(4, (2, 1));
        assert_eq!(hf.bitstring(), 0b0001_0011);
        assert_eq!(hf.state().amplitudes()[0b0001_0011], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_excitation_ordering_and_counts() {
        let ex = generate_excitations(2, (1, 1), true, true);
        assert_eq!(ex.len(), 3);
        assert_eq!(ex[0].occupied, vec![0]);
        assert_eq!(ex[0].virtuals, vec![1]);
        assert_eq!(ex[1].occupied, vec![2]);
        assert_eq!(ex[1].virtuals, vec![3]);
        assert_eq!(ex[2].occupied, vec![0, 2]);
        assert_eq!(ex[2].virtuals, vec![1, 3]);

        // 4 spatial orbitals, 2+2 electrons: 4+4 singles, 1+1 same-spin, 16 mixed doubles
        let ex = generate_excitations(4, (2, 2), true, true);
        assert_eq!(ex.len(), 26);
        assert_eq!(ex.iter().filter(|e| e.rank() == 1).count(), 8);
        assert_eq!(generate_excitations(4, (2, 2), true, false).len(), 8);
    }

    #[test]
    fn test_uccsd_parameter_count_and_mismatch() {
        let uccsd = UCCSD::new(2, (1, 1), 2);
        assert_eq!(uccsd.num_parameters(), 6);
        let state = uccsd.reference().state();
        assert!(uccsd.apply(&[0.1; 5], &state).is_err());
        assert!(uccsd.apply(&[0.1; 6], &state).is_ok());

        let wrong_width = HartreeFock::new(3, (1, 1)).state();
        assert!(uccsd.apply(&[0.0; 6], &wrong_width).is_err());
    }

    #[test]
    fn test_uccsd_is_norm_preserving() {
        let uccsd = UCCSD::new(3, (1, 1), 1);
        let params: Vec<f64> = (0..uccsd.num_parameters())
            .map(|k| 0.3 * (k as f64 + 1.0).sin())
            .collect();
        let out = uccsd.apply(&params, &uccsd.reference().state()).unwrap();
        assert!((out.norm() - 1.0).abs() < 1e-13);
    }

    #[test]
    fn test_single_rotation_amplitudes() {
        let uccsd = UCCSD::new(2, (1, 1), 1);
        let theta = 0.4;
        let out = uccsd
            .apply(&[theta, 0.0, 0.0], &uccsd.reference().state())
            .unwrap();
        // a†_1 a_0 |0101> = |0110>, no occupied orbital between 0 and 1
        assert!((out.amplitudes()[0b0101].re - theta.cos()).abs() < 1e-14);
        assert!((out.amplitudes()[0b0110].re - theta.sin()).abs() < 1e-14);
    }

    #[test]
    fn test_generator_matches_jordan_wigner_mapping() {
        // dU/dθ at θ = 0 is (T − T†)|ψ>
        let uccsd = UCCSD::new(2, (1, 1), 1);
        let mapper = JordanWignerMapper::new();
        let psi = uccsd.reference().state();
        let eps = 1e-6;
        for (k, excitation) in uccsd.excitations().iter().enumerate() {
            let mut t = FermionicOp::new(4);
            t.push(excitation.ladders(), Complex64::new(1.0, 0.0));
            let mut generator = t.clone();
            for (ops, c) in t.adjoint().terms() {
                generator.push(ops.clone(), -c);
            }
            let expected = psi.apply(&mapper.map(&generator)).unwrap();

            let mut params = vec![0.0; 3];
            params[k] = eps;
            let moved = uccsd.apply(&params, &psi).unwrap();
            for (j, (m, p)) in moved.amplitudes().iter().zip(psi.amplitudes()).enumerate() {
                let derivative = (m - p) / eps;
                assert!(
                    (derivative - expected.amplitudes()[j]).norm() < 1e-5,
                    "excitation {} component {}",
                    k,
                    j
                );
            }
        }
    }
}
