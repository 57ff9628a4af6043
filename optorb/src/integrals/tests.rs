#[cfg(test)]
mod tests {
    use super::super::*;
    use nalgebra::DMatrix;
    use ndarray::Array4;

    // Two spatial orbitals with hand-picked, symmetric integrals.
    fn model_spatial() -> (DMatrix<f64>, Array4<f64>) {
        let h = DMatrix::from_row_slice(2, 2, &[-1.2, 0.1, 0.1, -0.4]);
        let mut eri = Array4::zeros((2, 2, 2, 2));
        let unique = [
            ((0, 0, 0, 0), 0.65),
            ((1, 1, 1, 1), 0.70),
            ((0, 0, 1, 1), 0.64),
            ((0, 1, 0, 1), 0.18),
            ((0, 0, 0, 1), 0.05),
            ((0, 1, 1, 1), -0.03),
        ];
        for &((i, j, k, l), v) in unique.iter() {
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
        (h, eri)
    }

    #[test]
    fn test_from_spatial_blocks_and_spin_selection() {
        let (h, eri) = model_spatial();
        let t = IntegralTensors::from_spatial(&h, &eri).unwrap();
        assert_eq!(t.num_spin_orbitals(), 4);
        assert_eq!(t.one_body[(2, 3)], h[(0, 1)]);
        assert_eq!(t.one_body[(0, 2)], 0.0);
        // <α0 β1 | α0 β1> = (00|11)
        assert_eq!(t.two_body[[0, 3, 0, 3]], eri[[0, 0, 1, 1]]);
        // spin flip between bra and ket vanishes
        assert_eq!(t.two_body[[0, 3, 2, 1]], 0.0);
        // <α0 α1 | α1 α0> = (01|10)
        assert_eq!(t.two_body[[0, 1, 1, 0]], eri[[0, 1, 1, 0]]);
    }

    #[test]
    fn test_to_physicist_ordering() {
        let (_, eri) = model_spatial();
        let phys = to_physicist_ordering(&eri);
        for p in 0..2 {
            for q in 0..2 {
                for r in 0..2 {
                    for s in 0..2 {
                        assert_eq!(phys[[p, q, r, s]], eri[[p, r, q, s]]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_determinant_energy() {
        let (h, eri) = model_spatial();
        let t = IntegralTensors::from_spatial(&h, &eri).unwrap();
        let rdm = ReducedDensityMatrices::from_occupations(4, &[0, 2]);
        let expected = 2.0 * h[(0, 0)] + eri[[0, 0, 0, 0]];
        assert!((t.energy(&rdm) - expected).abs() < 1e-12);
        assert!((rdm.trace() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_selects_columns() {
        let (h, eri) = model_spatial();
        let t = IntegralTensors::from_spatial(&h, &eri).unwrap();
        let mut u = DMatrix::zeros(4, 2);
        u[(0, 0)] = 1.0;
        u[(2, 1)] = 1.0;
        let active = t.transform(&u).unwrap();
        assert_eq!(active.num_spin_orbitals(), 2);
        assert_eq!(active.one_body[(1, 1)], h[(0, 0)]);
        assert_eq!(active.two_body[[0, 1, 0, 1]], eri[[0, 0, 0, 0]]);
    }

    #[test]
    fn test_transform_preserves_energy_under_rotation() {
        let (h, eri) = model_spatial();
        let t = IntegralTensors::from_spatial(&h, &eri).unwrap();
        let theta: f64 = 0.3;
        let (c, s) = (theta.cos(), theta.sin());
        let mut u = DMatrix::zeros(4, 4);
        for offset in [0, 2] {
            u[(offset, offset)] = c;
            u[(offset + 1, offset)] = s;
            u[(offset, offset + 1)] = -s;
            u[(offset + 1, offset + 1)] = c;
        }
        let rotated = t.transform(&u).unwrap();
        // rotating integrals forward and the occupied orbitals back leaves E unchanged
        let back = rotated.transform(&u.transpose()).unwrap();
        let rdm = ReducedDensityMatrices::from_occupations(4, &[0, 2]);
        assert!((back.energy(&rdm) - t.energy(&rdm)).abs() < 1e-12);
        assert!((rotated.one_body.trace() - t.one_body.trace()).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        assert!(IntegralTensors::new(DMatrix::zeros(3, 3), Array4::zeros((3, 3, 3, 3))).is_err());
        assert!(IntegralTensors::new(DMatrix::zeros(2, 2), Array4::zeros((2, 2, 2, 1))).is_err());
        let t = IntegralTensors::new(DMatrix::zeros(2, 2), Array4::zeros((2, 2, 2, 2))).unwrap();
        assert!(t.transform(&DMatrix::zeros(4, 2)).is_err());
    }

    #[test]
    fn test_weighted_sum() {
        let a = ReducedDensityMatrices::from_occupations(4, &[0, 2]);
        let b = ReducedDensityMatrices::from_occupations(4, &[1, 3]);
        let avg = ReducedDensityMatrices::weighted_sum(&[a, b], &[0.75, 0.25]);
        assert!((avg.one_body[(0, 0)] - 0.75).abs() < 1e-15);
        assert!((avg.two_body[[1, 3, 1, 3]] - 0.25).abs() < 1e-15);
        assert!((avg.trace() - 2.0).abs() < 1e-15);
    }
}
