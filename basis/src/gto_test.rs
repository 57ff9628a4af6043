#[cfg(test)]
mod tests {
    use crate::basis::{AOBasis, Basis, BasisError};
    use crate::cgto::{AtomicBasis, ContractedGTO};
    use crate::gto::{GTO1d, GTO};
    use crate::helper::boys_function;
    use crate::library;
    use nalgebra::Vector3;
    use std::f64::consts::PI;

    fn simpson_integration<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
        let n = if n % 2 == 0 { n } else { n + 1 };
        let h = (b - a) / n as f64;
        let mut sum = f(a) + f(b);
        for i in 1..n {
            let x = a + i as f64 * h;
            sum += if i % 2 == 0 { 2.0 * f(x) } else { 4.0 * f(x) };
        }
        sum * h / 3.0
    }

    #[test]
    fn test_gto1d_normalization() {
        for l in 0..3 {
            let gto = GTO1d::new(1.3, l, 0.7);
            let integral = simpson_integration(|x| gto.evaluate(x).powi(2), -10.0, 10.0, 10_000);
            assert!((integral - 1.0).abs() < 1e-8, "l = {}: got {}", l, integral);
        }
    }

    #[test]
    fn test_gto1d_overlap() {
        let gto1 = GTO1d::new(1.2, 1, 1.0);
        let gto2 = GTO1d::new(0.8, 2, 2.5);
        let integral =
            simpson_integration(|x| gto1.evaluate(x) * gto2.evaluate(x), -10.0, 12.0, 10_000);
        let overlap = GTO1d::Sab(&gto1, &gto2);
        assert!(
            (integral - overlap).abs() < 1e-8,
            "overlap {} vs numerical {}",
            overlap,
            integral
        );
    }

    #[test]
    fn test_gto1d_kinetic() {
        let gto1 = GTO1d::new(0.9, 1, 0.0);
        let gto2 = GTO1d::new(0.6, 1, 0.8);
        let h = 1e-4;
        let second = |x: f64| {
            (gto2.evaluate(x + h) - 2.0 * gto2.evaluate(x) + gto2.evaluate(x - h)) / (h * h)
        };
        let integral = -0.5 * simpson_integration(|x| gto1.evaluate(x) * second(x), -12.0, 12.0, 20_000);
        let kinetic = GTO1d::Tab(&gto1, &gto2);
        assert!(
            (integral - kinetic).abs() < 1e-5,
            "kinetic {} vs numerical {}",
            kinetic,
            integral
        );
    }

    fn s_gto(alpha: f64, center: Vector3<f64>) -> GTO {
        GTO::new(alpha, Vector3::new(0, 0, 0), center)
    }

    #[test]
    fn test_s_type_closed_forms() {
        let (a, b) = (0.7, 1.9);
        let ra = Vector3::new(0.0, 0.0, 0.0);
        let rb = Vector3::new(0.3, -0.2, 1.1);
        let ga = s_gto(a, ra);
        let gb = s_gto(b, rb);
        let p = a + b;
        let mu = a * b / p;
        let rab2 = (ra - rb).norm_squared();
        let rp = (ra * a + rb * b) / p;
        let norms = ga.norm * gb.norm;

        let overlap = norms * (PI / p).powf(1.5) * (-mu * rab2).exp();
        assert!((GTO::Sab(&ga, &gb) - overlap).abs() < 1e-12);

        let kinetic = mu * (3.0 - 2.0 * mu * rab2) * overlap;
        assert!((GTO::Tab(&ga, &gb) - kinetic).abs() < 1e-12);

        let rc = Vector3::new(0.5, 0.5, 0.5);
        let nuclear = -2.0 * 2.0 * PI / p
            * (-mu * rab2).exp()
            * boys_function(0, p * (rp - rc).norm_squared())
            * norms;
        assert!((GTO::Vab(&ga, &gb, rc, 2) - nuclear).abs() < 1e-12);
    }

    #[test]
    fn test_s_type_electron_repulsion_closed_form() {
        let g: Vec<GTO> = vec![
            s_gto(0.5, Vector3::new(0.0, 0.0, 0.0)),
            s_gto(1.4, Vector3::new(0.0, 0.0, 1.4)),
            s_gto(0.3, Vector3::new(0.2, 0.0, 0.0)),
            s_gto(2.2, Vector3::new(0.0, 0.9, 0.3)),
        ];
        let (p, rp) = GTO::product_center(&g[0], &g[1]);
        let (q, rq) = GTO::product_center(&g[2], &g[3]);
        let kab = (-(g[0].alpha * g[1].alpha / p) * (g[0].center - g[1].center).norm_squared()).exp();
        let kcd = (-(g[2].alpha * g[3].alpha / q) * (g[2].center - g[3].center).norm_squared()).exp();
        let alpha = p * q / (p + q);
        let expected = 2.0 * PI.powf(2.5) / (p * q * (p + q).sqrt())
            * kab
            * kcd
            * boys_function(0, alpha * (rp - rq).norm_squared())
            * g.iter().map(|x| x.norm).product::<f64>();
        let value = GTO::JKabcd(&g[0], &g[1], &g[2], &g[3]);
        assert!((value - expected).abs() < 1e-12, "{} vs {}", value, expected);
    }

    #[test]
    fn test_electron_repulsion_permutational_symmetry() {
        let a = GTO::new(0.8, Vector3::new(1, 0, 0), Vector3::new(0.0, 0.0, 0.0));
        let b = GTO::new(1.1, Vector3::new(0, 0, 1), Vector3::new(0.0, 0.3, 1.0));
        let c = GTO::new(0.6, Vector3::new(0, 1, 0), Vector3::new(0.4, 0.0, -0.5));
        let d = GTO::new(1.7, Vector3::new(0, 0, 0), Vector3::new(-0.2, 0.1, 0.6));
        let abcd = GTO::JKabcd(&a, &b, &c, &d);
        for value in [
            GTO::JKabcd(&b, &a, &c, &d),
            GTO::JKabcd(&a, &b, &d, &c),
            GTO::JKabcd(&c, &d, &a, &b),
            GTO::JKabcd(&d, &c, &b, &a),
        ] {
            assert!((abcd - value).abs() < 1e-12, "{} vs {}", abcd, value);
        }
    }

    #[test]
    fn test_p_type_self_overlap_and_repulsion_positive() {
        let p = GTO::new(0.9, Vector3::new(0, 1, 0), Vector3::new(0.1, 0.2, 0.3));
        assert!((GTO::Sab(&p, &p) - 1.0).abs() < 1e-12);
        assert!(GTO::JKabcd(&p, &p, &p, &p) > 0.0);
        assert!(GTO::Vab(&p, &p, Vector3::zeros(), 1) < 0.0);
    }

    // H2 in STO-3G at R = 1.4 bohr, reference values from Szabo & Ostlund, ch. 3.
    #[test]
    fn test_h2_sto3g_integrals() {
        let mut h1 = library::builtin("H", "STO-3G").unwrap();
        let mut h2 = h1.clone();
        let r1 = Vector3::new(0.0, 0.0, 0.0);
        let r2 = Vector3::new(0.0, 0.0, 1.4);
        h1.set_center(r1);
        h2.set_center(r2);
        let phi1 = h1.get_basis()[0].clone();
        let phi2 = h2.get_basis()[0].clone();

        let s12 = ContractedGTO::Sab(&phi1, &phi2);
        assert!((s12 - 0.6593).abs() < 1e-4, "S12 = {}", s12);
        assert!((ContractedGTO::Tab(&phi1, &phi1) - 0.7600).abs() < 1e-4);
        assert!((ContractedGTO::Tab(&phi1, &phi2) - 0.2365).abs() < 1e-4);

        let v11 = ContractedGTO::Vab(&phi1, &phi1, r1, 1) + ContractedGTO::Vab(&phi1, &phi1, r2, 1);
        let v12 = ContractedGTO::Vab(&phi1, &phi2, r1, 1) + ContractedGTO::Vab(&phi1, &phi2, r2, 1);
        assert!((v11 + 1.8804).abs() < 1e-4, "V11 = {}", v11);
        assert!((v12 + 1.1948).abs() < 1e-4, "V12 = {}", v12);

        let j1111 = ContractedGTO::JKabcd(&phi1, &phi1, &phi1, &phi1);
        let j1122 = ContractedGTO::JKabcd(&phi1, &phi1, &phi2, &phi2);
        let j2111 = ContractedGTO::JKabcd(&phi2, &phi1, &phi1, &phi1);
        let j2121 = ContractedGTO::JKabcd(&phi2, &phi1, &phi2, &phi1);
        assert!((j1111 - 0.7746).abs() < 1e-4, "(11|11) = {}", j1111);
        assert!((j1122 - 0.5697).abs() < 1e-4, "(11|22) = {}", j1122);
        assert!((j2111 - 0.4441).abs() < 1e-4, "(21|11) = {}", j2111);
        assert!((j2121 - 0.2970).abs() < 1e-4, "(21|21) = {}", j2121);
    }

    #[test]
    fn test_parse_631g_hydrogen() {
        let h = library::builtin("h", "6-31g").unwrap();
        assert_eq!(h.symbol, "H");
        assert_eq!(h.atomic_number, 1);
        assert_eq!(h.basis_size(), 2);
        assert_eq!(h.basis_set[0].shell_type, "1s");
        assert_eq!(h.basis_set[1].shell_type, "2s");
        assert_eq!(h.basis_set[0].primitives.len(), 3);
        for cgto in &h.basis_set {
            assert!((ContractedGTO::Sab(cgto, cgto) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_parse_sp_shell_with_fortran_exponents() {
        let text = "
            # comment
            BASIS \"ao basis\" PRINT
            Li    S
                  0.6424189150D+01       0.1543289673D+00
                  0.1295460000D+01       0.5353281423D+00
            Li    SP
                  0.5000000000D+00      -0.9996722919D-01       0.1559162750D+00
                  0.1000000000D+00       0.3995128261D+00       0.6076837186D+00
            END
        ";
        let li = AtomicBasis::parse_nwchem("custom", text).unwrap();
        assert_eq!(li.atomic_number, 3);
        let labels: Vec<&str> = li.basis_set.iter().map(|c| c.shell_type.as_str()).collect();
        assert_eq!(labels, vec!["1s", "2s", "2px", "2py", "2pz"]);
        assert_eq!(li.basis_set[3].l_xyz, Vector3::new(0, 1, 0));
        for cgto in &li.basis_set {
            assert!((ContractedGTO::Sab(cgto, cgto) - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_parse_errors() {
        let mixed = "H S\n 1.0 1.0\nHe S\n 2.0 1.0\n";
        assert!(matches!(
            AtomicBasis::parse_nwchem("x", mixed),
            Err(BasisError::MixedElements { .. })
        ));
        let shell = "H D\n 1.0 1.0\n";
        assert!(matches!(
            AtomicBasis::parse_nwchem("x", shell),
            Err(BasisError::UnsupportedShell(_))
        ));
        assert!(matches!(
            AtomicBasis::parse_nwchem("x", "# nothing\n"),
            Err(BasisError::Empty)
        ));
        assert!(matches!(
            library::builtin("Xe", "6-31G"),
            Err(BasisError::NotInLibrary { .. })
        ));
    }

    #[test]
    fn test_set_center_moves_every_primitive() {
        let mut h = library::builtin("H", "6-31G").unwrap();
        let c = Vector3::new(1.0, -2.0, 0.5);
        h.set_center(c);
        assert_eq!(h.get_center(), Some(c));
        for cgto in h.get_basis() {
            assert_eq!(cgto.center(), c);
            let far = c + Vector3::new(0.0, 0.0, 3.0);
            assert!(cgto.evaluate(&c) > cgto.evaluate(&far));
        }
    }
}
