#![allow(non_snake_case)]
//! Primitive Cartesian Gaussians and McMurchie–Davidson integrals.
//!
//! Products of Gaussians are expanded in Hermite Gaussians with the `E`
//! coefficients of Helgaker, Jørgensen and Olsen; Coulomb-type integrals are
//! then reduced to the auxiliary Hermite integrals `R_tuv`.

use crate::basis::Basis;
use crate::helper::boys_function;
use itertools::iproduct;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One Cartesian factor `x^l exp(-alpha x^2)` of a primitive Gaussian.
#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct GTO1d {
    pub alpha: f64,
    pub l: i32,
    pub center: f64,
    pub norm: f64,
}

fn double_factorial(n: i32) -> f64 {
    let mut acc = 1.0;
    let mut k = n;
    while k > 1 {
        acc *= k as f64;
        k -= 2;
    }
    acc
}

impl GTO1d {
    pub fn new(alpha: f64, l: i32, center: f64) -> Self {
        Self {
            alpha,
            l,
            center,
            norm: GTO1d::compute_norm(alpha, l),
        }
    }

    // N^2 = sqrt(2 alpha / pi) (4 alpha)^l / (2l - 1)!!
    fn compute_norm(alpha: f64, l: i32) -> f64 {
        let n_squared =
            (2.0 * alpha / PI).sqrt() * (4.0 * alpha).powi(l) / double_factorial(2 * l - 1);
        n_squared.sqrt()
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let x = x - self.center;
        self.norm * x.powi(self.l) * (-self.alpha * x * x).exp()
    }

    /// Hermite expansion coefficient `E^{ij}_t` of the product of two 1d
    /// Gaussians with exponents `a`, `b` separated by `Qx = A - B`.
    pub fn Eab(i: i32, j: i32, t: i32, Qx: f64, a: f64, b: f64) -> f64 {
        let p = a + b;
        let q = a * b / p;

        if t < 0 || t > i + j || i < 0 || j < 0 {
            0.0
        } else if i == 0 && j == 0 {
            (-q * Qx * Qx).exp()
        } else if j == 0 {
            GTO1d::Eab(i - 1, j, t - 1, Qx, a, b) / (2.0 * p)
                - GTO1d::Eab(i - 1, j, t, Qx, a, b) * q * Qx / a
                + GTO1d::Eab(i - 1, j, t + 1, Qx, a, b) * (t + 1) as f64
        } else {
            GTO1d::Eab(i, j - 1, t - 1, Qx, a, b) / (2.0 * p)
                + GTO1d::Eab(i, j - 1, t, Qx, a, b) * q * Qx / b
                + GTO1d::Eab(i, j - 1, t + 1, Qx, a, b) * (t + 1) as f64
        }
    }

    /// All `E^{ij}_t` for `t = 0..=i+j`.
    pub fn e_table(a: &GTO1d, b: &GTO1d) -> Vec<f64> {
        let qx = a.center - b.center;
        (0..=a.l + b.l)
            .map(|t| GTO1d::Eab(a.l, b.l, t, qx, a.alpha, b.alpha))
            .collect()
    }

    pub fn Sab(a: &GTO1d, b: &GTO1d) -> f64 {
        let p = a.alpha + b.alpha;
        let qx = a.center - b.center;
        GTO1d::Eab(a.l, b.l, 0, qx, a.alpha, b.alpha) * (PI / p).sqrt() * a.norm * b.norm
    }

    /// `<a| -1/2 d^2/dx^2 |b>`, obtained by differentiating `b` twice.
    pub fn Tab(a: &GTO1d, b: &GTO1d) -> f64 {
        let p = a.alpha + b.alpha;
        let qx = a.center - b.center;
        let lb = b.l as f64;

        let lower = lb * (lb - 1.0) * GTO1d::Eab(a.l, b.l - 2, 0, qx, a.alpha, b.alpha);
        let same = -2.0 * b.alpha * (2.0 * lb + 1.0) * GTO1d::Eab(a.l, b.l, 0, qx, a.alpha, b.alpha);
        let upper = 4.0 * b.alpha * b.alpha * GTO1d::Eab(a.l, b.l + 2, 0, qx, a.alpha, b.alpha);

        -0.5 * a.norm * b.norm * (PI / p).sqrt() * (lower + same + upper)
    }
}

/// A normalized primitive Cartesian Gaussian
/// `x^i y^j z^k exp(-alpha |r - center|^2)`.
#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct GTO {
    pub alpha: f64,
    pub l_xyz: Vector3<i32>,
    pub center: Vector3<f64>,
    pub norm: f64,
    pub gto1d: [GTO1d; 3],
}

impl GTO {
    pub fn new(alpha: f64, l_xyz: Vector3<i32>, center: Vector3<f64>) -> Self {
        let gto1d = [
            GTO1d::new(alpha, l_xyz.x, center.x),
            GTO1d::new(alpha, l_xyz.y, center.y),
            GTO1d::new(alpha, l_xyz.z, center.z),
        ];
        let norm = gto1d[0].norm * gto1d[1].norm * gto1d[2].norm;
        Self {
            alpha,
            l_xyz,
            center,
            norm,
            gto1d,
        }
    }

    /// Total exponent and centre of the Gaussian product `a * b`.
    pub fn product_center(a: &GTO, b: &GTO) -> (f64, Vector3<f64>) {
        let p = a.alpha + b.alpha;
        (p, (a.center * a.alpha + b.center * b.alpha) / p)
    }

    fn e_tables(a: &GTO, b: &GTO) -> [Vec<f64>; 3] {
        [
            GTO1d::e_table(&a.gto1d[0], &b.gto1d[0]),
            GTO1d::e_table(&a.gto1d[1], &b.gto1d[1]),
            GTO1d::e_table(&a.gto1d[2], &b.gto1d[2]),
        ]
    }

    /// Auxiliary Hermite Coulomb integral `R^n_{tuv}(p, PC)`.
    pub fn hermite_coulomb(t: i32, u: i32, v: i32, n: i32, p: f64, PC: &Vector3<f64>) -> f64 {
        if t < 0 || u < 0 || v < 0 {
            return 0.0;
        }
        if t == 0 && u == 0 && v == 0 {
            let T = p * PC.norm_squared();
            return (-2.0 * p).powi(n) * boys_function(n, T);
        }
        if t > 0 {
            (t - 1) as f64 * GTO::hermite_coulomb(t - 2, u, v, n + 1, p, PC)
                + PC.x * GTO::hermite_coulomb(t - 1, u, v, n + 1, p, PC)
        } else if u > 0 {
            (u - 1) as f64 * GTO::hermite_coulomb(t, u - 2, v, n + 1, p, PC)
                + PC.y * GTO::hermite_coulomb(t, u - 1, v, n + 1, p, PC)
        } else {
            (v - 1) as f64 * GTO::hermite_coulomb(t, u, v - 2, n + 1, p, PC)
                + PC.z * GTO::hermite_coulomb(t, u, v - 1, n + 1, p, PC)
        }
    }
}

impl Basis for GTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.gto1d[0].evaluate(r.x) * self.gto1d[1].evaluate(r.y) * self.gto1d[2].evaluate(r.z)
    }

    fn Sab(a: &GTO, b: &GTO) -> f64 {
        (0..3)
            .map(|d| GTO1d::Sab(&a.gto1d[d], &b.gto1d[d]))
            .product()
    }

    fn Tab(a: &GTO, b: &GTO) -> f64 {
        let s: Vec<f64> = (0..3).map(|d| GTO1d::Sab(&a.gto1d[d], &b.gto1d[d])).collect();
        let t: Vec<f64> = (0..3).map(|d| GTO1d::Tab(&a.gto1d[d], &b.gto1d[d])).collect();
        t[0] * s[1] * s[2] + s[0] * t[1] * s[2] + s[0] * s[1] * t[2]
    }

    fn Vab(a: &GTO, b: &GTO, R: Vector3<f64>, Z: u32) -> f64 {
        let (p, P) = GTO::product_center(a, b);
        let pc = P - R;
        let [ex, ey, ez] = GTO::e_tables(a, b);

        let val: f64 = iproduct!(0..ex.len(), 0..ey.len(), 0..ez.len())
            .map(|(t, u, v)| {
                ex[t] * ey[u] * ez[v]
                    * GTO::hermite_coulomb(t as i32, u as i32, v as i32, 0, p, &pc)
            })
            .sum();

        -(Z as f64) * 2.0 * PI / p * a.norm * b.norm * val
    }

    fn JKabcd(a: &GTO, b: &GTO, c: &GTO, d: &GTO) -> f64 {
        let (p, P) = GTO::product_center(a, b);
        let (q, Q) = GTO::product_center(c, d);
        let alpha = p * q / (p + q);
        let pq = P - Q;
        let [ex, ey, ez] = GTO::e_tables(a, b);
        let [fx, fy, fz] = GTO::e_tables(c, d);

        let val: f64 = iproduct!(0..ex.len(), 0..ey.len(), 0..ez.len())
            .map(|(t, u, v)| {
                let eab = ex[t] * ey[u] * ez[v];
                if eab == 0.0 {
                    return 0.0;
                }
                iproduct!(0..fx.len(), 0..fy.len(), 0..fz.len())
                    .map(|(tau, nu, phi)| {
                        let sign = if (tau + nu + phi) % 2 == 0 { 1.0 } else { -1.0 };
                        sign * fx[tau] * fy[nu] * fz[phi]
                            * GTO::hermite_coulomb(
                                (t + tau) as i32,
                                (u + nu) as i32,
                                (v + phi) as i32,
                                0,
                                alpha,
                                &pq,
                            )
                    })
                    .sum::<f64>()
                    * eab
            })
            .sum();

        2.0 * PI.powf(2.5) / (p * q * (p + q).sqrt()) * a.norm * b.norm * c.norm * d.norm * val
    }
}
