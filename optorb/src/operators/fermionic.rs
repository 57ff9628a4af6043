use num_complex::Complex64;
use std::fmt;

use crate::integrals::IntegralTensors;

/// Integral magnitudes below this are not turned into operator terms.
const INTEGRAL_CUTOFF: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ladder {
    Create(usize),
    Annihilate(usize),
}

impl Ladder {
    pub fn index(&self) -> usize {
        match self {
            Ladder::Create(p) | Ladder::Annihilate(p) => *p,
        }
    }

    pub fn adjoint(&self) -> Ladder {
        match self {
            Ladder::Create(p) => Ladder::Annihilate(*p),
            Ladder::Annihilate(p) => Ladder::Create(*p),
        }
    }
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ladder::Create(p) => write!(f, "+_{}", p),
            Ladder::Annihilate(p) => write!(f, "-_{}", p),
        }
    }
}

/// Apply a product of ladder operators (rightmost first) to the occupation
/// bitstring `det`, returning the Jordan–Wigner sign and the new bitstring.
pub fn apply_ladders(ops: &[Ladder], det: u64) -> Option<(f64, u64)> {
    let mut sign = 1.0;
    let mut state = det;
    for op in ops.iter().rev() {
        let p = op.index();
        let bit = 1u64 << p;
        let occupied = state & bit != 0;
        match (op, occupied) {
            (Ladder::Create(_), true) | (Ladder::Annihilate(_), false) => return None,
            _ => {}
        }
        if (state & (bit - 1)).count_ones() % 2 == 1 {
            sign = -sign;
        }
        state ^= bit;
    }
    Some((sign, state))
}

/// Linear combination of products of fermionic ladder operators.
#[derive(Debug, Clone, PartialEq)]
pub struct FermionicOp {
    num_spin_orbitals: usize,
    terms: Vec<(Vec<Ladder>, Complex64)>,
}

impl FermionicOp {
    pub fn new(num_spin_orbitals: usize) -> Self {
        FermionicOp {
            num_spin_orbitals,
            terms: Vec::new(),
        }
    }

    pub fn num_spin_orbitals(&self) -> usize {
        self.num_spin_orbitals
    }

    pub fn terms(&self) -> &[(Vec<Ladder>, Complex64)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn push(&mut self, ops: Vec<Ladder>, coeff: Complex64) {
        debug_assert!(ops.iter().all(|o| o.index() < self.num_spin_orbitals));
        self.terms.push((ops, coeff));
    }

    pub fn adjoint(&self) -> FermionicOp {
        let terms = self
            .terms
            .iter()
            .map(|(ops, c)| (ops.iter().rev().map(Ladder::adjoint).collect(), c.conj()))
            .collect();
        FermionicOp {
            num_spin_orbitals: self.num_spin_orbitals,
            terms,
        }
    }

    /// `Σ h_pq a†_p a_q + ½ Σ <pq|rs> a†_p a†_q a_s a_r`.
    pub fn electronic_hamiltonian(integrals: &IntegralTensors) -> FermionicOp {
        let n = integrals.num_spin_orbitals();
        let mut op = FermionicOp::new(n);
        for p in 0..n {
            for q in 0..n {
                let h = integrals.one_body[(p, q)];
                if h.abs() > INTEGRAL_CUTOFF {
                    op.push(
                        vec![Ladder::Create(p), Ladder::Annihilate(q)],
                        Complex64::new(h, 0.0),
                    );
                }
            }
        }
        for p in 0..n {
            for q in 0..n {
                if p == q {
                    continue;
                }
                for r in 0..n {
                    for s in 0..n {
                        if r == s {
                            continue;
                        }
                        let g = integrals.two_body[[p, q, r, s]];
                        if g.abs() > INTEGRAL_CUTOFF {
                            op.push(
                                vec![
                                    Ladder::Create(p),
                                    Ladder::Create(q),
                                    Ladder::Annihilate(s),
                                    Ladder::Annihilate(r),
                                ],
                                Complex64::new(0.5 * g, 0.0),
                            );
                        }
                    }
                }
            }
        }
        op
    }

    /// `a†_p a_q`, whose expectation value is the 1-RDM element `γ_pq`.
    pub fn one_body_density(num_spin_orbitals: usize, p: usize, q: usize) -> FermionicOp {
        let mut op = FermionicOp::new(num_spin_orbitals);
        op.push(
            vec![Ladder::Create(p), Ladder::Annihilate(q)],
            Complex64::new(1.0, 0.0),
        );
        op
    }

    /// `a†_p a†_q a_s a_r`, whose expectation value is the 2-RDM element `Γ_pqrs`.
    pub fn two_body_density(
        num_spin_orbitals: usize,
        p: usize,
        q: usize,
        r: usize,
        s: usize,
    ) -> FermionicOp {
        let mut op = FermionicOp::new(num_spin_orbitals);
        op.push(
            vec![
                Ladder::Create(p),
                Ladder::Create(q),
                Ladder::Annihilate(s),
                Ladder::Annihilate(r),
            ],
            Complex64::new(1.0, 0.0),
        );
        op
    }

    /// Particle-number operator `Σ_p a†_p a_p`.
    pub fn number(num_spin_orbitals: usize) -> FermionicOp {
        let mut op = FermionicOp::new(num_spin_orbitals);
        for p in 0..num_spin_orbitals {
            op.push(
                vec![Ladder::Create(p), Ladder::Annihilate(p)],
                Complex64::new(1.0, 0.0),
            );
        }
        op
    }
}

impl fmt::Display for FermionicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "FermionicOp on {} spin orbitals, {} terms:",
            self.num_spin_orbitals,
            self.terms.len()
        )?;
        for (ops, c) in &self.terms {
            let label: Vec<String> = ops.iter().map(|o| o.to_string()).collect();
            writeln!(f, "  {:+.8}{:+.8}i * ({})", c.re, c.im, label.join(" "))?;
        }
        Ok(())
    }
}
