use crate::statevector::Statevector;

/// Closed- or open-shell Hartree–Fock determinant in blocked spin order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HartreeFock {
    pub num_spatial_orbitals: usize,
    pub num_particles: (usize, usize),
}

impl HartreeFock {
    pub fn new(num_spatial_orbitals: usize, num_particles: (usize, usize)) -> Self {
        HartreeFock {
            num_spatial_orbitals,
            num_particles,
        }
    }

    pub fn num_qubits(&self) -> usize {
        2 * self.num_spatial_orbitals
    }

    /// Lowest `n_alpha` α bits and lowest `n_beta` β bits set.
    pub fn bitstring(&self) -> u64 {
        let (n_alpha, n_beta) = self.num_particles;
        let alpha = (1u64 << n_alpha) - 1;
        let beta = ((1u64 << n_beta) - 1) << self.num_spatial_orbitals;
        alpha | beta
    }

    pub fn occupied(&self) -> Vec<usize> {
        let bits = self.bitstring();
        (0..self.num_qubits())
            .filter(|j| bits & (1 << j) != 0)
            .collect()
    }

    pub fn state(&self) -> Statevector {
        Statevector::from_basis_state(self.num_qubits(), self.bitstring())
    }
}
