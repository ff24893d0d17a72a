use crate::error::RingError;
use crate::modulus::barrett::Barrett;
use crate::modulus::ONCE;
use crate::poly::PolyRNS;
use crate::ring::RingRNS;
use std::sync::Arc;

/// Constants for extending a polynomial from q_0..=q_level to the P chain.
struct ModUpConstants {
    /// (Q/q_i)^-1 mod q_i
    q_hat_inv: Vec<Barrett<u64>>,
    /// 1/q_i
    q_inv_f64: Vec<f64>,
    /// (Q/q_i) mod p_j, indexed [j][i]
    q_hat_mod_p: Vec<Vec<u64>>,
    /// Q mod p_j
    q_mod_p: Vec<u64>,
}

/// Fast basis extension from the Q chain to the P chain.
pub struct BasisExtender {
    ring_q: Arc<RingRNS<u64>>,
    ring_p: Arc<RingRNS<u64>>,
    constants: Vec<ModUpConstants>,
}

#[inline(always)]
fn mul_mod(a: u64, b: u64, q: u64) -> u64 {
    ((a as u128 * b as u128) % q as u128) as u64
}

impl BasisExtender {
    pub fn new(ring_q: Arc<RingRNS<u64>>, ring_p: Arc<RingRNS<u64>>) -> Result<Self, RingError> {
        if ring_q.n() != ring_p.n() {
            return Err(RingError::DegreeMismatch(ring_q.n(), ring_p.n()));
        }
        let moduli_p: Vec<u64> = ring_p.moduli();
        if let Some(q) = ring_q.moduli().iter().find(|q| moduli_p.contains(q)) {
            return Err(RingError::DuplicateModulus(*q));
        }

        let constants: Vec<ModUpConstants> = (0..ring_q.level() + 1)
            .map(|level| Self::constants(&ring_q, &moduli_p, level))
            .collect();

        Ok(Self {
            ring_q,
            ring_p,
            constants,
        })
    }

    fn constants(ring_q: &RingRNS<u64>, moduli_p: &[u64], level: usize) -> ModUpConstants {
        let moduli_q: Vec<u64> = ring_q.moduli()[..level + 1].to_vec();

        let q_hat_mod = |i: usize, m: u64| -> u64 {
            moduli_q
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != i)
                .fold(1u64 % m, |acc, (_, q_k)| mul_mod(acc, q_k % m, m))
        };

        let q_hat_inv: Vec<Barrett<u64>> = moduli_q
            .iter()
            .enumerate()
            .map(|(i, q_i)| {
                let prime = &ring_q.at(i).modulus;
                prime.barrett.prepare(prime.inv(q_hat_mod(i, *q_i)))
            })
            .collect();

        let q_inv_f64: Vec<f64> = moduli_q.iter().map(|q| 1.0 / *q as f64).collect();

        let q_hat_mod_p: Vec<Vec<u64>> = moduli_p
            .iter()
            .map(|p| (0..level + 1).map(|i| q_hat_mod(i, *p)).collect())
            .collect();

        let q_mod_p: Vec<u64> = moduli_p
            .iter()
            .map(|p| moduli_q.iter().fold(1u64, |acc, q| mul_mod(acc, q % p, *p)))
            .collect();

        ModUpConstants {
            q_hat_inv,
            q_inv_f64,
            q_hat_mod_p,
            q_mod_p,
        }
    }

    pub fn ring_q(&self) -> &Arc<RingRNS<u64>> {
        &self.ring_q
    }

    pub fn ring_p(&self) -> &Arc<RingRNS<u64>> {
        &self.ring_p
    }

    /// Extends pol_q (rows 0..=level_q) to the rows 0..=level_p of pol_p.
    /// Each coefficient is lifted to its centered representative in
    /// (-Q/2, Q/2], so small positive and negative values are carried exactly.
    pub fn mod_up_q_to_p(
        &self,
        level_q: usize,
        level_p: usize,
        pol_q: &PolyRNS<u64>,
        pol_p: &mut PolyRNS<u64>,
    ) -> Result<(), RingError> {
        self.ring_q.check_level(level_q, &[pol_q])?;
        self.ring_p.check_level(level_p, &[pol_p])?;

        let constants: &ModUpConstants = &self.constants[level_q];
        let mut y: Vec<u64> = vec![0; level_q + 1];

        (0..self.ring_q.n()).for_each(|j| {
            let mut v_f64: f64 = 0.0;
            (0..level_q + 1).for_each(|i| {
                let prime = &self.ring_q.at(i).modulus;
                y[i] = prime
                    .barrett
                    .mul_external::<ONCE>(constants.q_hat_inv[i], pol_q.at(i).0[j]);
                v_f64 += y[i] as f64 * constants.q_inv_f64[i];
            });
            let v: u64 = v_f64.round() as u64;

            (0..level_p + 1).for_each(|k| {
                let p: u64 = self.ring_p.at(k).q();
                let sum: u128 = y
                    .iter()
                    .zip(constants.q_hat_mod_p[k].iter())
                    .fold(0u128, |acc, (y, h)| acc + (*y as u128) * (*h as u128));
                let x: u64 = (sum % p as u128) as u64;
                let correction: u64 = mul_mod(v % p, constants.q_mod_p[k], p);
                pol_p.at_mut(k).0[j] = if x >= correction {
                    x - correction
                } else {
                    x + p - correction
                };
            });
        });

        Ok(())
    }
}
