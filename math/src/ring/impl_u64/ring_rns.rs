use crate::error::RingError;
use crate::modulus::BARRETT;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use rug::Integer;
use std::sync::Arc;

impl RingRNS<u64> {
    /// Returns the chain of rings Z_{q_i}[X]/(X^n + 1), one per modulus.
    pub fn new(n: usize, moduli: &[u64]) -> Result<Self, RingError> {
        if moduli.is_empty() {
            return Err(RingError::EmptyModuli);
        }
        for (i, q) in moduli.iter().enumerate() {
            if moduli[..i].contains(q) {
                return Err(RingError::DuplicateModulus(*q));
            }
        }
        let rings: Vec<Arc<Ring<u64>>> = moduli
            .iter()
            .map(|q| Ring::new(n, *q).map(Arc::new))
            .collect::<Result<_, _>>()?;
        Ok(RingRNS(rings))
    }

    pub fn log_n(&self) -> usize {
        self.0[0].log_n()
    }

    pub fn n(&self) -> usize {
        self.0[0].n()
    }

    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    pub fn max_level(&self) -> usize {
        self.level()
    }

    pub fn at(&self, i: usize) -> &Ring<u64> {
        &self.0[i]
    }

    pub fn moduli(&self) -> Vec<u64> {
        self.0.iter().map(|r| r.q()).collect()
    }

    /// Returns the product of q_0..=q_level.
    pub fn modulus_at_level(&self, level: usize) -> Integer {
        self.0[..level + 1]
            .iter()
            .fold(Integer::from(1), |acc, r| acc * r.q())
    }

    /// Returns the sub-chain q_0..=q_level; the rings are shared, not rebuilt.
    pub fn at_level(&self, level: usize) -> Result<RingRNS<u64>, RingError> {
        self.check_level(level, &[])?;
        Ok(RingRNS(self.0[..level + 1].to_vec()))
    }

    pub fn new_polyrns(&self) -> PolyRNS<u64> {
        PolyRNS::<u64>::new(self.n(), self.level())
    }

    pub fn new_polyrns_at_level(&self, level: usize) -> PolyRNS<u64> {
        PolyRNS::<u64>::new(self.n(), level)
    }

    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }

    /// Checks that level is admissible for the ring and every given polynomial.
    pub fn check_level(&self, level: usize, polys: &[&PolyRNS<u64>]) -> Result<(), RingError> {
        let max: usize = polys
            .iter()
            .fold(self.level(), |max, p| max.min(p.level()));
        if level > max {
            return Err(RingError::InvalidLevel { level, max });
        }
        if let Some(p) = polys.iter().find(|p| p.n() != self.n()) {
            return Err(RingError::DegreeMismatch(p.n(), self.n()));
        }
        Ok(())
    }

    /// Returns the smallest level among the ring and the given polynomials.
    pub fn min_level(&self, polys: &[&PolyRNS<u64>]) -> usize {
        polys
            .iter()
            .fold(self.level(), |min, p| min.min(p.level()))
    }
}

impl RingRNS<u64> {
    pub fn add_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].add(a.at(i), b.at(i), c.at_mut(i)));
    }

    /// Assigns a + b to c at the smallest level of the operands.
    pub fn add(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        let level: usize = self.min_level(&[a, b]).min(c.level());
        self.add_lvl(level, a, b, c)
    }

    pub fn add_inplace_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].add_inplace(a.at(i), b.at_mut(i)));
    }

    pub fn sub_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].sub(a.at(i), b.at(i), c.at_mut(i)));
    }

    pub fn neg_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].neg(a.at(i), b.at_mut(i)));
    }

    /// Writes the signed values to every row of a up to level.
    pub fn from_i64_lvl(&self, level: usize, values: &[i64], a: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].from_i64(values, a.at_mut(i)));
    }

    pub fn ntt_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].ntt(a.at(i), b.at_mut(i)));
    }

    pub fn intt_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].intt(a.at(i), b.at_mut(i)));
    }

    pub fn ntt_inplace_lvl(&self, level: usize, a: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].ntt_inplace(a.at_mut(i)));
    }

    pub fn intt_inplace_lvl(&self, level: usize, a: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].intt_inplace(a.at_mut(i)));
    }

    pub fn mform_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].mform(a.at(i), b.at_mut(i)));
    }

    pub fn inv_mform_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].inv_mform(a.at(i), b.at_mut(i)));
    }

    /// Assigns a * b * 2^-64 to c, where a is in Montgomery form.
    pub fn mul_coeffs_montgomery_lvl(&self, level: usize, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].mul_coeffs_montgomery(a.at(i), b.at(i), c.at_mut(i)));
    }

    /// Assigns c + a * b * 2^-64 to c, where a is in Montgomery form.
    pub fn mul_coeffs_montgomery_and_add_lvl(
        &self,
        level: usize,
        a: &PolyRNS<u64>,
        b: &PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
    ) {
        (0..level + 1).for_each(|i| self.0[i].mul_coeffs_montgomery_and_add(a.at(i), b.at(i), c.at_mut(i)));
    }

    pub fn permute_ntt_with_index_lvl(&self, level: usize, a: &PolyRNS<u64>, index: &[usize], b: &mut PolyRNS<u64>) {
        (0..level + 1).for_each(|i| self.0[i].permute_ntt_with_index(a.at(i), index, b.at_mut(i)));
    }

    /// Reduces values mod q_row and writes them to the row `row` of a.
    pub fn set_coeffs(&self, row: usize, values: &[u64], a: &mut PolyRNS<u64>) {
        let barrett = &self.0[row].modulus.barrett;
        a.at_mut(row)
            .0
            .iter_mut()
            .zip(values.iter())
            .for_each(|(a, v)| *a = barrett.reduce::<BARRETT>(v));
    }

    /// Returns the bit length of the sum of the coefficients of a,
    /// reconstructed mod q_0 * ... * q_level.
    pub fn log2_of_inner_sum(&self, level: usize, a: &PolyRNS<u64>) -> u64 {
        let sums: Vec<u64> = (0..level + 1)
            .map(|i| self.0[i].inner_sum(a.at(i)))
            .collect();

        if sums.iter().all(|s| *s == sums[0]) {
            return (u64::BITS - sums[0].leading_zeros()) as u64;
        }

        let q_big: Integer = self.modulus_at_level(level);

        let mut acc: Integer = Integer::new();
        sums.iter().enumerate().for_each(|(i, s)| {
            let ring: &Ring<u64> = &self.0[i];
            let q_i: u64 = ring.q();
            let (q_hat, q_hat_mod_qi) = (0..level + 1).filter(|k| *k != i).fold(
                (Integer::from(1), 1u64),
                |(big, small), k| {
                    let q_k: u64 = self.0[k].q();
                    (big * q_k, ((small as u128 * (q_k % q_i) as u128) % q_i as u128) as u64)
                },
            );
            let q_hat_inv: u64 = ring.modulus.inv(q_hat_mod_qi);
            let t: u64 = ((*s as u128 * q_hat_inv as u128) % q_i as u128) as u64;
            acc += q_hat * t;
        });
        acc %= &q_big;
        acc.significant_bits() as u64
    }
}
