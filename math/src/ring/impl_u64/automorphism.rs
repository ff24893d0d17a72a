use crate::modulus::WordOps;
use crate::poly::Poly;
use crate::ring::{Ring, RingRNS};

/// Returns the lookup table of the automorphism X -> X^gal_el on polynomials
/// of degree n stored in bit-reversed NTT order: applying it with
/// [Ring::permute_ntt_with_index] matches the automorphism in the
/// coefficient domain followed by an NTT.
/// Panics if n is not a power of two or if gal_el is even.
pub fn permute_ntt_index(n: usize, gal_el: u64) -> Vec<usize> {
    assert!(n >= 2 && n & (n - 1) == 0, "invalid n={}: not a power-of-two", n);
    assert!(gal_el & 1 == 1, "invalid gal_el={}: not coprime with 2n={}", gal_el, n << 1);

    let mask: u64 = ((n as u64) << 1) - 1;
    let log_n: u32 = n.trailing_zeros();

    (0..n)
        .map(|i| {
            let i_rev: u64 = 2 * (i.reverse_bits_msb(log_n) as u64) + 1;
            let gal_el_i: u64 = (gal_el.wrapping_mul(i_rev) & mask) >> 1;
            (gal_el_i as usize).reverse_bits_msb(log_n)
        })
        .collect()
}

impl Ring<u64> {
    /// Assigns a(X^gal_el) to b, with a and b in the coefficient domain.
    pub fn automorphism(&self, a: &Poly<u64>, gal_el: u64, b: &mut Poly<u64>) {
        assert!(gal_el & 1 == 1, "invalid gal_el={}: even", gal_el);
        let n: usize = self.n();
        let mask: u64 = ((n as u64) << 1) - 1;
        let q: u64 = self.q();
        a.0.iter().enumerate().for_each(|(i, ai)| {
            let j: u64 = (i as u64).wrapping_mul(gal_el) & mask;
            if j < n as u64 {
                b.0[j as usize] = *ai
            } else {
                b.0[j as usize - n] = if *ai == 0 { 0 } else { q - ai }
            }
        });
    }
}

impl RingRNS<u64> {
    pub fn permute_ntt_index(&self, gal_el: u64) -> Vec<usize> {
        permute_ntt_index(self.n(), gal_el)
    }
}

#[cfg(test)]
mod tests {
    use super::permute_ntt_index;
    use crate::poly::Poly;
    use crate::ring::Ring;

    #[test]
    fn identity_index() {
        assert_eq!(permute_ntt_index(8, 1), (0..8).collect::<Vec<usize>>());
    }

    #[test]
    fn permutation_commutes_with_ntt() {
        let ring: Ring<u64> = Ring::new(16, 97).unwrap();
        let a: Poly<u64> = Poly((0..16u64).map(|i| (i * i + 3) % 97).collect());

        for gal_el in [3u64, 5, 31] {
            let mut a_auto: Poly<u64> = ring.new_poly();
            ring.automorphism(&a, gal_el, &mut a_auto);
            ring.ntt_inplace(&mut a_auto);

            let mut a_ntt: Poly<u64> = ring.new_poly();
            ring.ntt(&a, &mut a_ntt);
            let index: Vec<usize> = permute_ntt_index(16, gal_el);
            let mut a_perm: Poly<u64> = ring.new_poly();
            ring.permute_ntt_with_index(&a_ntt, &index, &mut a_perm);

            assert_eq!(a_auto, a_perm, "gal_el={}", gal_el);
        }
    }
}
