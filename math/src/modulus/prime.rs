use crate::error::RingError;
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::montgomery::{Montgomery, MontgomeryPrecomp};

/// Largest admissible modulus (exclusive): lazy reductions keep values in [0, 4q).
pub const MAX_MODULUS: u64 = 1 << 61;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prime<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    pub montgomery: MontgomeryPrecomp<O>,
    pub barrett: BarrettPrecomp<O>,
    pub phi: O,
}

impl Prime<u64> {
    /// Returns a new instance of Prime<u64>.
    /// Fails if q is not a prime or if q >= 2^61.
    pub fn new(q: u64) -> Result<Self, RingError> {
        if q >= MAX_MODULUS || !is_prime(q) || q == 2 {
            return Err(RingError::NotPrime(q));
        }
        Ok(Self::new_unchecked(q))
    }

    /// Returns a new instance of Prime<u64>.
    /// Does not check if q is a prime.
    pub fn new_unchecked(q: u64) -> Self {
        debug_assert!(q < MAX_MODULUS, "invalid modulus: q={} >= 2^61", q);
        Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            montgomery: MontgomeryPrecomp::new(q),
            barrett: BarrettPrecomp::new(q),
            phi: q - 1,
        }
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x^exponent mod q.
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let x_mont: Montgomery<u64> = self.montgomery.prepare(x);
        self.montgomery.unprepare(self.montgomery.pow(x_mont, exponent))
    }

    /// Returns x^-1 mod q.
    /// User must ensure that x is not divisible by q.
    pub fn inv(&self, x: u64) -> u64 {
        self.pow(x, self.phi - 1)
    }

    /// Returns a primitive nth root of unity mod q, with nth_root a power of two.
    /// Returns None if q != 1 mod nth_root.
    pub fn primitive_nth_root(&self, nth_root: u64) -> Option<u64> {
        if nth_root < 2 || nth_root & (nth_root - 1) != 0 || self.q % nth_root != 1 {
            return None;
        }

        let exponent: u64 = self.phi / nth_root;
        let minus_one: u64 = self.q - 1;

        // g^((q-1)/nth_root) is a primitive root iff its (nth_root/2)-th power is -1.
        (2..self.q)
            .map(|g| self.pow(g, exponent))
            .find(|psi| self.pow(*psi, nth_root >> 1) == minus_one)
    }
}

/// Deterministic Miller-Rabin test for 64-bit integers.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }

    for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
        if n % p == 0 {
            return n == p;
        }
    }

    let d: u64 = (n - 1) >> (n - 1).trailing_zeros();
    let s: u32 = (n - 1).trailing_zeros();

    let mul_mod = |a: u64, b: u64| -> u64 { ((a as u128 * b as u128) % n as u128) as u64 };

    let pow_mod = |mut x: u64, mut e: u64| -> u64 {
        let mut y: u64 = 1;
        while e > 0 {
            if e & 1 == 1 {
                y = mul_mod(y, x);
            }
            x = mul_mod(x, x);
            e >>= 1;
        }
        y
    };

    // Bases from Jim Sinclair, sufficient for all n < 2^64.
    'witness: for a in [2u64, 325, 9375, 28178, 450775, 9780504, 1795265022] {
        let a: u64 = a % n;
        if a == 0 {
            continue;
        }
        let mut x: u64 = pow_mod(a, d);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::{is_prime, Prime};

    #[test]
    fn miller_rabin() {
        let primes: [u64; 6] = [97, 193, 257, 65537, 0x1fffffffffe00001, 0x1fffffffffc80001];
        primes.iter().for_each(|q| assert!(is_prime(*q), "{} should be prime", q));
        let composites: [u64; 5] = [1, 91, 561, 3215031751, 4294967297];
        composites.iter().for_each(|q| assert!(!is_prime(*q), "{} should be composite", q));
    }

    #[test]
    fn primitive_root_has_exact_order() {
        let prime: Prime<u64> = Prime::new(97).unwrap();
        let psi: u64 = prime.primitive_nth_root(32).unwrap();
        assert_eq!(prime.pow(psi, 32), 1);
        assert_eq!(prime.pow(psi, 16), 96);
        assert!(prime.primitive_nth_root(64).is_none());
    }

    #[test]
    fn inverse() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffe00001).unwrap();
        let x: u64 = 123456789;
        assert_eq!(prime.pow(x, 0), 1);
        let x_inv: u64 = prime.inv(x);
        assert_eq!(((x as u128 * x_inv as u128) % prime.q as u128) as u64, 1);
    }

    #[test]
    fn rejects_non_primes_and_large_moduli() {
        assert!(Prime::new(91).is_err());
        assert!(Prime::new((1 << 61) + 1).is_err());
    }
}
