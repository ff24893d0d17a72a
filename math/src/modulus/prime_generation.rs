use crate::error::RingError;
use crate::modulus::prime::{is_prime, MAX_MODULUS};

/// Enumerates primes q = 1 mod nth_root close to 2^bit_size, walking
/// upward from 2^bit_size + 1 and downward from 2^bit_size + 1 - nth_root.
pub struct NTTFriendlyPrimesGenerator {
    size: f64,
    bit_size: u64,
    next_prime: u64,
    prev_prime: u64,
    nth_root: u64,
    check_next_prime: bool,
    check_prev_prime: bool,
}

impl NTTFriendlyPrimesGenerator {
    pub fn new(bit_size: u64, nth_root: u64) -> Self {
        assert!(bit_size <= 61, "invalid bit_size: {} > 61", bit_size);
        let next_prime: u64 = (1 << bit_size) + 1;
        let check_prev_prime: bool = next_prime > nth_root;
        let prev_prime: u64 = next_prime.saturating_sub(nth_root);
        Self {
            size: bit_size as f64,
            bit_size,
            next_prime,
            prev_prime,
            nth_root,
            check_next_prime: true,
            check_prev_prime,
        }
    }

    fn exhausted(&self) -> RingError {
        RingError::PrimesExhausted {
            bit_size: self.bit_size,
            nth_root: self.nth_root,
        }
    }

    fn upstream_exhausted(&self) -> bool {
        (self.next_prime as f64).log2() - self.size >= 0.5 || self.next_prime >= MAX_MODULUS
    }

    fn downstream_exhausted(&self) -> bool {
        self.prev_prime < self.nth_root || self.size - (self.prev_prime as f64).log2() >= 0.5
    }

    pub fn next_upstream_prime(&mut self) -> Result<u64, RingError> {
        loop {
            if self.upstream_exhausted() {
                self.check_next_prime = false;
                return Err(self.exhausted());
            }
            let candidate: u64 = self.next_prime;
            self.next_prime += self.nth_root;
            if is_prime(candidate) {
                return Ok(candidate);
            }
        }
    }

    pub fn next_downstream_prime(&mut self) -> Result<u64, RingError> {
        loop {
            if !self.check_prev_prime || self.downstream_exhausted() {
                self.check_prev_prime = false;
                return Err(self.exhausted());
            }
            let candidate: u64 = self.prev_prime;
            self.prev_prime -= self.nth_root;
            if is_prime(candidate) {
                return Ok(candidate);
            }
        }
    }

    /// Returns the next prime, alternating between the upward and the
    /// downward walk until both are exhausted.
    pub fn next_alternating_prime(&mut self) -> Result<u64, RingError> {
        loop {
            if !(self.check_next_prime || self.check_prev_prime) {
                return Err(self.exhausted());
            }

            if self.check_next_prime {
                if self.upstream_exhausted() {
                    self.check_next_prime = false;
                } else {
                    let candidate: u64 = self.next_prime;
                    self.next_prime += self.nth_root;
                    if is_prime(candidate) {
                        return Ok(candidate);
                    }
                }
            }

            if self.check_prev_prime {
                if self.downstream_exhausted() {
                    self.check_prev_prime = false;
                } else {
                    let candidate: u64 = self.prev_prime;
                    self.prev_prime -= self.nth_root;
                    if is_prime(candidate) {
                        return Ok(candidate);
                    }
                }
            }
        }
    }

    pub fn next_alternating_primes(&mut self, k: usize) -> Result<Vec<u64>, RingError> {
        (0..k).map(|_| self.next_alternating_prime()).collect()
    }

    pub fn next_downstream_primes(&mut self, k: usize) -> Result<Vec<u64>, RingError> {
        (0..k).map(|_| self.next_downstream_prime()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::NTTFriendlyPrimesGenerator;
    use crate::modulus::prime::is_prime;

    #[test]
    fn prime_generation() {
        let nth_root: u64 = 1 << 16;
        let mut g: NTTFriendlyPrimesGenerator = NTTFriendlyPrimesGenerator::new(40, nth_root);
        let primes: Vec<u64> = g.next_alternating_primes(10).unwrap();
        for (i, q) in primes.iter().enumerate() {
            assert!(is_prime(*q));
            assert_eq!(q % nth_root, 1);
            assert!(!primes[..i].contains(q));
        }
    }

    #[test]
    fn downstream_stays_below_power_of_two() {
        let mut g: NTTFriendlyPrimesGenerator = NTTFriendlyPrimesGenerator::new(30, 1 << 12);
        g.next_downstream_primes(4)
            .unwrap()
            .iter()
            .for_each(|q| assert!(*q < 1 << 30));
    }

    #[test]
    fn small_sizes_exhaust() {
        let mut g: NTTFriendlyPrimesGenerator = NTTFriendlyPrimesGenerator::new(8, 1 << 6);
        assert!(g.next_alternating_primes(100).is_err());
    }
}
