use crate::poly::PolyRNS;
use crate::ring::RingRNS;
use sampling::prng::Prng;
use std::sync::Arc;

/// Draws polynomials with coefficients uniform mod q_i from a shared PRNG.
pub struct UniformSampler {
    prng: Arc<Prng>,
    ring: Arc<RingRNS<u64>>,
}

impl UniformSampler {
    pub fn new(prng: Arc<Prng>, ring: Arc<RingRNS<u64>>) -> Self {
        Self { prng, ring }
    }

    pub fn ring(&self) -> &Arc<RingRNS<u64>> {
        &self.ring
    }

    pub fn read(&self, a: &mut PolyRNS<u64>) {
        self.ring.fill_uniform(&mut self.prng.lock(), a)
    }

    pub fn read_new(&self) -> PolyRNS<u64> {
        let mut a: PolyRNS<u64> = self.ring.new_polyrns();
        self.read(&mut a);
        a
    }
}
