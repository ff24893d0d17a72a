use crate::error::RingError;
use crate::poly::PolyRNS;
use crate::ring::{RingQP, RingRNS};
use std::sync::Arc;

impl RingQP {
    pub fn new(ring_q: Arc<RingRNS<u64>>, ring_p: Arc<RingRNS<u64>>) -> Result<Self, RingError> {
        if ring_q.n() != ring_p.n() {
            return Err(RingError::DegreeMismatch(ring_q.n(), ring_p.n()));
        }
        Ok(Self { ring_q, ring_p })
    }

    pub fn n(&self) -> usize {
        self.ring_q.n()
    }

    pub fn level_q(&self) -> usize {
        self.ring_q.level()
    }

    pub fn level_p(&self) -> usize {
        self.ring_p.level()
    }

    /// Returns a zero polynomial over the full Q and P chains.
    pub fn new_poly(&self) -> (PolyRNS<u64>, PolyRNS<u64>) {
        (self.ring_q.new_polyrns(), self.ring_p.new_polyrns())
    }
}
