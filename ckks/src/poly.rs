use math::poly::PolyRNS;
use math::ring::{RingQP, RingRNS};
use parking_lot::RwLock;
use std::sync::Arc;

/// A polynomial that several owners may read and write.
pub type PolyCell = RwLock<PolyRNS<u64>>;

/// Shared handle to a [PolyCell]; clones alias the same coefficients.
pub type SharedPoly = Arc<PolyCell>;

pub fn shared(poly: PolyRNS<u64>) -> SharedPoly {
    Arc::new(RwLock::new(poly))
}

pub fn new_shared(ring: &RingRNS<u64>) -> SharedPoly {
    shared(ring.new_polyrns())
}

/// A polynomial over the extended basis QP. The two halves are shared, so
/// handles to `q` or `p` alias this polynomial.
#[derive(Clone)]
pub struct PolyQP {
    pub q: SharedPoly,
    pub p: SharedPoly,
}

impl PolyQP {
    pub fn new(ring_qp: &RingQP) -> Self {
        Self {
            q: new_shared(&ring_qp.ring_q),
            p: new_shared(&ring_qp.ring_p),
        }
    }

    pub fn from_parts(q: PolyRNS<u64>, p: PolyRNS<u64>) -> Self {
        Self {
            q: shared(q),
            p: shared(p),
        }
    }

    pub fn level_q(&self) -> usize {
        self.q.read().level()
    }

    pub fn level_p(&self) -> usize {
        self.p.read().level()
    }

    /// Returns a deep copy that shares nothing with self.
    pub fn copy_new(&self) -> Self {
        Self::from_parts(self.q.read().clone(), self.p.read().clone())
    }

    /// Copies the coefficients of other into self, up to the smaller levels.
    pub fn copy_from(&self, other: &PolyQP) {
        copy_shared(&self.q, &other.q);
        copy_shared(&self.p, &other.p);
    }

    pub fn equals(&self, other: &PolyQP) -> bool {
        equals_shared(&self.q, &other.q) && equals_shared(&self.p, &other.p)
    }
}

/// Copies src into dst; a no-op when both name the same polynomial.
pub fn copy_shared(dst: &SharedPoly, src: &SharedPoly) {
    if Arc::ptr_eq(dst, src) {
        return;
    }
    dst.write().copy(&src.read());
}

pub fn equals_shared(a: &SharedPoly, b: &SharedPoly) -> bool {
    Arc::ptr_eq(a, b) || *a.read() == *b.read()
}
