pub mod impl_u64;

use crate::dft::ntt::Table;
use crate::modulus::prime::Prime;
use std::sync::{Arc, OnceLock};

/// Largest supported ring degree, as log2(n).
pub const MAX_LOG_N: usize = 17;

/// Z_q[X]/(X^n + 1) for a single NTT-friendly prime q.
pub struct Ring<O> {
    pub n: usize,
    pub modulus: Prime<O>,
    dft: OnceLock<Table<O>>,
}

/// A chain of rings sharing the same degree; index i holds modulus q_i.
#[derive(Clone)]
pub struct RingRNS<O>(pub Vec<Arc<Ring<O>>>);

/// The extended basis: a Q chain and a P chain over the same degree.
#[derive(Clone)]
pub struct RingQP {
    pub ring_q: Arc<RingRNS<u64>>,
    pub ring_p: Arc<RingRNS<u64>>,
}
