use crate::modulus::ReduceOnce;
use crate::modulus::{REDUCEMOD, BARRETT, NONE, ONCE, TWICE};

/// A constant operand together with its precomputed quotient
/// floor(value * 2^64 / q), used for fast multiplications by a fixed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Barrett<O>(pub O, pub O);

impl<O: Copy> Barrett<O> {
    #[inline(always)]
    pub fn value(&self) -> O {
        self.0
    }

    #[inline(always)]
    pub fn quotient(&self) -> O {
        self.1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrettPrecomp<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    /// floor(2^64 / q)
    pub hi: O,
    pub one: Barrett<O>,
}

impl BarrettPrecomp<u64> {
    pub fn new(q: u64) -> BarrettPrecomp<u64> {
        debug_assert!(q > 1, "invalid modulus: q={} must be > 1", q);
        let big_r: u128 = u128::MAX / (q as u128);
        let mut precomp: BarrettPrecomp<u64> = Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            hi: (big_r >> 64) as u64,
            one: Barrett(0, 0),
        };
        precomp.one = precomp.prepare(1);
        precomp
    }

    /// Returns v with its quotient floor(v * 2^64 / q).
    /// User must ensure that v < q.
    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Barrett<u64> {
        debug_assert!(v < self.q, "invalid argument v: v={} >= q={}", v, self.q);
        let quotient: u64 = (((v as u128) << 64) / (self.q as u128)) as u64;
        Barrett(v, quotient)
    }

    /// Applies a modular reduction on x based on REDUCE:
    /// - NONE: no modular reduction.
    /// - ONCE: subtracts q if x >= q.
    /// - TWICE: subtracts 2q if x >= 2q and then q if x >= q.
    /// - BARRETT: maps x to x mod q using Barrett reduction.
    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            TWICE => {
                x.reduce_once_assign(self.two_q);
                x.reduce_once_assign(self.q);
            }
            BARRETT => {
                let mhi: u64 = (((*x as u128) * (self.hi as u128)) >> 64) as u64;
                *x = x.wrapping_sub(mhi.wrapping_mul(self.q));
                x.reduce_once_assign(self.two_q);
                x.reduce_once_assign(self.q);
            }
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: &u64) -> u64 {
        let mut r: u64 = *x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    /// Returns lhs * rhs mod q, lazily reduced in [0, 2q) before REDUCE is applied.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Barrett<u64>, rhs: u64) -> u64 {
        let t: u64 = (((lhs.1 as u128) * (rhs as u128)) >> 64) as u64;
        let mut r: u64 = lhs.0.wrapping_mul(rhs).wrapping_sub(self.q.wrapping_mul(t));
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: Barrett<u64>, rhs: &mut u64) {
        *rhs = self.mul_external::<REDUCE>(lhs, *rhs);
    }
}
