use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::ReduceOnce;
use crate::modulus::{REDUCEMOD, ONCE};

/// A value x stored as x * 2^64 mod q.
pub type Montgomery<O> = O;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MontgomeryPrecomp<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    pub barrett: BarrettPrecomp<O>,
    /// q^-1 mod 2^64
    pub q_inv: O,
    pub one: Montgomery<O>,
    pub minus_one: Montgomery<O>,
}

impl MontgomeryPrecomp<u64> {
    /// Returns a new set of Montgomery constants for the odd modulus q.
    pub fn new(q: u64) -> MontgomeryPrecomp<u64> {
        assert!(q & 1 == 1, "invalid argument: q={} is not odd", q);
        // Newton iteration doubles the number of correct low bits at each step.
        let mut q_inv: u64 = q;
        for _ in 0..5 {
            q_inv = q_inv.wrapping_mul(2u64.wrapping_sub(q.wrapping_mul(q_inv)));
        }
        let mut precomp: MontgomeryPrecomp<u64> = Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            barrett: BarrettPrecomp::new(q),
            q_inv,
            one: 0,
            minus_one: 0,
        };
        precomp.one = precomp.prepare(1);
        precomp.minus_one = precomp.prepare(q - 1);
        precomp
    }

    /// Returns x * 2^64 mod q.
    #[inline(always)]
    pub fn prepare(&self, x: u64) -> Montgomery<u64> {
        (((x as u128) << 64) % (self.q as u128)) as u64
    }

    /// Returns x * 2^-64 mod q.
    #[inline(always)]
    pub fn unprepare(&self, x: Montgomery<u64>) -> u64 {
        self.mul_external::<ONCE>(x, 1)
    }

    /// Returns lhs * rhs * 2^-64 mod q.
    /// User must ensure that lhs * rhs < q * 2^64.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: u64) -> u64 {
        let t: u128 = (lhs as u128) * (rhs as u128);
        let (mlo, mhi) = (t as u64, (t >> 64) as u64);
        let m: u64 = mlo.wrapping_mul(self.q_inv);
        let hhi: u64 = (((m as u128) * (self.q as u128)) >> 64) as u64;
        let mut r: u64 = mhi.wrapping_sub(hhi).wrapping_add(self.q);
        self.barrett.reduce_assign::<REDUCE>(&mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: &mut u64) {
        *rhs = self.mul_external::<REDUCE>(lhs, *rhs);
    }

    /// Returns lhs * rhs in the Montgomery domain.
    #[inline(always)]
    pub fn mul_internal(&self, lhs: Montgomery<u64>, rhs: Montgomery<u64>) -> Montgomery<u64> {
        self.mul_external::<ONCE>(lhs, rhs)
    }

    #[inline(always)]
    pub fn add_internal(&self, lhs: Montgomery<u64>, rhs: Montgomery<u64>) -> Montgomery<u64> {
        (lhs + rhs).reduce_once(self.q)
    }

    /// Returns x^exponent in the Montgomery domain.
    pub fn pow(&self, x: Montgomery<u64>, exponent: u64) -> Montgomery<u64> {
        let mut y: Montgomery<u64> = self.one;
        let mut x_pow: Montgomery<u64> = x;
        let mut i: u64 = exponent;
        while i > 0 {
            if i & 1 == 1 {
                y = self.mul_internal(x_pow, y);
            }
            x_pow = self.mul_internal(x_pow, x_pow);
            i >>= 1;
        }
        y
    }
}
