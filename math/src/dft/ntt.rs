use crate::dft::DFT;
use crate::modulus::barrett::Barrett;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::WordOps;
use crate::modulus::ONCE;
use itertools::izip;

/// Negacyclic NTT over Z_q[X]/(X^n + 1), following the Cooley-Tukey /
/// Gentleman-Sande formulation of Longa and Naehrig.
pub struct Table<O> {
    prime: Prime<O>,
    psi: O,
    psi_forward_rev: Vec<Barrett<O>>,
    psi_backward_rev: Vec<Barrett<O>>,
    n_inv: Barrett<O>,
    q: O,
    two_q: O,
}

impl Table<u64> {
    /// Builds the twiddle tables of the negacyclic NTT of size n.
    /// Panics if q != 1 mod 2n.
    pub fn new(prime: Prime<u64>, n: usize) -> Table<u64> {
        assert!(
            n >= 2 && n & (n - 1) == 0,
            "invalid argument: n = {} is not a power of two >= 2",
            n
        );

        let nth_root: u64 = (n as u64) << 1;

        let psi: u64 = match prime.primitive_nth_root(nth_root) {
            Some(psi) => psi,
            None => panic!(
                "invalid prime: q={} has no primitive {}-th root of unity",
                prime.q, nth_root
            ),
        };

        let psi_inv: u64 = prime.inv(psi);

        let log_n: u32 = n.log2() as u32;

        let mut psi_forward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];
        let mut psi_backward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];

        let psi_barrett: Barrett<u64> = prime.barrett.prepare(psi);
        let psi_inv_barrett: Barrett<u64> = prime.barrett.prepare(psi_inv);

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 0..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);
            psi_forward_rev[i_rev] = prime.barrett.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.barrett.prepare(powers_backward);
            prime
                .barrett
                .mul_external_assign::<ONCE>(psi_barrett, &mut powers_forward);
            prime
                .barrett
                .mul_external_assign::<ONCE>(psi_inv_barrett, &mut powers_backward);
        }

        let n_inv: Barrett<u64> = prime.barrett.prepare(prime.inv(n as u64));
        let q: u64 = prime.q();

        Self {
            prime,
            psi,
            psi_forward_rev,
            psi_backward_rev,
            n_inv,
            q,
            two_q: q << 1,
        }
    }

    pub fn psi(&self) -> u64 {
        self.psi
    }

    pub fn n(&self) -> usize {
        self.psi_forward_rev.len()
    }
}

impl DFT<u64> for Table<u64> {
    fn forward_inplace(&self, a: &mut [u64]) {
        self.forward_inplace(a)
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        self.backward_inplace(a)
    }
}

impl Table<u64> {
    pub fn forward_inplace(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.n(),
            "invalid a.len()={} != table size={}",
            n,
            self.n()
        );

        let mut m: usize = 1;
        let mut t: usize = n;
        while m < n {
            t >>= 1;
            izip!(a.chunks_exact_mut(t << 1), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                let (a, b) = a.split_at_mut(t);
                izip!(a, b).for_each(|(a, b)| self.dit_inplace(a, b, *psi));
            });
            m <<= 1;
        }
    }

    pub fn backward_inplace(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.n(),
            "invalid a.len()={} != table size={}",
            n,
            self.n()
        );

        let mut m: usize = n;
        let mut t: usize = 1;
        while m > 1 {
            let h: usize = m >> 1;
            izip!(a.chunks_exact_mut(t << 1), &self.psi_backward_rev[h..]).for_each(|(a, psi)| {
                let (a, b) = a.split_at_mut(t);
                izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, *psi));
            });
            t <<= 1;
            m = h;
        }

        a.iter_mut()
            .for_each(|x| self.prime.barrett.mul_external_assign::<ONCE>(self.n_inv, x));
    }

    #[inline(always)]
    fn dit_inplace(&self, a: &mut u64, b: &mut u64, t: Barrett<u64>) {
        debug_assert!(*a < self.q, "a:{} q:{}", a, self.q);
        debug_assert!(*b < self.q, "b:{} q:{}", b, self.q);
        let v: u64 = self.prime.barrett.mul_external::<ONCE>(t, *b);
        *b = (*a + self.q - v).reduce_once(self.q);
        *a = (*a + v).reduce_once(self.q);
    }

    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, t: Barrett<u64>) {
        debug_assert!(*a < self.q, "a:{} q:{}", a, self.q);
        debug_assert!(*b < self.q, "b:{} q:{}", b, self.q);
        let d: u64 = *a + self.two_q - *b;
        *a = (*a + *b).reduce_once(self.q);
        *b = self.prime.barrett.mul_external::<ONCE>(t, d);
    }
}
