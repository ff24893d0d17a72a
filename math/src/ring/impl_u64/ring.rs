use crate::dft::ntt::Table;
use crate::error::RingError;
use crate::modulus::montgomery::Montgomery;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::{BARRETT, ONCE};
use crate::poly::Poly;
use crate::ring::{Ring, MAX_LOG_N};
use itertools::izip;
use std::sync::OnceLock;

impl Ring<u64> {
    /// Returns the ring Z_q[X]/(X^n + 1).
    /// Fails unless n is a power of two in [2, 2^MAX_LOG_N] and q is a
    /// prime < 2^61 with q = 1 mod 2n.
    pub fn new(n: usize, q: u64) -> Result<Self, RingError> {
        if n < 2 || n & (n - 1) != 0 || n.trailing_zeros() as usize > MAX_LOG_N {
            return Err(RingError::InvalidDegree(n));
        }
        let prime: Prime<u64> = Prime::new(q)?;
        let nth_root: u64 = (n as u64)
            .checked_mul(2)
            .ok_or(RingError::InvalidDegree(n))?;
        if q % nth_root != 1 {
            return Err(RingError::NotNttFriendly { q, nth_root });
        }
        Ok(Self {
            n,
            modulus: prime,
            dft: OnceLock::new(),
        })
    }

    pub fn log_n(&self) -> usize {
        self.n.trailing_zeros() as usize
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn q(&self) -> u64 {
        self.modulus.q
    }

    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }

    /// NTT tables are built on first use.
    fn dft(&self) -> &Table<u64> {
        self.dft
            .get_or_init(|| Table::new(self.modulus.clone(), self.n))
    }
}

impl Ring<u64> {
    pub fn ntt_inplace(&self, a: &mut Poly<u64>) {
        self.dft().forward_inplace(&mut a.0)
    }

    pub fn intt_inplace(&self, a: &mut Poly<u64>) {
        self.dft().backward_inplace(&mut a.0)
    }

    pub fn ntt(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        b.copy_from(a);
        self.ntt_inplace(b)
    }

    pub fn intt(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        b.copy_from(a);
        self.intt_inplace(b)
    }
}

impl Ring<u64> {
    #[inline(always)]
    fn check_n(&self, a: &Poly<u64>) {
        debug_assert!(
            a.n() == self.n(),
            "invalid argument: a.n()={} != self.n()={}",
            a.n(),
            self.n()
        );
    }

    /// Assigns a + b to c.
    pub fn add(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        self.check_n(a);
        self.check_n(b);
        let q: u64 = self.q();
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut()).for_each(|(a, b, c)| *c = (a + b).reduce_once(q));
    }

    /// Assigns a + b to b.
    pub fn add_inplace(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        self.check_n(a);
        let q: u64 = self.q();
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = (*a + *b).reduce_once(q));
    }

    /// Assigns a - b to c.
    pub fn sub(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        self.check_n(a);
        self.check_n(b);
        let q: u64 = self.q();
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut()).for_each(|(a, b, c)| *c = (a + q - b).reduce_once(q));
    }

    /// Assigns -a to b.
    pub fn neg(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        self.check_n(a);
        let q: u64 = self.q();
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = (q - a).reduce_once(q));
    }

    /// Assigns a * 2^64 mod q to b.
    pub fn mform(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        self.check_n(a);
        let montgomery = &self.modulus.montgomery;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = montgomery.prepare(*a));
    }

    /// Assigns a * 2^-64 mod q to b.
    pub fn inv_mform(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        self.check_n(a);
        let montgomery = &self.modulus.montgomery;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = montgomery.unprepare(*a));
    }

    /// Assigns a * b * 2^-64 mod q to c.
    pub fn mul_coeffs_montgomery(&self, a: &Poly<Montgomery<u64>>, b: &Poly<u64>, c: &mut Poly<u64>) {
        self.check_n(a);
        self.check_n(b);
        let montgomery = &self.modulus.montgomery;
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(a, b, c)| *c = montgomery.mul_external::<ONCE>(*a, *b));
    }

    /// Assigns c + a * b * 2^-64 mod q to c.
    pub fn mul_coeffs_montgomery_and_add(&self, a: &Poly<Montgomery<u64>>, b: &Poly<u64>, c: &mut Poly<u64>) {
        self.check_n(a);
        self.check_n(b);
        let montgomery = &self.modulus.montgomery;
        let q: u64 = self.q();
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(a, b, c)| *c = (*c + montgomery.mul_external::<ONCE>(*a, *b)).reduce_once(q));
    }

    /// Assigns a[index[i]] to b[i].
    pub fn permute_ntt_with_index(&self, a: &Poly<u64>, index: &[usize], b: &mut Poly<u64>) {
        self.check_n(a);
        assert!(
            index.len() == self.n(),
            "invalid index: index.len()={} != self.n()={}",
            index.len(),
            self.n()
        );
        izip!(index.iter(), b.0.iter_mut()).for_each(|(i, b)| *b = a.0[*i]);
    }

    /// Returns the sum of the coefficients of a mod q.
    pub fn inner_sum(&self, a: &Poly<u64>) -> u64 {
        let q: u64 = self.q();
        a.0.iter().fold(0u64, |acc, x| (acc + x).reduce_once(q))
    }

    /// Maps each signed value to its representative in [0, q).
    pub fn from_i64(&self, values: &[i64], a: &mut Poly<u64>) {
        let q: u64 = self.q();
        let barrett = &self.modulus.barrett;
        izip!(values.iter(), a.0.iter_mut()).for_each(|(v, a)| {
            let r: u64 = barrett.reduce::<BARRETT>(&v.unsigned_abs());
            *a = if *v < 0 { (q - r).reduce_once(q) } else { r };
        });
    }
}
