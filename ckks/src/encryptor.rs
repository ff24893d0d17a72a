use crate::ciphertext::CiphertextQP;
use crate::keys::SecretKey;
use crate::parameters::Parameters;
use math::poly::PolyRNS;
use math::ring::RingRNS;
use parking_lot::Mutex;
use rand_distr::{Distribution, Normal};
use sampling::source::{new_seed, Source};

/// Rejection bound of the error distribution, in standard deviations.
pub const ERROR_BOUND_SIGMAS: f64 = 6.0;

/// Samples n rounded Gaussian values of standard deviation sigma, bounded
/// by [ERROR_BOUND_SIGMAS] * sigma.
pub(crate) fn sample_error(source: &mut Source, n: usize, sigma: f64) -> Vec<i64> {
    let bound: f64 = ERROR_BOUND_SIGMAS * sigma;
    let normal: Normal<f64> = match Normal::new(0.0, sigma) {
        Ok(normal) => normal,
        Err(_) => return vec![0; n],
    };
    (0..n)
        .map(|_| loop {
            let x: f64 = normal.sample(source);
            if x.abs() <= bound {
                break x.round() as i64;
            }
        })
        .collect()
}

/// Samples a fresh error and returns it in the NTT domain over Q and P,
/// at the given levels. Both halves carry the same small polynomial.
pub(crate) fn sample_error_ntt_qp(
    params: &Parameters,
    source: &mut Source,
    level_q: usize,
    level_p: usize,
) -> (PolyRNS<u64>, PolyRNS<u64>) {
    let values: Vec<i64> = sample_error(source, params.n(), params.sigma());
    let lift = |ring: &RingRNS<u64>, level: usize| -> PolyRNS<u64> {
        let mut e: PolyRNS<u64> = ring.new_polyrns_at_level(level);
        ring.from_i64_lvl(level, &values, &mut e);
        ring.ntt_inplace_lvl(level, &mut e);
        e
    };
    (lift(params.ring_q(), level_q), lift(params.ring_p(), level_p))
}

/// Computes e - a * s over one chain, with s in Montgomery form and all
/// operands in the NTT domain.
pub(crate) fn sub_mul_secret(
    ring: &RingRNS<u64>,
    level: usize,
    e: &PolyRNS<u64>,
    s: &PolyRNS<u64>,
    a: &PolyRNS<u64>,
) -> PolyRNS<u64> {
    let mut tmp: PolyRNS<u64> = ring.new_polyrns_at_level(level);
    ring.mul_coeffs_montgomery_lvl(level, s, a, &mut tmp);
    let mut out: PolyRNS<u64> = ring.new_polyrns_at_level(level);
    ring.sub_lvl(level, e, &tmp, &mut out);
    out
}

/// Secret-key encryptor.
pub struct Encryptor {
    params: Parameters,
    sk: SecretKey,
    source: Mutex<Source>,
}

impl Encryptor {
    pub fn new(params: &Parameters, sk: &SecretKey) -> Self {
        Self::with_seed(params, sk, new_seed())
    }

    pub fn with_seed(params: &Parameters, sk: &SecretKey, seed: [u8; 32]) -> Self {
        Self {
            params: params.clone(),
            sk: sk.clone(),
            source: Mutex::new(Source::new(seed)),
        }
    }

    /// Writes an encryption of zero (-a*s + e, a) into ct, honouring the
    /// NTT and Montgomery flags of its metadata.
    pub fn encrypt_zero_qp(&self, ct: &CiphertextQP) {
        let (is_ntt, is_montgomery) = {
            let meta = ct.meta.read();
            (meta.is_ntt, meta.is_montgomery)
        };

        let level_q: usize = ct.value[0].level_q().min(ct.value[1].level_q());
        let level_p: usize = ct.value[0].level_p().min(ct.value[1].level_p());

        let ring_q: &RingRNS<u64> = self.params.ring_q();
        let ring_p: &RingRNS<u64> = self.params.ring_p();

        let s_q: PolyRNS<u64> = self.sk.value.q.read().clone();
        let s_p: PolyRNS<u64> = self.sk.value.p.read().clone();

        let mut source = self.source.lock();
        let (e_q, e_p) = sample_error_ntt_qp(&self.params, &mut source, level_q, level_p);

        let mut a_q: PolyRNS<u64> = ring_q.new_polyrns_at_level(level_q);
        let mut a_p: PolyRNS<u64> = ring_p.new_polyrns_at_level(level_p);
        ring_q.fill_uniform(&mut source, &mut a_q);
        ring_p.fill_uniform(&mut source, &mut a_p);
        drop(source);

        let mut b_q: PolyRNS<u64> = sub_mul_secret(ring_q, level_q, &e_q, &s_q, &a_q);
        let mut b_p: PolyRNS<u64> = sub_mul_secret(ring_p, level_p, &e_p, &s_p, &a_p);

        for (ring, level, b, a) in [
            (ring_q, level_q, &mut b_q, &mut a_q),
            (ring_p, level_p, &mut b_p, &mut a_p),
        ] {
            if is_montgomery {
                let tmp: PolyRNS<u64> = b.clone();
                ring.mform_lvl(level, &tmp, b);
                let tmp: PolyRNS<u64> = a.clone();
                ring.mform_lvl(level, &tmp, a);
            }
            if !is_ntt {
                ring.intt_inplace_lvl(level, b);
                ring.intt_inplace_lvl(level, a);
            }
        }

        ct.value[0].q.write().copy(&b_q);
        ct.value[0].p.write().copy(&b_p);
        ct.value[1].q.write().copy(&a_q);
        ct.value[1].p.write().copy(&a_p);
    }
}
