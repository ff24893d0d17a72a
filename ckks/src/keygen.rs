use crate::encryptor::{sample_error_ntt_qp, sub_mul_secret};
use crate::error::Error;
use crate::keys::{PublicKey, SecretKey};
use crate::parameters::Parameters;
use math::poly::PolyRNS;
use math::ring::RingRNS;
use parking_lot::Mutex;
use sampling::distributions::Ternary;
use sampling::source::{new_seed, Source};
use tracing::trace;

pub struct KeyGenerator {
    params: Parameters,
    source: Mutex<Source>,
}

impl KeyGenerator {
    pub fn new(params: &Parameters) -> Self {
        Self::with_seed(params, new_seed())
    }

    pub fn with_seed(params: &Parameters, seed: [u8; 32]) -> Self {
        Self {
            params: params.clone(),
            source: Mutex::new(Source::new(seed)),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Samples a ternary secret with the Hamming weight of the parameters.
    pub fn gen_secret_key(&self) -> SecretKey {
        self.gen_secret_key_ternary(Ternary::HammingWeight(self.params.h()))
    }

    pub fn gen_secret_key_with_hamming_weight(&self, h: usize) -> Result<SecretKey, Error> {
        if h > self.params.n() {
            return Err(Error::InvalidParameters(format!(
                "h={} > n={}",
                h,
                self.params.n()
            )));
        }
        Ok(self.gen_secret_key_ternary(Ternary::HammingWeight(h)))
    }

    fn gen_secret_key_ternary(&self, ternary: Ternary) -> SecretKey {
        let mut coeffs: Vec<i8> = vec![0; self.params.n()];
        ternary.fill(&mut self.source.lock(), &mut coeffs);
        let values: Vec<i64> = coeffs.iter().map(|c| *c as i64).collect();

        let sk: SecretKey = SecretKey::new(&self.params);
        for (ring, poly) in [
            (self.params.ring_q(), &sk.value.q),
            (self.params.ring_p(), &sk.value.p),
        ] {
            let mut s: PolyRNS<u64> = ring.new_polyrns();
            encode_secret(ring, &values, &mut s);
            *poly.write() = s;
        }
        trace!(?ternary, "secret key");
        sk
    }

    /// Returns a public key (-a*s + e, a) over QP with uniform a.
    pub fn gen_public_key(&self, sk: &SecretKey) -> PublicKey {
        let pk: PublicKey = PublicKey::new(&self.params);
        let ring_q: &RingRNS<u64> = self.params.ring_q();
        let ring_p: &RingRNS<u64> = self.params.ring_p();
        let (level_q, level_p) = (ring_q.level(), ring_p.level());

        let mut source = self.source.lock();
        let (e_q, e_p) = sample_error_ntt_qp(&self.params, &mut source, level_q, level_p);
        let mut a_q: PolyRNS<u64> = ring_q.new_polyrns();
        let mut a_p: PolyRNS<u64> = ring_p.new_polyrns();
        ring_q.fill_uniform(&mut source, &mut a_q);
        ring_p.fill_uniform(&mut source, &mut a_p);
        drop(source);

        let b_q: PolyRNS<u64> = sub_mul_secret(ring_q, level_q, &e_q, &sk.value.q.read(), &a_q);
        let b_p: PolyRNS<u64> = sub_mul_secret(ring_p, level_p, &e_p, &sk.value.p.read(), &a_p);

        *pk.value[0].q.write() = b_q;
        *pk.value[0].p.write() = b_p;
        *pk.value[1].q.write() = a_q;
        *pk.value[1].p.write() = a_p;
        pk
    }
}

/// Maps signed coefficients to the NTT domain in Montgomery form.
fn encode_secret(ring: &RingRNS<u64>, values: &[i64], s: &mut PolyRNS<u64>) {
    let level: usize = ring.level();
    ring.from_i64_lvl(level, values, s);
    ring.ntt_inplace_lvl(level, s);
    let tmp: PolyRNS<u64> = s.clone();
    ring.mform_lvl(level, &tmp, s);
}
