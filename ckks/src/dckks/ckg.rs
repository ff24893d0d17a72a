use crate::encryptor::{sample_error_ntt_qp, sub_mul_secret};
use crate::keys::{PublicKey, SecretKey};
use crate::parameters::Parameters;
use crate::poly::PolyQP;
use math::poly::PolyRNS;
use math::ring::RingRNS;
use parking_lot::Mutex;
use sampling::prng::Prng;
use sampling::source::{new_seed, Source};

/// Collective public-key generation. Every party publishes
/// share_i = -s_i * crp + e_i; the sum of all shares together with the
/// common reference polynomial crp is a public key for the sum of secrets.
pub struct CkgProtocol {
    params: Parameters,
    source: Mutex<Source>,
}

/// One party's contribution, in the NTT domain over QP.
#[derive(Clone)]
pub struct CkgShare {
    pub value: PolyQP,
}

impl CkgProtocol {
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

    pub fn allocate_share(&self) -> CkgShare {
        CkgShare {
            value: PolyQP::new(self.params.ring_qp()),
        }
    }

    /// Samples the common reference polynomial from a PRNG all parties share.
    pub fn sample_crp(&self, prng: &Prng) -> PolyQP {
        let crp: PolyQP = PolyQP::new(self.params.ring_qp());
        let mut source = prng.lock();
        self.params.ring_q().fill_uniform(&mut source, &mut crp.q.write());
        self.params.ring_p().fill_uniform(&mut source, &mut crp.p.write());
        crp
    }

    /// Writes -s * crp + e into share.
    pub fn gen_share(&self, sk: &SecretKey, crp: &PolyQP, share: &CkgShare) {
        let ring_q: &RingRNS<u64> = self.params.ring_q();
        let ring_p: &RingRNS<u64> = self.params.ring_p();
        let (level_q, level_p) = (ring_q.level(), ring_p.level());

        let (e_q, e_p) = sample_error_ntt_qp(&self.params, &mut self.source.lock(), level_q, level_p);

        let out_q: PolyRNS<u64> =
            sub_mul_secret(ring_q, level_q, &e_q, &sk.value.q.read(), &crp.q.read());
        let out_p: PolyRNS<u64> =
            sub_mul_secret(ring_p, level_p, &e_p, &sk.value.p.read(), &crp.p.read());

        share.value.q.write().copy(&out_q);
        share.value.p.write().copy(&out_p);
    }

    /// Writes share1 + share2 into out. out may be one of the inputs.
    pub fn aggregate(&self, share1: &CkgShare, share2: &CkgShare, out: &CkgShare) {
        let ring_q: &RingRNS<u64> = self.params.ring_q();
        let ring_p: &RingRNS<u64> = self.params.ring_p();

        let sum_q: PolyRNS<u64> = {
            let mut sum: PolyRNS<u64> = ring_q.new_polyrns();
            ring_q.add_lvl(ring_q.level(), &share1.value.q.read_recursive(), &share2.value.q.read_recursive(), &mut sum);
            sum
        };
        let sum_p: PolyRNS<u64> = {
            let mut sum: PolyRNS<u64> = ring_p.new_polyrns();
            ring_p.add_lvl(ring_p.level(), &share1.value.p.read_recursive(), &share2.value.p.read_recursive(), &mut sum);
            sum
        };

        out.value.q.write().copy(&sum_q);
        out.value.p.write().copy(&sum_p);
    }

    /// Writes (round_share, crp) into pk.
    pub fn gen_public_key(&self, round_share: &CkgShare, crp: &PolyQP, pk: &PublicKey) {
        pk.value[0].copy_from(&round_share.value);
        pk.value[1].copy_from(crp);
    }
}
