use ckks::ciphertext::CiphertextQP;
use ckks::dckks::{CkgProtocol, CkgShare, RkgProtocol};
use ckks::encryptor::Encryptor;
use ckks::keygen::KeyGenerator;
use ckks::keys::{PublicKey, SecretKey};
use ckks::poly::PolyQP;
use ckks::{Parameters, ParametersLiteral};
use math::poly::PolyRNS;
use math::ring::RingRNS;
use sampling::prng::Prng;

const PARTIES: usize = 3;

fn literal() -> ParametersLiteral {
    ParametersLiteral {
        log_n: 5,
        log_q: vec![40, 35, 35],
        log_p: vec![45],
        h: 16,
        sigma: 3.2,
        log_slots: 4,
        log_scale: 35,
    }
}

#[test]
fn ckks_protocols() {
    let params: Parameters = Parameters::new(literal()).unwrap();

    sub_test("test_public_key_decrypts_to_noise", || {
        test_public_key_decrypts_to_noise(&params)
    });
    sub_test("test_encrypt_zero_qp", || test_encrypt_zero_qp(&params));
    sub_test("test_encrypt_zero_qp_coefficient_domain", || {
        test_encrypt_zero_qp_coefficient_domain(&params)
    });
    sub_test("test_collective_public_key", || test_collective_public_key(&params));
    sub_test("test_rkg_beta", || test_rkg_beta(&params));
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

/// Largest centered coefficient of b + a*s over one chain, with b and a in
/// the NTT domain and s in NTT and Montgomery form.
fn phase_norm(ring: &RingRNS<u64>, b: &PolyRNS<u64>, a: &PolyRNS<u64>, s: &PolyRNS<u64>) -> u64 {
    let level: usize = ring.level();
    let mut phase: PolyRNS<u64> = b.clone();
    ring.mul_coeffs_montgomery_and_add_lvl(level, s, a, &mut phase);
    ring.intt_inplace_lvl(level, &mut phase);
    (0..level + 1)
        .flat_map(|i| {
            let q: u64 = ring.at(i).q();
            phase.at(i).0.iter().map(move |x| (*x).min(q - *x)).collect::<Vec<u64>>()
        })
        .max()
        .unwrap_or(0)
}

fn phase_norm_qp(params: &Parameters, b: &PolyQP, a: &PolyQP, sk: &SecretKey) -> (u64, u64) {
    (
        phase_norm(params.ring_q(), &b.q.read(), &a.q.read(), &sk.value.q.read()),
        phase_norm(params.ring_p(), &b.p.read(), &a.p.read(), &sk.value.p.read()),
    )
}

fn test_public_key_decrypts_to_noise(params: &Parameters) {
    let kgen: KeyGenerator = KeyGenerator::with_seed(params, [0u8; 32]);
    let sk: SecretKey = kgen.gen_secret_key();
    let pk: PublicKey = kgen.gen_public_key(&sk);
    let bound: u64 = (6.0 * params.sigma()).ceil() as u64;
    let (nq, np) = phase_norm_qp(params, &pk.value[0], &pk.value[1], &sk);
    assert!(nq <= bound, "{} > {}", nq, bound);
    assert!(np <= bound, "{} > {}", np, bound);
}

fn test_encrypt_zero_qp(params: &Parameters) {
    let kgen: KeyGenerator = KeyGenerator::with_seed(params, [1u8; 32]);
    let sk: SecretKey = kgen.gen_secret_key();
    let ct: CiphertextQP = CiphertextQP::new(params);
    Encryptor::with_seed(params, &sk, [2u8; 32]).encrypt_zero_qp(&ct);

    let bound: u64 = (6.0 * params.sigma()).ceil() as u64;
    let (nq, np) = phase_norm_qp(params, &ct.value[0], &ct.value[1], &sk);
    assert!(nq <= bound);
    assert!(np <= bound);
    assert!(ct.value[1].q.read().at(0).0.iter().any(|x| *x != 0));
}

fn test_encrypt_zero_qp_coefficient_domain(params: &Parameters) {
    let kgen: KeyGenerator = KeyGenerator::with_seed(params, [3u8; 32]);
    let sk: SecretKey = kgen.gen_secret_key();
    let ct: CiphertextQP = CiphertextQP::new(params);
    ct.meta.write().is_ntt = false;
    Encryptor::with_seed(params, &sk, [4u8; 32]).encrypt_zero_qp(&ct);

    let ring_q = params.ring_q();
    let level: usize = ring_q.level();
    let mut b: PolyRNS<u64> = ct.value[0].q.read().clone();
    let mut a: PolyRNS<u64> = ct.value[1].q.read().clone();
    ring_q.ntt_inplace_lvl(level, &mut b);
    ring_q.ntt_inplace_lvl(level, &mut a);
    let bound: u64 = (6.0 * params.sigma()).ceil() as u64;
    assert!(phase_norm(ring_q, &b, &a, &sk.value.q.read()) <= bound);
}

fn test_collective_public_key(params: &Parameters) {
    let ckg: CkgProtocol = CkgProtocol::with_seed(params, [5u8; 32]);
    let crp: PolyQP = ckg.sample_crp(&Prng::keyed(b"common reference"));

    let secrets: Vec<SecretKey> = (0..PARTIES)
        .map(|i| KeyGenerator::with_seed(params, [10 + i as u8; 32]).gen_secret_key())
        .collect();

    let round: CkgShare = ckg.allocate_share();
    for sk in secrets.iter() {
        let share: CkgShare = ckg.allocate_share();
        ckg.gen_share(sk, &crp, &share);
        ckg.aggregate(&round, &share, &round);
    }

    let pk: PublicKey = PublicKey::new(params);
    ckg.gen_public_key(&round, &crp, &pk);

    // The ideal secret is the sum of the parties' secrets.
    let ideal: SecretKey = SecretKey::new(params);
    for (ring, ideal_half, halves) in [
        (
            params.ring_q(),
            &ideal.value.q,
            secrets.iter().map(|sk| sk.value.q.clone()).collect::<Vec<_>>(),
        ),
        (
            params.ring_p(),
            &ideal.value.p,
            secrets.iter().map(|sk| sk.value.p.clone()).collect::<Vec<_>>(),
        ),
    ] {
        let mut sum: PolyRNS<u64> = ring.new_polyrns();
        for half in halves.iter() {
            ring.add_inplace_lvl(ring.level(), &half.read(), &mut sum);
        }
        *ideal_half.write() = sum;
    }

    let bound: u64 = PARTIES as u64 * (6.0 * params.sigma()).ceil() as u64;
    let (nq, np) = phase_norm_qp(params, &pk.value[0], &pk.value[1], &ideal);
    assert!(nq <= bound, "{} > {}", nq, bound);
    assert!(np <= bound, "{} > {}", np, bound);
}

fn test_rkg_beta(params: &Parameters) {
    assert_eq!(RkgProtocol::new(params).beta(), 3);
}
