use math::poly::PolyRNS;
use math::ring::impl_u64::basis_extension::BasisExtender;
use math::ring::RingRNS;
use sampling::source::Source;
use std::sync::Arc;

const Q: [u64; 3] = [0x1fffffffffe00001, 0x1fffffffffc80001, 0x1fffffffffb40001];
const P: [u64; 1] = [0x1fffffffff500001];

#[test]
fn ring_rns_u64() {
    let n: usize = 1 << 6;
    let ring_q: RingRNS<u64> = RingRNS::new(n, &Q).unwrap();

    sub_test("test_add_is_pointwise", || test_add_is_pointwise(&ring_q));
    sub_test("test_ntt_roundtrip", || test_ntt_roundtrip(&ring_q));
    sub_test("test_ntt_multiplication", || test_ntt_multiplication(&ring_q));
    sub_test("test_add_at_lower_level", || test_add_at_lower_level(&ring_q));
}

#[test]
fn basis_extension_u64() {
    let n: usize = 1 << 4;
    let ring_q: Arc<RingRNS<u64>> = Arc::new(RingRNS::new(n, &Q).unwrap());
    let ring_p: Arc<RingRNS<u64>> = Arc::new(RingRNS::new(n, &P).unwrap());
    let extender: BasisExtender = BasisExtender::new(ring_q.clone(), ring_p.clone()).unwrap();

    sub_test("test_mod_up_small_values", || {
        test_mod_up_small_values(&ring_q, &ring_p, &extender)
    });
    sub_test("test_mod_up_rejects_levels", || {
        test_mod_up_rejects_levels(&ring_q, &ring_p, &extender)
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn test_add_is_pointwise(ring: &RingRNS<u64>) {
    let mut source: Source = Source::new([0u8; 32]);
    let mut a: PolyRNS<u64> = ring.new_polyrns();
    let mut b: PolyRNS<u64> = ring.new_polyrns();
    let mut c: PolyRNS<u64> = ring.new_polyrns();
    ring.fill_uniform(&mut source, &mut a);
    ring.fill_uniform(&mut source, &mut b);
    ring.add(&a, &b, &mut c);
    (0..ring.level() + 1).for_each(|i| {
        let q: u128 = ring.at(i).q() as u128;
        (0..ring.n()).for_each(|j| {
            let want: u64 = ((a.at(i).0[j] as u128 + b.at(i).0[j] as u128) % q) as u64;
            assert_eq!(c.at(i).0[j], want);
        })
    });
}

fn test_ntt_roundtrip(ring: &RingRNS<u64>) {
    let mut source: Source = Source::new([1u8; 32]);
    let mut a: PolyRNS<u64> = ring.new_polyrns();
    ring.fill_uniform(&mut source, &mut a);
    let mut b: PolyRNS<u64> = ring.new_polyrns();
    ring.ntt_lvl(ring.level(), &a, &mut b);
    assert_ne!(a, b);
    ring.intt_inplace_lvl(ring.level(), &mut b);
    assert_eq!(a, b);
}

fn test_ntt_multiplication(ring: &RingRNS<u64>) {
    let level: usize = ring.level();
    // X * X^(n-1) = X^n = -1
    let mut a: PolyRNS<u64> = ring.new_polyrns();
    let mut b: PolyRNS<u64> = ring.new_polyrns();
    (0..level + 1).for_each(|i| {
        a.at_mut(i).0[1] = 1;
        b.at_mut(i).0[ring.n() - 1] = 1;
    });
    ring.ntt_inplace_lvl(level, &mut a);
    ring.ntt_inplace_lvl(level, &mut b);

    let mut a_mont: PolyRNS<u64> = ring.new_polyrns();
    ring.mform_lvl(level, &a, &mut a_mont);
    let mut c: PolyRNS<u64> = ring.new_polyrns();
    ring.mul_coeffs_montgomery_and_add_lvl(level, &a_mont, &b, &mut c);
    ring.intt_inplace_lvl(level, &mut c);

    (0..level + 1).for_each(|i| {
        let q: u64 = ring.at(i).q();
        assert_eq!(c.at(i).0[0], q - 1);
        assert!(c.at(i).0[1..].iter().all(|x| *x == 0));
    });
}

fn test_add_at_lower_level(ring: &RingRNS<u64>) {
    let mut a: PolyRNS<u64> = ring.new_polyrns_at_level(1);
    let b: PolyRNS<u64> = {
        let mut b: PolyRNS<u64> = ring.new_polyrns();
        b.set_all(&1);
        b
    };
    a.set_all(&2);
    let mut c: PolyRNS<u64> = ring.new_polyrns();
    ring.add(&a, &b, &mut c);
    assert!(c.at(0).0.iter().all(|x| *x == 3));
    assert!(c.at(1).0.iter().all(|x| *x == 3));
    assert!(c.at(2).0.iter().all(|x| *x == 0));
}

fn test_mod_up_small_values(ring_q: &RingRNS<u64>, ring_p: &RingRNS<u64>, extender: &BasisExtender) {
    let values: Vec<i64> = (0..ring_q.n() as i64).map(|i| (i - 8) * 1_000_003).collect();

    let mut pol_q: PolyRNS<u64> = ring_q.new_polyrns();
    (0..ring_q.level() + 1).for_each(|i| ring_q.at(i).from_i64(&values, pol_q.at_mut(i)));

    let mut pol_p: PolyRNS<u64> = ring_p.new_polyrns();
    extender
        .mod_up_q_to_p(ring_q.level(), ring_p.level(), &pol_q, &mut pol_p)
        .unwrap();

    let mut want: PolyRNS<u64> = ring_p.new_polyrns();
    ring_p.at(0).from_i64(&values, want.at_mut(0));
    assert_eq!(pol_p, want);

    // Same values at a lower level of the Q chain.
    let mut pol_p_lvl: PolyRNS<u64> = ring_p.new_polyrns();
    extender.mod_up_q_to_p(1, 0, &pol_q, &mut pol_p_lvl).unwrap();
    assert_eq!(pol_p_lvl, want);
}

fn test_mod_up_rejects_levels(ring_q: &RingRNS<u64>, ring_p: &RingRNS<u64>, extender: &BasisExtender) {
    let pol_q: PolyRNS<u64> = ring_q.new_polyrns_at_level(0);
    let mut pol_p: PolyRNS<u64> = ring_p.new_polyrns();
    assert!(extender.mod_up_q_to_p(1, 0, &pol_q, &mut pol_p).is_err());
    assert!(extender.mod_up_q_to_p(0, 1, &pol_q, &mut pol_p).is_err());
}
