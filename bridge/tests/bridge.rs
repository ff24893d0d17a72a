use bridge::abi::{HandleResult, Status, U64Result};
use bridge::lifecycle::{lattice_handle_kind, lattice_last_error, lattice_live_handles, lattice_release};
use bridge::multiparty::*;
use bridge::prng::lattice_new_keyed_prng;
use bridge::registry::ObjectKind;
use bridge::ring::*;
use bridge::scheme::*;

const Q: [u64; 3] = [0x1fffffffffe00001, 0x1fffffffffc80001, 0x1fffffffffb40001];
const P: [u64; 1] = [0x1fffffffff500001];
const N: usize = 16;

fn ok(r: HandleResult) -> u64 {
    assert_eq!(r.status, Status::Ok);
    assert_ne!(r.handle, 0);
    r.handle
}

fn ok_u64(r: U64Result) -> u64 {
    assert_eq!(r.status, Status::Ok);
    r.value
}

fn new_ring(moduli: &[u64]) -> u64 {
    ok(unsafe { lattice_new_ring(N as u64, moduli.as_ptr(), moduli.len()) })
}

fn set_row(ring: u64, poly: u64, row: u64, values: &[u64]) {
    let status: Status = unsafe { lattice_poly_set_coeffs(ring, poly, row, values.as_ptr(), values.len()) };
    assert_eq!(status, Status::Ok);
}

fn get_row(poly: u64, row: u64) -> Vec<u64> {
    let mut out: Vec<u64> = vec![0; N];
    assert_eq!(ok_u64(unsafe { lattice_poly_get_coeffs(poly, row, out.as_mut_ptr(), out.len()) }), N as u64);
    out
}

fn last_error() -> String {
    let len: u64 = ok_u64(unsafe { lattice_last_error(std::ptr::null_mut(), 0) });
    let mut buf: Vec<u8> = vec![0; len as usize];
    ok_u64(unsafe { lattice_last_error(buf.as_mut_ptr(), buf.len()) });
    String::from_utf8(buf).unwrap()
}

fn small_params() -> u64 {
    let log_q: [u64; 3] = [30, 25, 25];
    let log_p: [u64; 1] = [30];
    ok(unsafe { lattice_new_params(4, log_q.as_ptr(), log_q.len(), log_p.as_ptr(), log_p.len(), 8, 0.0, 3, 25) })
}

#[test]
fn ring_add_end_to_end() {
    let ring: u64 = new_ring(&Q);
    let (p1, p2, p3) = (ok(lattice_new_poly(ring)), ok(lattice_new_poly(ring)), ok(lattice_new_poly(ring)));

    for (row, q) in Q.iter().enumerate() {
        let a: Vec<u64> = (0..N as u64).map(|j| q - 1 - j).collect();
        let b: Vec<u64> = (0..N as u64).map(|j| 3 * j + row as u64).collect();
        set_row(ring, p1, row as u64, &a);
        set_row(ring, p2, row as u64, &b);
    }
    assert_eq!(lattice_ring_add(ring, p1, p2, p3), Status::Ok);

    for (row, q) in Q.iter().enumerate() {
        let (a, b, c) = (get_row(p1, row as u64), get_row(p2, row as u64), get_row(p3, row as u64));
        for j in 0..N {
            assert_eq!(c[j], (a[j] + b[j]) % q);
        }
    }

    // Output aliasing an input.
    let before: Vec<u64> = get_row(p1, 0);
    assert_eq!(lattice_ring_add(ring, p1, p2, p1), Status::Ok);
    let b: Vec<u64> = get_row(p2, 0);
    let after: Vec<u64> = get_row(p1, 0);
    for j in 0..N {
        assert_eq!(after[j], (before[j] + b[j]) % Q[0]);
    }
    assert_eq!(lattice_ring_add(ring, p2, p2, p2), Status::Ok);
    assert_eq!(ok_u64(lattice_poly_equals(p2, p2)), 1);
    assert_eq!(ok_u64(lattice_poly_equals(p1, p3)), 0);
}

#[test]
fn invalid_handles_and_kinds() {
    assert_eq!(lattice_ring_add(0, 0, 0, 0), Status::InvalidHandle);
    assert_eq!(lattice_new_poly(0xdead_beef_0000_0001).status, Status::InvalidHandle);

    let ring: u64 = new_ring(&Q);
    let poly: u64 = ok(lattice_new_poly(ring));
    assert_eq!(ok_u64(lattice_handle_kind(poly)), ObjectKind::Poly as u64);

    // A polynomial is not a ring.
    let r: HandleResult = lattice_new_poly(poly);
    assert_eq!(r.status, Status::TypeMismatch);
    assert!(last_error().contains("Poly"));

    assert_eq!(lattice_release(poly), Status::Ok);
    assert_eq!(lattice_release(poly), Status::InvalidHandle);
    assert_eq!(lattice_poly_degree(poly).status, Status::InvalidHandle);
    assert_eq!(ok_u64(lattice_ring_n(ring)), N as u64);
}

#[test]
fn library_and_argument_errors() {
    let composite: [u64; 1] = [91];
    assert_eq!(unsafe { lattice_new_ring(N as u64, composite.as_ptr(), 1) }.status, Status::Library);
    assert_eq!(unsafe { lattice_new_ring(N as u64, std::ptr::null(), 3) }.status, Status::InvalidArgument);
    assert_eq!(unsafe { lattice_new_ring(12, Q.as_ptr(), Q.len()) }.status, Status::InvalidArgument);
    assert_eq!(unsafe { lattice_new_ring(1 << 63, Q.as_ptr(), 1) }.status, Status::InvalidArgument);
    assert_eq!(unsafe { lattice_new_ring(1 << 50, Q.as_ptr(), 1) }.status, Status::InvalidArgument);

    let ring: u64 = new_ring(&Q);
    let (a, b) = (ok(lattice_new_poly(ring)), ok(lattice_new_poly(ring)));
    assert_eq!(lattice_ntt_lvl(ring, 3, a, b), Status::InvalidArgument);
    assert_eq!(lattice_copy_poly_single_level(a, 5, b, 0), Status::InvalidArgument);
    assert_eq!(lattice_permute_ntt_index(ring, 4).status, Status::InvalidArgument);
}

#[test]
fn bootstrapping_selector_is_bounds_checked() {
    for sparse in [true, false] {
        for index in 0..4 {
            let btp: u64 = ok(lattice_get_bootstrapping_params(index, sparse));
            assert_eq!(ok_u64(lattice_ephemeral_secret_weight(btp)), 32);
            assert!(ok_u64(lattice_bootstrap_depth(btp)) >= 10);
        }
        assert_eq!(lattice_get_bootstrapping_params(4, sparse).status, Status::InvalidSelector);
        assert_eq!(lattice_params(u64::MAX, sparse).status, Status::InvalidSelector);
    }
}

#[test]
fn ntt_roundtrip_and_single_level_copy() {
    let ring: u64 = new_ring(&Q);
    let (a, b, c) = (ok(lattice_new_poly(ring)), ok(lattice_new_poly(ring)), ok(lattice_new_poly(ring)));
    let values: Vec<u64> = (1..=N as u64).collect();
    for row in 0..Q.len() as u64 {
        set_row(ring, a, row, &values);
    }
    assert_eq!(lattice_ntt_lvl(ring, 2, a, b), Status::Ok);
    assert_eq!(lattice_inv_ntt_lvl(ring, 2, b, b), Status::Ok);
    assert_eq!(ok_u64(lattice_poly_equals(a, b)), 1);

    assert_eq!(lattice_copy_poly_single_level(a, 1, c, 2), Status::Ok);
    assert_eq!(get_row(c, 2), values);
    assert_eq!(get_row(c, 0), vec![0; N]);

    assert_eq!(lattice_copy_lvl(1, a, c), Status::Ok);
    assert_eq!(get_row(c, 1), values);
}

#[test]
fn qp_halves_alias_their_parent() {
    let (ring_q, ring_p) = (new_ring(&Q), new_ring(&P));
    let ring_qp: u64 = ok(lattice_new_ring_qp(ring_q, ring_p));
    let pqp: u64 = ok(lattice_new_poly_qp(ring_qp));
    let q_half: u64 = ok(lattice_poly_q(pqp));
    let p_half: u64 = ok(lattice_poly_p(pqp));
    assert_eq!(ok_u64(lattice_poly_level(q_half)), 2);
    assert_eq!(ok_u64(lattice_poly_level(p_half)), 0);

    let values: Vec<u64> = vec![5; N];
    set_row(ring_p, p_half, 0, &values);
    let again: u64 = ok(lattice_poly_p(pqp));
    assert_eq!(get_row(again, 0), values);

    let copy: u64 = ok(lattice_new_poly_qp(ring_qp));
    assert_eq!(lattice_poly_copy_qp(copy, pqp), Status::Ok);
    assert_eq!(get_row(ok(lattice_poly_p(copy)), 0), values);

    let extender: u64 = ok(lattice_new_basis_extender(ring_q, ring_p));
    let small: Vec<u64> = (0..N as u64).collect();
    for row in 0..3 {
        set_row(ring_q, q_half, row, &small);
    }
    assert_eq!(lattice_mod_up_q_to_p(extender, 2, 0, q_half, p_half), Status::Ok);
    assert_eq!(get_row(p_half, 0), small);
}

#[test]
fn ciphertext_polys_alias_the_ciphertext() {
    let params: u64 = small_params();
    let ct: u64 = ok(lattice_new_ciphertext(params, 1, 2));
    assert_eq!(ok_u64(lattice_ciphertext_degree(ct)), 1);
    assert_eq!(ok_u64(lattice_level(ct)), 2);
    assert_eq!(lattice_ciphertext_scale(ct).value, (1u64 << 25) as f64);

    let ring_q: u64 = ok(lattice_params_ring_q(params));
    let c1: u64 = ok(lattice_poly(ct, 1));
    let values: Vec<u64> = (0..N as u64).map(|j| j * 7).collect();
    set_row(ring_q, c1, 0, &values);
    let c1_again: u64 = ok(lattice_poly(ct, 1));
    assert_eq!(get_row(c1_again, 0), values);
    assert_eq!(lattice_poly(ct, 2).status, Status::InvalidArgument);

    let copy: u64 = ok(lattice_copy_new(ct));
    set_row(ring_q, c1, 0, &vec![1; N]);
    assert_eq!(get_row(ok(lattice_poly(copy, 1)), 0), values);

    // Releasing the ciphertext keeps its polynomial alive.
    assert_eq!(lattice_release(ct), Status::Ok);
    assert_eq!(get_row(c1, 0), vec![1; N]);

    let meta: u64 = ok(lattice_get_ciphertext_metadata(copy));
    assert_eq!(lattice_set_ciphertext_metadata(copy, meta), Status::Ok);
    assert_eq!(lattice_print_meta_ct(copy), Status::Ok);
}

#[test]
fn copy_between_degrees_is_rejected() {
    let ring: u64 = new_ring(&Q);
    let wide: u64 = ok(unsafe { lattice_new_ring(2 * N as u64, Q.as_ptr(), 1) });
    let (target, src) = (ok(lattice_new_poly(ring)), ok(lattice_new_poly(wide)));
    let values: Vec<u64> = (1..=N as u64).collect();
    set_row(ring, target, 0, &values);

    assert_eq!(lattice_poly_copy(target, src), Status::InvalidArgument);
    assert_eq!(ok_u64(lattice_poly_degree(target)), N as u64);
    assert_eq!(ok_u64(lattice_poly_level(target)), 2);
    assert_eq!(get_row(target, 0), values);

    let ring_p: u64 = new_ring(&P);
    let wide_p: u64 = ok(unsafe { lattice_new_ring(2 * N as u64, P.as_ptr(), 1) });
    let ring_qp: u64 = ok(lattice_new_ring_qp(ring, ring_p));
    let wide_qp: u64 = ok(lattice_new_ring_qp(wide, wide_p));
    let (target_qp, src_qp) = (ok(lattice_new_poly_qp(ring_qp)), ok(lattice_new_poly_qp(wide_qp)));
    assert_eq!(lattice_poly_copy_qp(target_qp, src_qp), Status::InvalidArgument);
    assert_eq!(ok_u64(lattice_poly_degree(ok(lattice_poly_q(target_qp)))), N as u64);
    assert_eq!(lattice_poly_copy_qp(target_qp, ok(lattice_new_poly_qp(ring_qp))), Status::Ok);
}

#[test]
fn parameters_and_keys() {
    let params: u64 = small_params();
    assert_eq!(ok_u64(lattice_params_log_n(params)), 4);
    assert_eq!(ok_u64(lattice_params_log_slots(params)), 3);
    assert_eq!(ok_u64(lattice_params_max_level(params)), 2);
    assert_eq!(ok_u64(lattice_params_q_count(params)), 3);
    assert_eq!(ok_u64(lattice_params_p_count(params)), 1);
    assert_eq!(lattice_params_sigma(params).value, 3.2);
    let scale: u64 = ok(lattice_params_default_scale(params));
    assert_eq!(lattice_scale_value(scale).value, (1u64 << 25) as f64);
    assert_eq!(lattice_new_scale(-1.0).status, Status::InvalidArgument);

    let kgen: u64 = ok(lattice_new_key_generator(params));
    let sk: u64 = ok(lattice_gen_secret_key(kgen));
    let zero_sk: u64 = ok(lattice_new_secret_key(params));
    let ct_qp: u64 = ok(lattice_new_zero_ciphertext_qp(params, sk));
    assert_eq!(lattice_print_meta_ct_qp(ct_qp), Status::Ok);
    let copy: u64 = ok(lattice_copy_new_ciphertext_qp(ct_qp));
    assert_eq!(lattice_poly_qp_ciphertext_qp(copy, 2).status, Status::InvalidArgument);

    let meta: u64 = ok(lattice_get_ciphertext_qp_metadata(ct_qp));
    assert_eq!(lattice_set_ciphertext_qp_metadata(copy, meta), Status::Ok);

    let sk_qp: u64 = ok(lattice_secret_key_poly_qp(zero_sk));
    let zero_q: u64 = ok(lattice_poly_q(sk_qp));
    assert_eq!(get_row(zero_q, 1), vec![0; N]);

    let ring_q: u64 = ok(lattice_params_ring_q(params));
    let poly: u64 = ok(lattice_new_poly(ring_q));
    let pt: u64 = ok(lattice_new_plaintext(params, poly, 2));
    assert_eq!(lattice_print_meta_pt(pt), Status::Ok);
    assert_eq!(ok_u64(lattice_handle_kind(ok(lattice_get_plaintext_poly(pt)))), ObjectKind::Poly as u64);
    assert_eq!(lattice_new_plaintext(params, poly, 3).status, Status::InvalidArgument);
}

#[test]
fn collective_key_generation() {
    let params: u64 = small_params();
    let ckg: u64 = ok(lattice_new_ckg_protocol(params));
    let key: &[u8] = b"common reference";
    let prng: u64 = ok(unsafe { lattice_new_keyed_prng(key.as_ptr(), key.len()) });
    let crp: u64 = ok(lattice_ckg_sample_crp(ckg, prng));

    let round: u64 = ok(lattice_ckg_allocate_share(ckg));
    for _ in 0..3 {
        let kgen: u64 = ok(lattice_new_key_generator(params));
        let sk: u64 = ok(lattice_gen_secret_key(kgen));
        let share: u64 = ok(lattice_ckg_allocate_share(ckg));
        assert_eq!(lattice_ckg_gen_share(ckg, sk, crp, share), Status::Ok);
        assert_eq!(lattice_ckg_aggregate_shares(ckg, round, share, round), Status::Ok);
    }

    let pk: u64 = ok(lattice_new_public_key(params));
    assert_eq!(lattice_ckg_gen_public_key(ckg, round, crp, pk), Status::Ok);
    assert_eq!(lattice_ckg_gen_share(ckg, crp, crp, pk), Status::TypeMismatch);

    let rkg: u64 = ok(lattice_new_rkg_protocol(params));
    let rtg: u64 = ok(lattice_new_rot_kg_protocol(params));
    assert_eq!(ok_u64(lattice_protocol_beta(rkg)), 3);
    assert_eq!(ok_u64(lattice_protocol_beta(rtg)), 3);
    assert_eq!(lattice_protocol_beta(ckg).status, Status::TypeMismatch);
}

#[test]
fn keys_from_other_parameters_are_rejected() {
    let params: u64 = small_params();
    let log_q: [u64; 1] = [30];
    let log_p: [u64; 1] = [30];
    let short: u64 =
        ok(unsafe { lattice_new_params(4, log_q.as_ptr(), log_q.len(), log_p.as_ptr(), log_p.len(), 8, 0.0, 3, 25) });
    let short_sk: u64 = ok(lattice_gen_secret_key(ok(lattice_new_key_generator(short))));

    let ckg: u64 = ok(lattice_new_ckg_protocol(params));
    let key: &[u8] = b"common reference";
    let prng: u64 = ok(unsafe { lattice_new_keyed_prng(key.as_ptr(), key.len()) });
    let crp: u64 = ok(lattice_ckg_sample_crp(ckg, prng));
    let share: u64 = ok(lattice_ckg_allocate_share(ckg));
    assert_eq!(lattice_ckg_gen_share(ckg, short_sk, crp, share), Status::InvalidArgument);
    assert_eq!(lattice_new_zero_ciphertext_qp(params, short_sk).status, Status::InvalidArgument);

    let short_ckg: u64 = ok(lattice_new_ckg_protocol(short));
    let short_share: u64 = ok(lattice_ckg_allocate_share(short_ckg));
    assert_eq!(lattice_ckg_aggregate_shares(ckg, share, short_share, share), Status::InvalidArgument);
    let pk: u64 = ok(lattice_new_public_key(short));
    assert_eq!(lattice_ckg_gen_public_key(ckg, share, crp, pk), Status::InvalidArgument);

    let sk: u64 = ok(lattice_gen_secret_key(ok(lattice_new_key_generator(params))));
    assert_eq!(lattice_ckg_gen_share(ckg, sk, crp, share), Status::Ok);
}

#[test]
fn live_handle_count_tracks_release() {
    let ring: u64 = new_ring(&Q);
    let polys: Vec<u64> = (0..10).map(|_| ok(lattice_new_poly(ring))).collect();
    assert!(ok_u64(lattice_live_handles()) >= 11);
    for p in polys {
        assert_eq!(lattice_release(p), Status::Ok);
    }
    assert_eq!(lattice_release(ring), Status::Ok);
}
