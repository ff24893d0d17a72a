//! Exports over rings, RNS polynomials and polynomials in the extended basis QP.
//!
//! An export locks its inputs for reading before it locks its output for
//! writing. Two threads that run exports over the same polynomials with
//! their input and output roles crossed can deadlock.

use crate::abi::{guard, slice, slice_mut, HandleResult, Status, U64Result};
use crate::error::{to_usize, BridgeError};
use crate::operands;
use crate::registry::{get, insert, insert_arc, PermutationIndex};
use ckks::poly::{copy_shared, equals_shared, shared};
use ckks::{PolyCell, PolyQP, SharedPoly};
use math::poly::PolyRNS;
use math::ring::impl_u64::basis_extension::BasisExtender;
use math::ring::{RingQP, RingRNS};
use math::sampler::UniformSampler;
use sampling::prng::Prng;
use std::sync::Arc;
use tracing::debug;

type LevelOp = fn(&RingRNS<u64>, usize, &PolyRNS<u64>, &mut PolyRNS<u64>);

fn ring(handle: u64) -> Result<Arc<RingRNS<u64>>, BridgeError> {
    get::<RingRNS<u64>>(handle)
}

fn ring_qp(handle: u64) -> Result<Arc<RingQP>, BridgeError> {
    get::<RingQP>(handle)
}

fn poly(handle: u64) -> Result<Arc<PolyCell>, BridgeError> {
    get::<PolyCell>(handle)
}

fn poly_qp(handle: u64) -> Result<Arc<PolyQP>, BridgeError> {
    get::<PolyQP>(handle)
}

fn check_level(ring: &RingRNS<u64>, level: usize, polys: &[&SharedPoly]) -> Result<(), BridgeError> {
    let guards: Vec<_> = polys.iter().map(|p| p.read_recursive()).collect();
    let polys: Vec<&PolyRNS<u64>> = guards.iter().map(|g| &**g).collect();
    ring.check_level(level, &polys)?;
    Ok(())
}

fn check_level_qp(ring: &RingQP, level_q: usize, level_p: usize, polys: &[&PolyQP]) -> Result<(), BridgeError> {
    let q: Vec<&SharedPoly> = polys.iter().map(|p| &p.q).collect();
    let p: Vec<&SharedPoly> = polys.iter().map(|p| &p.p).collect();
    check_level(&ring.ring_q, level_q, &q)?;
    check_level(&ring.ring_p, level_p, &p)
}

/// Rejects two polynomials of different ring degrees.
fn check_degree(a: &SharedPoly, b: &SharedPoly) -> Result<(), BridgeError> {
    let (n_a, n_b) = (a.read_recursive().n(), b.read_recursive().n());
    if n_a != n_b {
        return Err(BridgeError::InvalidArgument(format!("degree mismatch: {n_a} != {n_b}")));
    }
    Ok(())
}

/// Applies op from input to output at level, once the level is checked.
fn apply_lvl(
    ring: &RingRNS<u64>,
    level: usize,
    input: &SharedPoly,
    output: &SharedPoly,
    op: LevelOp,
) -> Result<(), BridgeError> {
    check_level(ring, level, &[input, output])?;
    operands::unary(input, output, |a, b| op(ring, level, a, b));
    Ok(())
}

fn apply_lvl_qp(
    ring: &RingQP,
    level_q: usize,
    level_p: usize,
    input: &PolyQP,
    output: &PolyQP,
    op: LevelOp,
) -> Result<(), BridgeError> {
    check_level_qp(ring, level_q, level_p, &[input, output])?;
    operands::unary(&input.q, &output.q, |a, b| op(&ring.ring_q, level_q, a, b));
    operands::unary(&input.p, &output.p, |a, b| op(&ring.ring_p, level_p, a, b));
    Ok(())
}

fn ring_lvl_export(name: &'static str, ring_handle: u64, level: u64, input: u64, output: u64, op: LevelOp) -> Status {
    guard(name, || {
        let ring: Arc<RingRNS<u64>> = ring(ring_handle)?;
        apply_lvl(&ring, to_usize("level", level)?, &poly(input)?, &poly(output)?, op)
    })
}

fn ring_qp_lvl_export(
    name: &'static str,
    ring_handle: u64,
    level_q: u64,
    level_p: u64,
    input: u64,
    output: u64,
    op: LevelOp,
) -> Status {
    guard(name, || {
        let ring: Arc<RingQP> = ring_qp(ring_handle)?;
        apply_lvl_qp(
            &ring,
            to_usize("level_q", level_q)?,
            to_usize("level_p", level_p)?,
            &poly_qp(input)?,
            &poly_qp(output)?,
            op,
        )
    })
}

/// Builds the RNS ring Z[X]/(X^n + 1) over the given moduli. Every modulus
/// must be a prime congruent to 1 modulo 2n.
///
/// # Safety
/// `moduli` must be valid for reads of `len` values.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lattice_new_ring(n: u64, moduli: *const u64, len: usize) -> HandleResult {
    guard("lattice_new_ring", || {
        // SAFETY: forwarded from the caller.
        let moduli: &[u64] = unsafe { slice("moduli", moduli, len)? };
        let ring: RingRNS<u64> = RingRNS::new(to_usize("n", n)?, moduli)?;
        debug!(n, moduli = len, "new ring");
        Ok(insert(ring))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_ring_qp(ring_q: u64, ring_p: u64) -> HandleResult {
    guard("lattice_new_ring_qp", || {
        let ring: RingQP = RingQP::new(ring(ring_q)?, ring(ring_p)?)?;
        debug!(n = ring.n(), level_q = ring.level_q(), level_p = ring.level_p(), "new ring qp");
        Ok(insert(ring))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_ring_n(ring_handle: u64) -> U64Result {
    guard("lattice_ring_n", || Ok(ring(ring_handle)?.n() as u64))
}

/// Returns a zero polynomial over every modulus of the ring.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_poly(ring_handle: u64) -> HandleResult {
    guard("lattice_new_poly", || Ok(insert_arc(shared(ring(ring_handle)?.new_polyrns()))))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_poly_qp(ring_handle: u64) -> HandleResult {
    guard("lattice_new_poly_qp", || Ok(insert(PolyQP::new(&ring_qp(ring_handle)?))))
}

/// p3 = p1 + p2 at the smallest level of the ring and the three operands.
/// Concurrent calls that swap p1 and p3 can deadlock.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_ring_add(ring_handle: u64, p1: u64, p2: u64, p3: u64) -> Status {
    guard("lattice_ring_add", || {
        let ring: Arc<RingRNS<u64>> = ring(ring_handle)?;
        let (p1, p2, p3) = (poly(p1)?, poly(p2)?, poly(p3)?);
        check_level(&ring, 0, &[&p1, &p2, &p3])?;
        operands::binary(&p1, &p2, &p3, |a, b, c| ring.add(a, b, c));
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_ring_add_lvl_qp(
    ring_handle: u64,
    level_q: u64,
    level_p: u64,
    p1: u64,
    p2: u64,
    p3: u64,
) -> Status {
    guard("lattice_ring_add_lvl_qp", || {
        let ring: Arc<RingQP> = ring_qp(ring_handle)?;
        let (level_q, level_p) = (to_usize("level_q", level_q)?, to_usize("level_p", level_p)?);
        let (p1, p2, p3) = (poly_qp(p1)?, poly_qp(p2)?, poly_qp(p3)?);
        check_level_qp(&ring, level_q, level_p, &[&p1, &p2, &p3])?;
        operands::binary(&p1.q, &p2.q, &p3.q, |a, b, c| ring.ring_q.add_lvl(level_q, a, b, c));
        operands::binary(&p1.p, &p2.p, &p3.p, |a, b, c| ring.ring_p.add_lvl(level_p, a, b, c));
        Ok(())
    })
}

/// Copies src into target up to the smaller of their levels. Both must
/// have the same ring degree.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly_copy(target: u64, src: u64) -> Status {
    guard("lattice_poly_copy", || {
        let (target, src) = (poly(target)?, poly(src)?);
        check_degree(&target, &src)?;
        copy_shared(&target, &src);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly_copy_qp(target: u64, src: u64) -> Status {
    guard("lattice_poly_copy_qp", || {
        let (target, src) = (poly_qp(target)?, poly_qp(src)?);
        check_degree(&target.q, &src.q)?;
        check_degree(&target.p, &src.p)?;
        target.copy_from(&src);
        Ok(())
    })
}

/// Copies the rows 0..=level of src into target.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_copy_lvl(level: u64, src: u64, target: u64) -> Status {
    guard("lattice_copy_lvl", || {
        let level: usize = to_usize("level", level)?;
        let (src, target) = (poly(src)?, poly(target)?);
        operands::unary(&src, &target, |a, b| {
            let max: usize = a.level().min(b.level());
            if level > max || a.n() != b.n() {
                return Err(BridgeError::InvalidArgument(format!(
                    "cannot copy level={level} between polynomials of levels {} and {}",
                    a.level(),
                    b.level()
                )));
            }
            b.copy_level(level, a);
            Ok(())
        })
    })
}

/// Copies the row src_index of src to the row target_index of target.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_copy_poly_single_level(src: u64, src_index: u64, target: u64, target_index: u64) -> Status {
    guard("lattice_copy_poly_single_level", || {
        let (src_index, target_index) = (to_usize("src_index", src_index)?, to_usize("target_index", target_index)?);
        let (src, target) = (poly(src)?, poly(target)?);
        operands::unary(&src, &target, |a, b| {
            if src_index > a.level() || target_index > b.level() || a.n() != b.n() {
                return Err(BridgeError::InvalidArgument(format!(
                    "cannot copy row {src_index} (level {}) to row {target_index} (level {})",
                    a.level(),
                    b.level()
                )));
            }
            b.copy_row(target_index, a, src_index);
            Ok(())
        })
    })
}

/// Returns the ring degree n of the polynomial.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly_degree(poly_handle: u64) -> U64Result {
    guard("lattice_poly_degree", || Ok(poly(poly_handle)?.read().n() as u64))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly_level(poly_handle: u64) -> U64Result {
    guard("lattice_poly_level", || Ok(poly(poly_handle)?.read().level() as u64))
}

/// Writes `values`, reduced modulo the row's modulus, to the row `row`.
///
/// # Safety
/// `values` must be valid for reads of `len` values.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lattice_poly_set_coeffs(
    ring_handle: u64,
    poly_handle: u64,
    row: u64,
    values: *const u64,
    len: usize,
) -> Status {
    guard("lattice_poly_set_coeffs", || {
        // SAFETY: forwarded from the caller.
        let values: &[u64] = unsafe { slice("values", values, len)? };
        let ring: Arc<RingRNS<u64>> = ring(ring_handle)?;
        let poly: Arc<PolyCell> = poly(poly_handle)?;
        let row: usize = to_usize("row", row)?;
        check_level(&ring, row, &[&poly])?;
        if len != ring.n() {
            return Err(BridgeError::InvalidArgument(format!("len={len} != n={}", ring.n())));
        }
        ring.set_coeffs(row, values, &mut poly.write());
        Ok(())
    })
}

/// Copies the row `row` into `out` and returns n.
///
/// # Safety
/// `out` must be valid for writes of `len` values.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lattice_poly_get_coeffs(poly_handle: u64, row: u64, out: *mut u64, len: usize) -> U64Result {
    guard("lattice_poly_get_coeffs", || {
        // SAFETY: forwarded from the caller.
        let out: &mut [u64] = unsafe { slice_mut("out", out, len)? };
        let cell: Arc<PolyCell> = poly(poly_handle)?;
        let poly = cell.read();
        let row: usize = to_usize("row", row)?;
        if row > poly.level() {
            return Err(BridgeError::InvalidArgument(format!("row={row} > level={}", poly.level())));
        }
        if len < poly.n() {
            return Err(BridgeError::InvalidArgument(format!("len={len} < n={}", poly.n())));
        }
        out[..poly.n()].copy_from_slice(&poly.at(row).0);
        Ok(poly.n() as u64)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_uniform_sampler(prng: u64, ring_handle: u64) -> HandleResult {
    guard("lattice_new_uniform_sampler", || {
        Ok(insert(UniformSampler::new(get::<Prng>(prng)?, ring(ring_handle)?)))
    })
}

/// Returns a new polynomial with coefficients uniform modulo each q_i.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_read_new_from_sampler(sampler: u64) -> HandleResult {
    guard("lattice_read_new_from_sampler", || {
        Ok(insert_arc(shared(get::<UniformSampler>(sampler)?.read_new())))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_basis_extender(ring_q: u64, ring_p: u64) -> HandleResult {
    guard("lattice_new_basis_extender", || {
        let extender: BasisExtender = BasisExtender::new(ring(ring_q)?, ring(ring_p)?)?;
        debug!("new basis extender");
        Ok(insert(extender))
    })
}

/// Extends pol_q, read at level_q, to the moduli 0..=level_p of P.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_mod_up_q_to_p(extender: u64, level_q: u64, level_p: u64, pol_q: u64, pol_p: u64) -> Status {
    guard("lattice_mod_up_q_to_p", || {
        let extender: Arc<BasisExtender> = get::<BasisExtender>(extender)?;
        let (level_q, level_p) = (to_usize("level_q", level_q)?, to_usize("level_p", level_p)?);
        let (pol_q, pol_p) = (poly(pol_q)?, poly(pol_p)?);
        operands::unary(&pol_q, &pol_p, |a, b| extender.mod_up_q_to_p(level_q, level_p, a, b))?;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_ntt_lvl(ring: u64, level: u64, input: u64, output: u64) -> Status {
    ring_lvl_export("lattice_ntt_lvl", ring, level, input, output, RingRNS::<u64>::ntt_lvl)
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_inv_ntt_lvl(ring: u64, level: u64, input: u64, output: u64) -> Status {
    ring_lvl_export("lattice_inv_ntt_lvl", ring, level, input, output, RingRNS::<u64>::intt_lvl)
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_ntt_lvl_qp(ring: u64, level_q: u64, level_p: u64, input: u64, output: u64) -> Status {
    ring_qp_lvl_export("lattice_ntt_lvl_qp", ring, level_q, level_p, input, output, RingRNS::<u64>::ntt_lvl)
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_inv_ntt_lvl_qp(ring: u64, level_q: u64, level_p: u64, input: u64, output: u64) -> Status {
    ring_qp_lvl_export("lattice_inv_ntt_lvl_qp", ring, level_q, level_p, input, output, RingRNS::<u64>::intt_lvl)
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_mform_lvl(ring: u64, level: u64, input: u64, output: u64) -> Status {
    ring_lvl_export("lattice_mform_lvl", ring, level, input, output, RingRNS::<u64>::mform_lvl)
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_inv_mform_lvl(ring: u64, level: u64, input: u64, output: u64) -> Status {
    ring_lvl_export("lattice_inv_mform_lvl", ring, level, input, output, RingRNS::<u64>::inv_mform_lvl)
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_mform_lvl_qp(ring: u64, level_q: u64, level_p: u64, input: u64, output: u64) -> Status {
    ring_qp_lvl_export("lattice_mform_lvl_qp", ring, level_q, level_p, input, output, RingRNS::<u64>::mform_lvl)
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_inv_mform_lvl_qp(ring: u64, level_q: u64, level_p: u64, input: u64, output: u64) -> Status {
    ring_qp_lvl_export("lattice_inv_mform_lvl_qp", ring, level_q, level_p, input, output, RingRNS::<u64>::inv_mform_lvl)
}

/// Returns a handle to the Q half of a QP polynomial; it aliases the parent.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly_q(poly_qp_handle: u64) -> HandleResult {
    guard("lattice_poly_q", || Ok(insert_arc(poly_qp(poly_qp_handle)?.q.clone())))
}

/// Returns a handle to the P half of a QP polynomial; it aliases the parent.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly_p(poly_qp_handle: u64) -> HandleResult {
    guard("lattice_poly_p", || Ok(insert_arc(poly_qp(poly_qp_handle)?.p.clone())))
}

/// Returns the NTT-domain index table of the automorphism X -> X^gal_el.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_permute_ntt_index(ring_handle: u64, gal_el: u64) -> HandleResult {
    guard("lattice_permute_ntt_index", || {
        let ring: Arc<RingRNS<u64>> = ring(ring_handle)?;
        if gal_el & 1 == 0 {
            return Err(BridgeError::InvalidArgument(format!("gal_el={gal_el} is even")));
        }
        Ok(insert(PermutationIndex(ring.permute_ntt_index(gal_el))))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_permute_ntt_with_index_lvl(
    ring_handle: u64,
    level: u64,
    input: u64,
    index: u64,
    output: u64,
) -> Status {
    guard("lattice_permute_ntt_with_index_lvl", || {
        let ring: Arc<RingRNS<u64>> = ring(ring_handle)?;
        let level: usize = to_usize("level", level)?;
        let index: Arc<PermutationIndex> = get::<PermutationIndex>(index)?;
        if index.0.len() != ring.n() {
            return Err(BridgeError::InvalidArgument(format!(
                "index of size {} for n={}",
                index.0.len(),
                ring.n()
            )));
        }
        let (input, output) = (poly(input)?, poly(output)?);
        check_level(&ring, level, &[&input, &output])?;
        operands::unary(&input, &output, |a, b| ring.permute_ntt_with_index_lvl(level, a, &index.0, b));
        Ok(())
    })
}

/// c += a * b, with a in Montgomery form and all operands in the NTT domain.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_mul_coeffs_montgomery_and_add_lvl(ring_handle: u64, level: u64, a: u64, b: u64, c: u64) -> Status {
    guard("lattice_mul_coeffs_montgomery_and_add_lvl", || {
        let ring: Arc<RingRNS<u64>> = ring(ring_handle)?;
        let level: usize = to_usize("level", level)?;
        let (a, b, c) = (poly(a)?, poly(b)?, poly(c)?);
        check_level(&ring, level, &[&a, &b, &c])?;
        operands::binary(&a, &b, &c, |a, b, c| ring.mul_coeffs_montgomery_and_add_lvl(level, a, b, c));
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_mul_coeffs_montgomery_and_add_lvl_qp(
    ring_handle: u64,
    level_q: u64,
    level_p: u64,
    a: u64,
    b: u64,
    c: u64,
) -> Status {
    guard("lattice_mul_coeffs_montgomery_and_add_lvl_qp", || {
        let ring: Arc<RingQP> = ring_qp(ring_handle)?;
        let (level_q, level_p) = (to_usize("level_q", level_q)?, to_usize("level_p", level_p)?);
        let (a, b, c) = (poly_qp(a)?, poly_qp(b)?, poly_qp(c)?);
        check_level_qp(&ring, level_q, level_p, &[&a, &b, &c])?;
        operands::binary(&a.q, &b.q, &c.q, |a, b, c| {
            ring.ring_q.mul_coeffs_montgomery_and_add_lvl(level_q, a, b, c)
        });
        operands::binary(&a.p, &b.p, &c.p, |a, b, c| {
            ring.ring_p.mul_coeffs_montgomery_and_add_lvl(level_p, a, b, c)
        });
        Ok(())
    })
}

/// Bit length of the sum of the coefficients, reconstructed modulo
/// q_0 * ... * q_level.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_log2_of_inner_sum(ring_handle: u64, level: u64, poly_handle: u64) -> U64Result {
    guard("lattice_log2_of_inner_sum", || {
        let ring: Arc<RingRNS<u64>> = ring(ring_handle)?;
        let level: usize = to_usize("level", level)?;
        let poly: Arc<PolyCell> = poly(poly_handle)?;
        check_level(&ring, level, &[&poly])?;
        Ok(ring.log2_of_inner_sum(level, &poly.read()))
    })
}

/// Returns 1 when both polynomials hold the same level and coefficients.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly_equals(a: u64, b: u64) -> U64Result {
    guard("lattice_poly_equals", || Ok(equals_shared(&poly(a)?, &poly(b)?) as u64))
}
