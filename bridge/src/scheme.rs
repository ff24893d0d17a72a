//! Exports over CKKS parameters, ciphertexts, plaintexts and keys.

use crate::abi::{guard, slice, F64Result, HandleResult, Status, U64Result};
use crate::error::{to_usize, BridgeError};
use crate::registry::{get, insert, insert_arc};
use ckks::bootstrapping::{self, ParametersSet, DEFAULT_DENSE, DEFAULT_SPARSE};
use ckks::encryptor::Encryptor;
use ckks::keygen::KeyGenerator;
use ckks::keys::SecretKey;
use ckks::parameters::DEFAULT_SIGMA;
use ckks::{Ciphertext, CiphertextQP, MetaData, Parameters, ParametersLiteral, Plaintext, PolyCell, Scale};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

fn params(handle: u64) -> Result<Arc<Parameters>, BridgeError> {
    get::<Parameters>(handle)
}

fn ciphertext(handle: u64) -> Result<Arc<Ciphertext>, BridgeError> {
    get::<Ciphertext>(handle)
}

fn ciphertext_qp(handle: u64) -> Result<Arc<CiphertextQP>, BridgeError> {
    get::<CiphertextQP>(handle)
}

fn select(index: u64, sparse: bool) -> Result<&'static ParametersSet, BridgeError> {
    let len: usize = if sparse { DEFAULT_SPARSE.len() } else { DEFAULT_DENSE.len() };
    usize::try_from(index)
        .ok()
        .and_then(|index| bootstrapping::get(index, sparse))
        .ok_or(BridgeError::InvalidSelector { index, len })
}

/// Returns the named bootstrapping parameter set `index` of the sparse or
/// dense table.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_get_bootstrapping_params(index: u64, sparse: bool) -> HandleResult {
    guard("lattice_get_bootstrapping_params", || {
        let set: &ParametersSet = select(index, sparse)?;
        debug!(name = set.name, "bootstrapping parameters");
        Ok(insert(*set))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_ephemeral_secret_weight(btp: u64) -> U64Result {
    guard("lattice_ephemeral_secret_weight", || {
        Ok(get::<ParametersSet>(btp)?.bootstrapping.ephemeral_secret_weight as u64)
    })
}

/// Number of levels consumed by one bootstrapping.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_bootstrap_depth(btp: u64) -> U64Result {
    guard("lattice_bootstrap_depth", || Ok(get::<ParametersSet>(btp)?.bootstrapping.depth() as u64))
}

/// Returns the scheme parameters of the named set `index`.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_params(index: u64, sparse: bool) -> HandleResult {
    guard("lattice_params", || {
        let set: &ParametersSet = select(index, sparse)?;
        Ok(insert(Parameters::new(set.literal())?))
    })
}

/// Returns scheme parameters built from moduli bit sizes. A non-positive
/// `sigma` selects the default of 3.2.
///
/// # Safety
/// `log_q` and `log_p` must be valid for reads of `log_q_len` and
/// `log_p_len` values.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn lattice_new_params(
    log_n: u64,
    log_q: *const u64,
    log_q_len: usize,
    log_p: *const u64,
    log_p_len: usize,
    h: u64,
    sigma: f64,
    log_slots: u64,
    log_scale: u64,
) -> HandleResult {
    guard("lattice_new_params", || {
        // SAFETY: forwarded from the caller.
        let (log_q, log_p): (&[u64], &[u64]) =
            unsafe { (slice("log_q", log_q, log_q_len)?, slice("log_p", log_p, log_p_len)?) };
        let literal: ParametersLiteral = ParametersLiteral {
            log_n: to_usize("log_n", log_n)?,
            log_q: log_q.to_vec(),
            log_p: log_p.to_vec(),
            h: to_usize("h", h)?,
            sigma: if sigma > 0.0 { sigma } else { DEFAULT_SIGMA },
            log_slots: to_usize("log_slots", log_slots)?,
            log_scale: u32::try_from(log_scale)
                .map_err(|_| BridgeError::InvalidArgument(format!("log_scale={log_scale} overflows u32")))?,
        };
        Ok(insert(Parameters::new(literal)?))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_log_n(handle: u64) -> U64Result {
    guard("lattice_params_log_n", || Ok(params(handle)?.log_n() as u64))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_log_slots(handle: u64) -> U64Result {
    guard("lattice_params_log_slots", || Ok(params(handle)?.log_slots() as u64))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_max_level(handle: u64) -> U64Result {
    guard("lattice_params_max_level", || Ok(params(handle)?.max_level() as u64))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_q_count(handle: u64) -> U64Result {
    guard("lattice_params_q_count", || Ok(params(handle)?.q_count() as u64))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_p_count(handle: u64) -> U64Result {
    guard("lattice_params_p_count", || Ok(params(handle)?.p_count() as u64))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_log_qp(handle: u64) -> U64Result {
    guard("lattice_params_log_qp", || Ok(params(handle)?.log_qp()))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_sigma(handle: u64) -> F64Result {
    guard("lattice_params_sigma", || Ok(params(handle)?.sigma()))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_default_scale(handle: u64) -> HandleResult {
    guard("lattice_params_default_scale", || Ok(insert(params(handle)?.default_scale())))
}

/// Returns the ring over the Q moduli; the handle shares it with the parameters.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_ring_q(handle: u64) -> HandleResult {
    guard("lattice_params_ring_q", || Ok(insert_arc(params(handle)?.ring_q().clone())))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_params_ring_qp(handle: u64) -> HandleResult {
    guard("lattice_params_ring_qp", || Ok(insert(params(handle)?.ring_qp().clone())))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_level(ct: u64) -> U64Result {
    guard("lattice_level", || Ok(ciphertext(ct)?.level() as u64))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_ciphertext_scale(ct: u64) -> F64Result {
    guard("lattice_ciphertext_scale", || Ok(ciphertext(ct)?.scale().value()))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_ciphertext_degree(ct: u64) -> U64Result {
    guard("lattice_ciphertext_degree", || Ok(ciphertext(ct)?.degree() as u64))
}

/// Returns a deep copy of the ciphertext.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_copy_new(ct: u64) -> HandleResult {
    guard("lattice_copy_new", || Ok(insert(ciphertext(ct)?.copy_new())))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_copy_new_ciphertext_qp(ct: u64) -> HandleResult {
    guard("lattice_copy_new_ciphertext_qp", || Ok(insert(ciphertext_qp(ct)?.copy_new())))
}

/// Returns a zero ciphertext of the given degree and level, in the NTT
/// domain at the default scale.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_ciphertext(params_handle: u64, degree: u64, level: u64) -> HandleResult {
    guard("lattice_new_ciphertext", || {
        let params: Arc<Parameters> = params(params_handle)?;
        let ct: Ciphertext = Ciphertext::new(&params, to_usize("degree", degree)?, to_usize("level", level)?)?;
        Ok(insert(ct))
    })
}

/// Returns a fresh encryption of zero under sk over QP, in the NTT domain.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_zero_ciphertext_qp(params_handle: u64, sk: u64) -> HandleResult {
    guard("lattice_new_zero_ciphertext_qp", || {
        let params: Arc<Parameters> = params(params_handle)?;
        let sk: Arc<SecretKey> = get::<SecretKey>(sk)?;
        params.check_poly_qp(&[&sk.value])?;
        let ct: CiphertextQP = CiphertextQP::new(&params);
        Encryptor::new(&params, &sk).encrypt_zero_qp(&ct);
        Ok(insert(ct))
    })
}

/// Copies the metadata value into the ciphertext.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_set_ciphertext_metadata(ct: u64, meta: u64) -> Status {
    guard("lattice_set_ciphertext_metadata", || {
        let meta: MetaData = get::<RwLock<MetaData>>(meta)?.read().clone();
        ciphertext(ct)?.set_meta(&meta);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_set_ciphertext_qp_metadata(ct: u64, meta: u64) -> Status {
    guard("lattice_set_ciphertext_qp_metadata", || {
        let meta: MetaData = get::<RwLock<MetaData>>(meta)?.read().clone();
        ciphertext_qp(ct)?.set_meta(&meta);
        Ok(())
    })
}

/// Returns a handle to the ciphertext's metadata; it aliases the ciphertext.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_get_ciphertext_metadata(ct: u64) -> HandleResult {
    guard("lattice_get_ciphertext_metadata", || Ok(insert_arc(ciphertext(ct)?.meta.clone())))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_get_ciphertext_qp_metadata(ct: u64) -> HandleResult {
    guard("lattice_get_ciphertext_qp_metadata", || Ok(insert_arc(ciphertext_qp(ct)?.meta.clone())))
}

/// Returns a handle to the polynomial `index` of the ciphertext, which
/// aliases the ciphertext.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly(ct: u64, index: u64) -> HandleResult {
    guard("lattice_poly", || {
        Ok(insert_arc(ciphertext(ct)?.poly(to_usize("index", index)?)?))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_poly_qp_ciphertext_qp(ct: u64, index: u64) -> HandleResult {
    guard("lattice_poly_qp_ciphertext_qp", || {
        Ok(insert(ciphertext_qp(ct)?.poly_qp(to_usize("index", index)?)?))
    })
}

fn print_meta(what: &'static str, meta: &MetaData) {
    info!(
        object = what,
        scale = %meta.scale,
        is_ntt = meta.is_ntt,
        is_montgomery = meta.is_montgomery,
        "metadata"
    );
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_print_meta_ct(ct: u64) -> Status {
    guard("lattice_print_meta_ct", || {
        print_meta("ciphertext", &ciphertext(ct)?.meta.read());
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_print_meta_ct_qp(ct: u64) -> Status {
    guard("lattice_print_meta_ct_qp", || {
        print_meta("ciphertext qp", &ciphertext_qp(ct)?.meta.read());
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_print_meta_pt(pt: u64) -> Status {
    guard("lattice_print_meta_pt", || {
        print_meta("plaintext", &get::<Plaintext>(pt)?.meta.read());
        Ok(())
    })
}

/// Wraps a polynomial as a plaintext at `level`. The plaintext shares the
/// polynomial with its handle.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_plaintext(params_handle: u64, poly: u64, level: u64) -> HandleResult {
    guard("lattice_new_plaintext", || {
        let params: Arc<Parameters> = params(params_handle)?;
        let poly: Arc<PolyCell> = get::<PolyCell>(poly)?;
        Ok(insert(Plaintext::new(&params, poly, to_usize("level", level)?)?))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_get_plaintext_poly(pt: u64) -> HandleResult {
    guard("lattice_get_plaintext_poly", || Ok(insert_arc(get::<Plaintext>(pt)?.value.clone())))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_scale(value: f64) -> HandleResult {
    guard("lattice_new_scale", || {
        if !(value.is_finite() && value > 0.0) {
            return Err(BridgeError::InvalidArgument(format!("scale={value} is not a positive number")));
        }
        Ok(insert(Scale::new(value)))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_scale_value(scale: u64) -> F64Result {
    guard("lattice_scale_value", || Ok(get::<Scale>(scale)?.value()))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_key_generator(params_handle: u64) -> HandleResult {
    guard("lattice_new_key_generator", || {
        Ok(insert(KeyGenerator::new(&params(params_handle)?)))
    })
}

/// Samples a ternary secret key with the Hamming weight of the parameters.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_gen_secret_key(kgen: u64) -> HandleResult {
    guard("lattice_gen_secret_key", || {
        Ok(insert(get::<KeyGenerator>(kgen)?.gen_secret_key()))
    })
}

/// Returns the zero secret key.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_secret_key(params_handle: u64) -> HandleResult {
    guard("lattice_new_secret_key", || Ok(insert(SecretKey::new(&params(params_handle)?))))
}

/// Returns a handle to the key's QP polynomial, which aliases the key.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_secret_key_poly_qp(sk: u64) -> HandleResult {
    guard("lattice_secret_key_poly_qp", || Ok(insert(get::<SecretKey>(sk)?.value.clone())))
}
