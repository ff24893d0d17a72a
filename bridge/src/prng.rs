use crate::abi::{guard, slice, HandleResult};
use crate::registry::insert;
use sampling::prng::Prng;
use tracing::debug;

/// Returns a PRNG seeded from the operating system.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_prng() -> HandleResult {
    guard("lattice_new_prng", || {
        debug!("new prng");
        Ok(insert(Prng::new()))
    })
}

/// Returns a PRNG whose stream is determined by `key`; parties using the
/// same key draw the same values.
///
/// # Safety
/// `key` must be null with `len == 0`, or valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lattice_new_keyed_prng(key: *const u8, len: usize) -> HandleResult {
    guard("lattice_new_keyed_prng", || {
        // SAFETY: forwarded from the caller.
        let key: &[u8] = unsafe { slice("key", key, len)? };
        debug!(key_len = len, "new keyed prng");
        Ok(insert(Prng::keyed(key)))
    })
}
