//! Handle bookkeeping exported to native callers.

use crate::abi::{guard, with_last_error, Status, U64Result};
use crate::registry::{ObjectKind, REGISTRY};
use handles::{Handle, Kind};
use std::ptr;
use tracing::info;

/// Version of the exported ABI. Bumped on any incompatible change.
pub const API_VERSION: u32 = 1;

#[unsafe(no_mangle)]
pub extern "C" fn lattice_api_version() -> u32 {
    API_VERSION
}

/// Drops the registry's reference to the object named by `handle`. The object
/// itself lives on while other handles or parents still reach it.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_release(handle: u64) -> Status {
    guard("lattice_release", || {
        REGISTRY.release(Handle::from_raw(handle))?;
        Ok(())
    })
}

/// Returns the [ObjectKind] discriminant of a live handle.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_handle_kind(handle: u64) -> U64Result {
    guard("lattice_handle_kind", || {
        let kind: ObjectKind = REGISTRY.kind(Handle::from_raw(handle))?;
        Ok(kind as u32 as u64)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_live_handles() -> U64Result {
    guard("lattice_live_handles", || Ok(REGISTRY.len() as u64))
}

/// Logs the number of live handles per kind at info level.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_log_census() -> Status {
    guard("lattice_log_census", || {
        let mut census: Vec<(ObjectKind, usize)> = REGISTRY.census().iter().map(|(k, v)| (*k, *v)).collect();
        census.sort_by_key(|(kind, _)| *kind as u32);
        for (kind, count) in census {
            info!(kind = kind.name(), count, "live handles");
        }
        Ok(())
    })
}

/// Copies the message of the calling thread's most recent failure into
/// `buf`, truncated to `len` bytes, and returns the full message length.
/// Passing a null `buf` with `len == 0` only queries the length.
///
/// # Safety
/// `buf` must be null or valid for writes of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lattice_last_error(buf: *mut u8, len: usize) -> U64Result {
    if buf.is_null() && len != 0 {
        return U64Result {
            status: Status::InvalidArgument,
            value: 0,
        };
    }
    // Not routed through the guard, which would overwrite the message.
    with_last_error(|message| {
        let n: usize = message.len().min(len);
        if n > 0 {
            // SAFETY: buf is valid for len >= n bytes and cannot overlap the
            // thread-local message.
            unsafe { ptr::copy_nonoverlapping(message.as_ptr(), buf, n) };
        }
        U64Result {
            status: Status::Ok,
            value: message.len() as u64,
        }
    })
}
