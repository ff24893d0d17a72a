use crate::error::BridgeError;
use handles::Handle;
use std::any::Any;
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Outcome of a bridge call. The discriminants are part of the ABI.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Ok = 0,
    InvalidHandle = 1,
    TypeMismatch = 2,
    InvalidSelector = 3,
    InvalidArgument = 4,
    Library = 5,
    Panic = 6,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandleResult {
    pub status: Status,
    pub handle: u64,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct U64Result {
    pub status: Status,
    pub value: u64,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct F64Result {
    pub status: Status,
    pub value: f64,
}

/// A record returned across the ABI, built from a success value or a
/// failure status.
pub trait Record {
    type Value;

    fn ok(value: Self::Value) -> Self;
    fn err(status: Status) -> Self;
}

impl Record for Status {
    type Value = ();

    fn ok(_: ()) -> Self {
        Status::Ok
    }

    fn err(status: Status) -> Self {
        status
    }
}

impl Record for HandleResult {
    type Value = Handle;

    fn ok(handle: Handle) -> Self {
        Self {
            status: Status::Ok,
            handle: handle.raw(),
        }
    }

    fn err(status: Status) -> Self {
        Self {
            status,
            handle: Handle::NULL.raw(),
        }
    }
}

impl Record for U64Result {
    type Value = u64;

    fn ok(value: u64) -> Self {
        Self {
            status: Status::Ok,
            value,
        }
    }

    fn err(status: Status) -> Self {
        Self { status, value: 0 }
    }
}

impl Record for F64Result {
    type Value = f64;

    fn ok(value: f64) -> Self {
        Self {
            status: Status::Ok,
            value,
        }
    }

    fn err(status: Status) -> Self {
        Self { status, value: 0.0 }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn set_last_error(message: String) {
    LAST_ERROR.with(|last| *last.borrow_mut() = message);
}

pub(crate) fn with_last_error<R>(f: impl FnOnce(&str) -> R) -> R {
    LAST_ERROR.with(|last| f(&last.borrow()))
}

/// Borrows a caller buffer. A null pointer is accepted only with `len == 0`.
///
/// # Safety
/// A non-null `ptr` must be valid for reads of `len` elements for `'a`.
pub(crate) unsafe fn slice<'a, T>(name: &str, ptr: *const T, len: usize) -> Result<&'a [T], BridgeError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(BridgeError::InvalidArgument(format!("{name} is null with len={len}")));
    }
    // SAFETY: non-null and valid for len reads per the caller's contract.
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Mutable counterpart of [slice].
///
/// # Safety
/// A non-null `ptr` must be valid for writes of `len` elements for `'a`.
pub(crate) unsafe fn slice_mut<'a, T>(name: &str, ptr: *mut T, len: usize) -> Result<&'a mut [T], BridgeError> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(BridgeError::InvalidArgument(format!("{name} is null with len={len}")));
    }
    // SAFETY: non-null and valid for len writes per the caller's contract.
    Ok(unsafe { std::slice::from_raw_parts_mut(ptr, len) })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Runs the body of the exported function `name`. Errors and panics are
/// logged, stored as the thread's last error and turned into a status.
pub(crate) fn guard<R: Record>(name: &'static str, f: impl FnOnce() -> Result<R::Value, BridgeError>) -> R {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => R::ok(value),
        Ok(Err(err)) => {
            let status: Status = err.status();
            warn!(function = name, ?status, %err, "bridge call failed");
            set_last_error(format!("{name}: {err}"));
            R::err(status)
        }
        Err(payload) => {
            let message: &str = panic_message(&*payload);
            warn!(function = name, panic = message, "bridge call panicked");
            set_last_error(format!("{name}: panic: {message}"));
            R::err(Status::Panic)
        }
    }
}
