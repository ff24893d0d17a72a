//! C ABI over the lattice library.
//!
//! Every exported function takes opaque 64-bit handles and primitive values,
//! resolves the handles through a process-wide [registry::REGISTRY], performs
//! one library call and returns a `#[repr(C)]` record carrying a [Status].
//! Objects produced by a call are registered and handed back as new handles;
//! a handle stays valid until [lifecycle::lattice_release] is called on it.
//!
//! Handles to sub-objects (the polynomials of a ciphertext, the halves of a
//! QP polynomial, a ciphertext's metadata) alias their parent: writes through
//! one are visible through the other.

pub mod abi;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod multiparty;
pub mod prng;
pub mod registry;
pub mod ring;
pub mod scheme;

mod operands;

pub use abi::{F64Result, HandleResult, Status, U64Result};
pub use error::BridgeError;
pub use registry::{ObjectKind, REGISTRY};
