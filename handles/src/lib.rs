//! Process-wide tables from opaque 64-bit handles to shared objects.
//!
//! A [Registry] hands out a [Handle] for every inserted object and keeps a
//! strong reference to it until the handle is released. Handles carry a
//! generation, so a released handle never resolves to a later occupant of
//! the same slot, and every entry is tagged with a [Kind] checked on lookup.

pub mod config;
pub mod error;
pub mod handle;
pub mod kind;
pub mod registry;

pub use config::RegistryConfig;
pub use error::HandleError;
pub use handle::Handle;
pub use kind::{Kind, Object};
pub use registry::Registry;
