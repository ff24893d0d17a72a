use thiserror::Error;

use crate::handle::Handle;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    /// The handle was never issued, was released, or carries a stale generation.
    #[error("invalid handle {0}")]
    InvalidHandle(Handle),
    /// The handle is live but names an object of another kind.
    #[error("type mismatch for handle {handle}: expected {expected}, found {found}")]
    TypeMismatch {
        handle: Handle,
        expected: &'static str,
        found: &'static str,
    },
}
