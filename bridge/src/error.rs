use crate::abi::Status;
use handles::HandleError;
use math::RingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Handle(#[from] HandleError),
    #[error(transparent)]
    Ring(#[from] RingError),
    #[error(transparent)]
    Ckks(#[from] ckks::Error),
    #[error("invalid selector: index={index} >= table size={len}")]
    InvalidSelector { index: u64, len: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl BridgeError {
    pub fn status(&self) -> Status {
        match self {
            BridgeError::Handle(HandleError::InvalidHandle(_)) => Status::InvalidHandle,
            BridgeError::Handle(HandleError::TypeMismatch { .. }) => Status::TypeMismatch,
            BridgeError::Ring(err) => ring_status(err),
            BridgeError::Ckks(err) => match err {
                ckks::Error::Ring(err) => ring_status(err),
                ckks::Error::InvalidParameters(_)
                | ckks::Error::InvalidLevel { .. }
                | ckks::Error::InvalidIndex { .. }
                | ckks::Error::InvalidDegree { .. }
                | ckks::Error::OperandMismatch { .. } => Status::InvalidArgument,
            },
            BridgeError::InvalidSelector { .. } => Status::InvalidSelector,
            BridgeError::InvalidArgument(_) => Status::InvalidArgument,
        }
    }
}

fn ring_status(err: &RingError) -> Status {
    match err {
        RingError::InvalidLevel { .. } | RingError::InvalidDegree(_) | RingError::EmptyModuli => {
            Status::InvalidArgument
        }
        _ => Status::Library,
    }
}

/// Rejects a u64 argument that does not fit the platform's usize.
pub(crate) fn to_usize(name: &str, value: u64) -> Result<usize, BridgeError> {
    usize::try_from(value).map_err(|_| BridgeError::InvalidArgument(format!("{name}={value} overflows usize")))
}
