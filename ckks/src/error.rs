use math::RingError;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Ring(#[from] RingError),
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("invalid level: level={level} > max level={max}")]
    InvalidLevel { level: usize, max: usize },
    #[error("invalid index: index={index} > degree={degree}")]
    InvalidIndex { index: usize, degree: usize },
    #[error("invalid ciphertext degree: {degree} > {max}")]
    InvalidDegree { degree: usize, max: usize },
    #[error("operand mismatch: n={n} level={level} over a chain of n={ring_n} level={ring_level}")]
    OperandMismatch {
        n: usize,
        level: usize,
        ring_n: usize,
        ring_level: usize,
    },
}
