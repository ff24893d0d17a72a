use thiserror::Error;

/// Errors raised while building rings or operating on them with
/// out-of-range arguments.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RingError {
    #[error("invalid ring degree: n={0} must be a power of two in [2, 2^17]")]
    InvalidDegree(usize),
    #[error("invalid modulus chain: no modulus was provided")]
    EmptyModuli,
    #[error("invalid modulus: q={0} is not a prime < 2^61")]
    NotPrime(u64),
    #[error("invalid modulus: q={q} != 1 mod {nth_root}")]
    NotNttFriendly { q: u64, nth_root: u64 },
    #[error("invalid modulus chain: q={0} appears more than once")]
    DuplicateModulus(u64),
    #[error("invalid level: level={level} > max level={max}")]
    InvalidLevel { level: usize, max: usize },
    #[error("degree mismatch: {0} != {1}")]
    DegreeMismatch(usize, usize),
    #[error("prime list exhausted for bit size {bit_size} and nth root {nth_root}")]
    PrimesExhausted { bit_size: u64, nth_root: u64 },
}
