pub mod dft;
pub mod error;
pub mod modulus;
pub mod poly;
pub mod ring;
pub mod sampler;

pub use error::RingError;
