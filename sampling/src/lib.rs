pub mod distributions;
pub mod prng;
pub mod source;
