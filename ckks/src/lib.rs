pub mod bootstrapping;
pub mod ciphertext;
pub mod dckks;
pub mod encryptor;
pub mod error;
pub mod keygen;
pub mod keys;
pub mod metadata;
pub mod parameters;
pub mod plaintext;
pub mod poly;
pub mod scale;

pub use ciphertext::{Ciphertext, CiphertextQP};
pub use error::Error;
pub use metadata::{MetaData, SharedMeta};
pub use parameters::{Parameters, ParametersLiteral};
pub use plaintext::Plaintext;
pub use poly::{PolyCell, PolyQP, SharedPoly};
pub use scale::Scale;
