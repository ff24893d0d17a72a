use crate::scale::Scale;
use parking_lot::RwLock;
use std::sync::Arc;

/// Encoding state shared by ciphertexts and plaintexts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetaData {
    pub scale: Scale,
    pub is_ntt: bool,
    pub is_montgomery: bool,
}

/// Metadata owned by a ciphertext or plaintext and reachable on its own.
pub type SharedMeta = Arc<RwLock<MetaData>>;

impl MetaData {
    pub fn new(scale: Scale, is_ntt: bool, is_montgomery: bool) -> Self {
        Self {
            scale,
            is_ntt,
            is_montgomery,
        }
    }

    pub fn shared(self) -> SharedMeta {
        Arc::new(RwLock::new(self))
    }
}
