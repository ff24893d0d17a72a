use crate::error::Error;
use crate::metadata::{MetaData, SharedMeta};
use crate::parameters::Parameters;
use crate::poly::SharedPoly;

#[derive(Clone)]
pub struct Plaintext {
    pub value: SharedPoly,
    pub meta: SharedMeta,
}

impl Plaintext {
    /// Wraps value as a plaintext in the NTT domain at the default scale.
    /// The plaintext shares the polynomial with the caller.
    pub fn new(params: &Parameters, value: SharedPoly, level: usize) -> Result<Self, Error> {
        params.check_level(level)?;
        Ok(Self {
            value,
            meta: MetaData::new(params.default_scale(), true, false).shared(),
        })
    }

    pub fn level(&self) -> usize {
        self.value.read().level()
    }
}
