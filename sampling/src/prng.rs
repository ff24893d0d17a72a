use parking_lot::{Mutex, MutexGuard};

use crate::source::{new_seed, Source};

/// A [Source] that can be shared between several consumers, e.g. a
/// uniform sampler and the party that created it. Consumers lock it
/// for the duration of one draw.
pub struct Prng {
    seed: [u8; 32],
    source: Mutex<Source>,
}

impl Prng {
    /// Returns a new [Prng] seeded from the operating system.
    pub fn new() -> Self {
        Self::from_seed(new_seed())
    }

    /// Returns a new [Prng] whose stream is fully determined by `key`.
    /// Keys shorter than 32 bytes are zero padded, longer keys are
    /// folded into the seed with XOR.
    pub fn keyed(key: &[u8]) -> Self {
        let mut seed: [u8; 32] = [0u8; 32];
        key.iter()
            .enumerate()
            .for_each(|(i, b)| seed[i & 31] ^= *b);
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            seed,
            source: Mutex::new(Source::new(seed)),
        }
    }

    pub fn seed(&self) -> [u8; 32] {
        self.seed
    }

    pub fn lock(&self) -> MutexGuard<'_, Source> {
        self.source.lock()
    }
}

impl Default for Prng {
    fn default() -> Self {
        Self::new()
    }
}
