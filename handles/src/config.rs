/// Largest supported shard count; keeps at least 2^16 slots per shard.
pub const MAX_SHARDS: usize = 1 << 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Number of independently locked shards, rounded up to a power of two.
    pub shards: usize,
    /// Slots pre-allocated per shard.
    pub slots_per_shard_hint: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            shards: 16,
            slots_per_shard_hint: 0,
        }
    }
}

impl RegistryConfig {
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    pub fn with_slots_per_shard_hint(mut self, slots: usize) -> Self {
        self.slots_per_shard_hint = slots;
        self
    }

    /// Returns the effective shard count: a power of two in [1, MAX_SHARDS].
    pub fn shard_count(&self) -> usize {
        self.shards.clamp(1, MAX_SHARDS).next_power_of_two()
    }

    pub fn shard_bits(&self) -> u32 {
        self.shard_count().trailing_zeros()
    }

    /// Returns the number of slots a shard can address.
    pub fn slots_per_shard(&self) -> u64 {
        1u64 << (u32::BITS - self.shard_bits())
    }
}
