use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;
use utils::map::Map;

use crate::config::RegistryConfig;
use crate::error::HandleError;
use crate::handle::Handle;
use crate::kind::{Kind, Object};

pub type Payload = Arc<dyn Any + Send + Sync>;

struct Entry<K> {
    kind: K,
    payload: Payload,
}

struct Slot<K> {
    generation: u32,
    entry: Option<Entry<K>>,
}

/// One shard: generational slots and the indices of the free ones.
struct Arena<K> {
    slots: Vec<Slot<K>>,
    free: Vec<u32>,
    retired: usize,
}

impl<K: Kind> Arena<K> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            retired: 0,
        }
    }

    /// Returns the local index and generation of a vacant slot.
    /// Panics when the shard has no addressable slot left.
    fn occupy(&mut self, entry: Entry<K>, max_slots: u64) -> (u32, u32) {
        let local: u32 = match self.free.pop() {
            Some(local) => local,
            None => {
                assert!(
                    (self.slots.len() as u64) < max_slots,
                    "handle registry shard exhausted: {} slots in use, {} retired",
                    self.slots.len(),
                    self.retired
                );
                self.slots.push(Slot {
                    generation: 1,
                    entry: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot: &mut Slot<K> = &mut self.slots[local as usize];
        debug_assert!(slot.entry.is_none(), "free list holds an occupied slot");
        slot.entry = Some(entry);
        (local, slot.generation)
    }

    fn lookup(&self, local: usize, generation: u32) -> Option<&Entry<K>> {
        self.slots
            .get(local)
            .filter(|slot| slot.generation == generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    /// Vacates the slot and bumps its generation; a slot whose generation
    /// would wrap is retired instead of going back to the free list.
    fn vacate(&mut self, local: usize, generation: u32) -> Option<Entry<K>> {
        let slot: &mut Slot<K> = self.slots.get_mut(local)?;
        if slot.generation != generation {
            return None;
        }
        let entry: Entry<K> = slot.entry.take()?;
        if slot.generation == u32::MAX {
            self.retired += 1;
        } else {
            slot.generation += 1;
            self.free.push(local as u32);
        }
        Some(entry)
    }
}

/// A sharded, generational table from [Handle] to shared objects tagged
/// with a kind `K`.
///
/// Inserts are spread round-robin over the shards. Lookups only take a
/// shard read lock and return an `Arc` clone, so a concurrent release never
/// invalidates a reference a caller already holds.
pub struct Registry<K: Kind> {
    shards: Box<[RwLock<Arena<K>>]>,
    shard_bits: u32,
    shard_mask: u32,
    max_slots: u64,
    cursor: AtomicUsize,
    live: AtomicUsize,
}

impl<K: Kind> Default for Registry<K> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<K: Kind> Registry<K> {
    pub fn new(config: RegistryConfig) -> Self {
        let shards: Box<[RwLock<Arena<K>>]> = (0..config.shard_count())
            .map(|_| RwLock::new(Arena::with_capacity(config.slots_per_shard_hint)))
            .collect();
        Self {
            shards,
            shard_bits: config.shard_bits(),
            shard_mask: (config.shard_count() - 1) as u32,
            max_slots: config.slots_per_shard(),
            cursor: AtomicUsize::new(0),
            live: AtomicUsize::new(0),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn locate(&self, handle: Handle) -> Option<(usize, usize, u32)> {
        if handle.generation() == 0 {
            return None;
        }
        let index: u32 = handle.index();
        let shard: usize = (index & self.shard_mask) as usize;
        let local: usize = (index >> self.shard_bits) as usize;
        Some((shard, local, handle.generation()))
    }

    /// Stores `value` and returns a new handle to it.
    pub fn insert<T: Object<K>>(&self, value: T) -> Handle {
        self.insert_arc(Arc::new(value))
    }

    /// Stores an already shared value; the registry becomes one more owner.
    pub fn insert_arc<T: Object<K>>(&self, value: Arc<T>) -> Handle {
        self.insert_dyn(T::KIND, value)
    }

    pub fn insert_dyn(&self, kind: K, payload: Payload) -> Handle {
        let shard: usize = self.cursor.fetch_add(1, Ordering::Relaxed) & self.shard_mask as usize;
        let (local, generation) = self.shards[shard]
            .write()
            .occupy(Entry { kind, payload }, self.max_slots);
        self.live.fetch_add(1, Ordering::Relaxed);
        let handle: Handle = Handle::new(generation, (local << self.shard_bits) | shard as u32);
        trace!(%handle, kind = kind.name(), "registry insert");
        handle
    }

    /// Returns the object named by `handle` if it is live and of type `T`.
    pub fn get<T: Object<K>>(&self, handle: Handle) -> Result<Arc<T>, HandleError> {
        let (kind, payload) = self.get_dyn(handle)?;
        let mismatch = || HandleError::TypeMismatch {
            handle,
            expected: T::KIND.name(),
            found: kind.name(),
        };
        if kind != T::KIND {
            return Err(mismatch());
        }
        payload.downcast::<T>().map_err(|_| mismatch())
    }

    /// Returns the kind and untyped payload of a live handle.
    pub fn get_dyn(&self, handle: Handle) -> Result<(K, Payload), HandleError> {
        let (shard, local, generation) = self.locate(handle).ok_or(HandleError::InvalidHandle(handle))?;
        let arena = self.shards[shard].read();
        arena
            .lookup(local, generation)
            .map(|entry| (entry.kind, entry.payload.clone()))
            .ok_or(HandleError::InvalidHandle(handle))
    }

    /// Returns the kind of a live handle.
    pub fn kind(&self, handle: Handle) -> Result<K, HandleError> {
        let (shard, local, generation) = self.locate(handle).ok_or(HandleError::InvalidHandle(handle))?;
        let arena = self.shards[shard].read();
        arena
            .lookup(local, generation)
            .map(|entry| entry.kind)
            .ok_or(HandleError::InvalidHandle(handle))
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.kind(handle).is_ok()
    }

    /// Forgets `handle` and returns the kind of the object it named. The
    /// registry's reference is dropped after the shard lock is released.
    pub fn release(&self, handle: Handle) -> Result<K, HandleError> {
        let (shard, local, generation) = self.locate(handle).ok_or(HandleError::InvalidHandle(handle))?;
        let entry: Entry<K> = self.shards[shard]
            .write()
            .vacate(local, generation)
            .ok_or(HandleError::InvalidHandle(handle))?;
        self.live.fetch_sub(1, Ordering::Relaxed);
        trace!(%handle, kind = entry.kind.name(), "registry release");
        Ok(entry.kind)
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live handles per kind.
    pub fn census(&self) -> Map<K, usize> {
        let mut census: Map<K, usize> = Map::new();
        self.shards.iter().for_each(|shard| {
            shard
                .read()
                .slots
                .iter()
                .filter_map(|slot| slot.entry.as_ref())
                .for_each(|entry| census.accumulate(entry.kind, 1))
        });
        census
    }
}

#[cfg(test)]
mod tests {
    use super::{Arena, Entry, Registry};
    use crate::config::RegistryConfig;
    use crate::error::HandleError;
    use crate::handle::Handle;
    use crate::kind::{Kind, Object};
    use std::sync::Arc;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum TestKind {
        Number,
        Text,
    }

    impl Kind for TestKind {
        fn name(self) -> &'static str {
            match self {
                TestKind::Number => "Number",
                TestKind::Text => "Text",
            }
        }
    }

    struct Number(u64);
    struct Text(String);

    impl Object<TestKind> for Number {
        const KIND: TestKind = TestKind::Number;
    }

    impl Object<TestKind> for Text {
        const KIND: TestKind = TestKind::Text;
    }

    #[test]
    fn get_returns_the_inserted_arc() {
        let registry: Registry<TestKind> = Registry::default();
        let value: Arc<Number> = Arc::new(Number(7));
        let h: Handle = registry.insert_arc(value.clone());
        let got: Arc<Number> = registry.get::<Number>(h).unwrap();
        assert!(Arc::ptr_eq(&value, &got));
        assert_eq!(got.0, 7);
    }

    #[test]
    fn null_and_unissued_handles_are_invalid() {
        let registry: Registry<TestKind> = Registry::default();
        let h: Handle = registry.insert(Number(1));
        assert_eq!(
            registry.get::<Number>(Handle::NULL).err(),
            Some(HandleError::InvalidHandle(Handle::NULL))
        );
        let bogus: Handle = Handle::from_raw(0x0000_0001_0000_ffff);
        assert_eq!(
            registry.get::<Number>(bogus).err(),
            Some(HandleError::InvalidHandle(bogus))
        );
        assert_eq!(registry.get::<Number>(h).unwrap().0, 1);
    }

    #[test]
    fn wrong_kind_is_a_type_mismatch() {
        let registry: Registry<TestKind> = Registry::default();
        let h: Handle = registry.insert(Text("x".to_string()));
        assert_eq!(
            registry.get::<Number>(h).err(),
            Some(HandleError::TypeMismatch {
                handle: h,
                expected: "Number",
                found: "Text"
            })
        );
        assert_eq!(registry.get::<Text>(h).unwrap().0, "x");
    }

    #[test]
    fn release_then_reuse_yields_new_generation() {
        let registry: Registry<TestKind> = Registry::new(RegistryConfig::default().with_shards(1));
        let h0: Handle = registry.insert(Number(1));
        assert_eq!(registry.release(h0), Ok(TestKind::Number));
        assert_eq!(registry.release(h0), Err(HandleError::InvalidHandle(h0)));

        let h1: Handle = registry.insert(Number(2));
        assert_eq!(h0.index(), h1.index());
        assert_ne!(h0, h1);
        assert!(registry.get::<Number>(h0).is_err());
        assert_eq!(registry.get::<Number>(h1).unwrap().0, 2);
    }

    #[test]
    fn release_keeps_outstanding_references_alive() {
        let registry: Registry<TestKind> = Registry::default();
        let h: Handle = registry.insert(Number(9));
        let held: Arc<Number> = registry.get::<Number>(h).unwrap();
        registry.release(h).unwrap();
        assert_eq!(held.0, 9);
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[test]
    fn census_counts_live_handles_per_kind() {
        let registry: Registry<TestKind> = Registry::default();
        let handles: Vec<Handle> = (0..5).map(|i| registry.insert(Number(i))).collect();
        registry.insert(Text("a".to_string()));
        registry.release(handles[0]).unwrap();
        let census = registry.census();
        assert_eq!(census.get(&TestKind::Number), Some(&4));
        assert_eq!(census.get(&TestKind::Text), Some(&1));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn exhausted_generation_retires_the_slot() {
        let mut arena: Arena<TestKind> = Arena::with_capacity(0);
        let entry = || Entry {
            kind: TestKind::Number,
            payload: Arc::new(Number(0)),
        };
        let (local, _) = arena.occupy(entry(), 4);
        arena.slots[local as usize].generation = u32::MAX;
        assert!(arena.vacate(local as usize, u32::MAX).is_some());
        assert!(arena.free.is_empty());
        assert_eq!(arena.retired, 1);
        let (next, generation) = arena.occupy(entry(), 4);
        assert_ne!(next, local);
        assert_eq!(generation, 1);
    }

    #[test]
    #[should_panic(expected = "handle registry shard exhausted")]
    fn full_shard_panics() {
        let mut arena: Arena<TestKind> = Arena::with_capacity(0);
        (0..3).for_each(|_| {
            arena.occupy(
                Entry {
                    kind: TestKind::Text,
                    payload: Arc::new(Text(String::new())),
                },
                2,
            );
        });
    }
}
