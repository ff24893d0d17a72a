use handles::{Handle, HandleError, Kind, Object, Registry, RegistryConfig};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Tag {
    Value,
}

impl Kind for Tag {
    fn name(self) -> &'static str {
        "Value"
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Value {
    thread: usize,
    seq: usize,
}

impl Object<Tag> for Value {
    const KIND: Tag = Tag::Value;
}

const THREADS: usize = 8;
const PER_THREAD: usize = 2000;

#[test]
fn concurrent_inserts_yield_distinct_handles() {
    let registry: Registry<Tag> = Registry::default();
    let handles: Vec<Handle> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..THREADS)
            .map(|thread| {
                let registry: &Registry<Tag> = &registry;
                s.spawn(move || {
                    (0..PER_THREAD)
                        .map(|seq| registry.insert(Value { thread, seq }))
                        .collect::<Vec<Handle>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect()
    });

    let distinct: HashSet<Handle> = handles.iter().copied().collect();
    assert_eq!(distinct.len(), THREADS * PER_THREAD);
    assert_eq!(registry.len(), THREADS * PER_THREAD);
    assert!(!distinct.contains(&Handle::NULL));
}

#[test]
fn interleaved_traffic_resolves_to_own_objects() {
    let registry: Registry<Tag> = Registry::new(RegistryConfig::default().with_shards(4));

    let pinned: Arc<Value> = Arc::new(Value { thread: usize::MAX, seq: 0 });
    let pinned_handle: Handle = registry.insert_arc(pinned.clone());

    std::thread::scope(|s| {
        (0..THREADS).for_each(|thread| {
            let registry: &Registry<Tag> = &registry;
            s.spawn(move || {
                let mut live: Vec<(Handle, usize)> = Vec::new();
                for seq in 0..PER_THREAD {
                    let h: Handle = registry.insert(Value { thread, seq });
                    live.push((h, seq));
                    // Release every third handle to force slot reuse.
                    if seq % 3 == 0 {
                        let (old, _) = live.swap_remove(0);
                        registry.release(old).unwrap();
                        assert_eq!(
                            registry.get::<Value>(old).err(),
                            Some(HandleError::InvalidHandle(old))
                        );
                    }
                    for (h, seq) in live.iter().rev().take(4) {
                        let v: Arc<Value> = registry.get::<Value>(*h).unwrap();
                        assert_eq!(*v, Value { thread, seq: *seq });
                    }
                }
                live.into_iter().for_each(|(h, _)| {
                    registry.release(h).unwrap();
                });
            });
        });
    });

    let got: Arc<Value> = registry.get::<Value>(pinned_handle).unwrap();
    assert!(Arc::ptr_eq(&got, &pinned));
    assert_eq!(registry.len(), 1);
}

#[test]
fn stale_handle_never_resolves_after_reuse() {
    let registry: Registry<Tag> = Registry::new(RegistryConfig::default().with_shards(1));
    let stale: Handle = registry.insert(Value { thread: 0, seq: 0 });
    registry.release(stale).unwrap();

    let fresh: Vec<Handle> = (1..10)
        .map(|seq| registry.insert(Value { thread: 0, seq }))
        .collect();
    assert!(fresh.iter().any(|h| h.index() == stale.index()));
    assert!(registry.get::<Value>(stale).is_err());
    assert!(!registry.contains(stale));
    assert_eq!(registry.release(stale), Err(HandleError::InvalidHandle(stale)));
}
