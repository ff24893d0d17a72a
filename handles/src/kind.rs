use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;

/// Tag stored next to every registry entry.
pub trait Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn name(self) -> &'static str;
}

/// A type that can be stored in a registry tagged with kinds of type `K`.
///
/// Each implementing type maps to exactly one kind, which is what
/// [crate::Registry::get] checks before handing out a typed reference.
pub trait Object<K: Kind>: Any + Send + Sync {
    const KIND: K;
}
