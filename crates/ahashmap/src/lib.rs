//! Aliases for hash collections keyed with a fast non-cryptographic hasher.
//!
//! The scan builds several large path-keyed indexes; ahash is measurably
//! faster than siphash for short string keys.

pub use std::collections::{hash_map, hash_set};

#[cfg(feature = "ahash")]
pub type ARandomState = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
pub type ARandomState = std::collections::hash_map::RandomState;

pub type AHashMap<K, V> = std::collections::HashMap<K, V, ARandomState>;
pub type AHashSet<T> = std::collections::HashSet<T, ARandomState>;
