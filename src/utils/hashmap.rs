//! A hash-map keyed by voxel coordinates that behaves deterministically when
//! the `enhanced-determinism` feature is enabled.
//!
//! Slot numbering never depends on the map's iteration order (it is recorded
//! separately by the voxel table), so both variants yield identical results.
//! The deterministic variant only matters to callers that iterate the map.

/// Deterministic hashmap using [`indexmap::IndexMap`] and a hasher that does not
/// depend on the pointer width.
#[cfg(feature = "enhanced-determinism")]
pub type FxHashMap32<K, V> =
    indexmap::IndexMap<K, V, core::hash::BuildHasherDefault<super::fx_hasher::FxHasher32>>;
#[cfg(feature = "enhanced-determinism")]
pub use {self::FxHashMap32 as HashMap, indexmap::map::Entry};

#[cfg(not(feature = "enhanced-determinism"))]
pub use hashbrown::hash_map::Entry;
/// Hashmap using [`hashbrown::HashMap`] with a fixed-seed hasher.
#[cfg(not(feature = "enhanced-determinism"))]
pub type HashMap<K, V> = hashbrown::hash_map::HashMap<K, V, foldhash::fast::FixedState>;

/// Creates an empty map able to hold `capacity` keys without reallocating.
pub fn with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
    HashMap::with_capacity_and_hasher(capacity, Default::default())
}
