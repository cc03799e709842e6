use super::VoxelKey;
use crate::utils::hashmap::{self, Entry, HashMap};
use alloc::vec::Vec;

/// The outcome of [`VoxelTable::lookup_or_insert`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotLookup {
    /// The key was already registered at this slot.
    Existing(usize),
    /// The key was just registered at this slot.
    Inserted(usize),
    /// The key is new but the table already holds `max_voxels` keys.
    Full,
}

impl SlotLookup {
    /// The slot index, unless the table was full.
    #[inline]
    pub fn slot(self) -> Option<usize> {
        match self {
            SlotLookup::Existing(slot) | SlotLookup::Inserted(slot) => Some(slot),
            SlotLookup::Full => None,
        }
    }

    /// Was the key registered by this lookup?
    #[inline]
    pub fn is_new(self) -> bool {
        matches!(self, SlotLookup::Inserted(_))
    }
}

/// A capacity-bounded map from voxel keys to dense, sequential slot indices.
///
/// Slots are numbered in first-seen order: the first key inserted gets slot
/// `0`, the next distinct key slot `1`, and so on up to `max_voxels - 1`. Once
/// full, unknown keys are rejected and known keys still resolve.
///
/// A table lives for exactly one scale pass.
#[derive(Clone, Debug)]
pub struct VoxelTable {
    slots: HashMap<VoxelKey, u32>,
    keys: Vec<VoxelKey>,
    max_voxels: usize,
}

impl VoxelTable {
    /// An empty table holding at most `max_voxels` keys.
    ///
    /// `expected_keys` only sizes the initial allocation.
    pub fn new(max_voxels: usize, expected_keys: usize) -> Self {
        let capacity = expected_keys.min(max_voxels);
        Self {
            slots: hashmap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            max_voxels,
        }
    }

    /// Resolves the slot of `key`, registering it if there is room left.
    #[inline]
    pub fn lookup_or_insert(&mut self, key: VoxelKey) -> SlotLookup {
        let next = self.keys.len();
        match self.slots.entry(key) {
            Entry::Occupied(entry) => SlotLookup::Existing(*entry.get() as usize),
            Entry::Vacant(_) if next >= self.max_voxels => SlotLookup::Full,
            Entry::Vacant(entry) => {
                let _ = entry.insert(next as u32);
                self.keys.push(key);
                SlotLookup::Inserted(next)
            }
        }
    }

    /// The slot of `key`, if registered.
    #[inline]
    pub fn get(&self, key: &VoxelKey) -> Option<usize> {
        self.slots.get(key).map(|slot| *slot as usize)
    }

    /// The registered keys, indexed by slot.
    #[inline]
    pub fn keys(&self) -> &[VoxelKey] {
        &self.keys
    }

    /// The number of registered keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Does this table hold no key?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Has this table reached its capacity?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.max_voxels
    }

    /// The maximum number of keys.
    #[inline]
    pub fn max_voxels(&self) -> usize {
        self.max_voxels
    }

    /// Consumes the table, returning the keys indexed by slot.
    pub fn into_keys(self) -> Vec<VoxelKey> {
        self.keys
    }
}
