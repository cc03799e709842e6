//! Hashing helpers shared by the voxelization passes.

pub use self::fx_hasher::FxHasher32;

mod fx_hasher;
pub mod hashmap;
