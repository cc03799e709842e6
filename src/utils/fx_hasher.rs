//! FxHasher taken from rustc_hash, narrowed to a 32-bit state so that hashes of
//! voxel keys do not depend on the pointer width.

use core::hash::Hasher;

const SEED: u32 = 0x9e3779b9;

/// A 32-bit FxHasher.
///
/// Voxel keys hash as three [`Hasher::write_i32`] calls, one mixed word each,
/// so their hashes are the same on every platform. Arbitrary byte slices are
/// folded four little-endian bytes at a time, with the tail zero-extended;
/// such hashes follow the byte order of the hashed value.
#[derive(Copy, Clone, Debug, Default)]
pub struct FxHasher32 {
    hash: u32,
}

impl FxHasher32 {
    #[inline]
    fn mix(&mut self, word: u32) {
        self.hash = (self.hash.rotate_left(5) ^ word).wrapping_mul(SEED);
    }
}

impl Hasher for FxHasher32 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut chunks = bytes.chunks_exact(4);
        for chunk in &mut chunks {
            self.mix(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }

        let tail = chunks.remainder();
        if !tail.is_empty() {
            let mut word = [0u8; 4];
            word[..tail.len()].copy_from_slice(tail);
            self.mix(u32::from_le_bytes(word));
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.mix(i as u32);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.mix(i);
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.mix(i as u32);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.mix(i as u32);
        self.mix((i >> 32) as u32);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash as u64
    }
}
