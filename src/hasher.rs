//! Hasher selection for the keyed facades.
//!
//! The engine only needs *a* deterministic hash; it does not try to resist
//! adversarial keys. With the `foldhash` feature the default is foldhash's
//! fixed-seed builder, otherwise a small FNV-1a implementation is used.

use core::hash::BuildHasher;
use core::hash::Hash;
use core::hash::Hasher;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::FixedState;
    } else {
        /// Hasher builder used when none is specified.
        pub type DefaultHashBuilder = FnvBuildHasher;
    }
}

/// Fowler–Noll–Vo (FNV-1a) non-cryptographic hash function.
#[derive(Debug, Copy, Clone)]
pub struct FnvHasher {
    hash: u64,
}

impl FnvHasher {
    const FNV_PRIME: u64 = 0x100000001B3;
    const FNV_OFFSET_BASIS: u64 = 0xCBF29CE484222325;

    /// Creates a new [`FnvHasher`], initialized with the FNV offset basis.
    pub fn new() -> Self {
        Self {
            hash: FnvHasher::FNV_OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.hash ^= *byte as u64;
            self.hash = self.hash.wrapping_mul(Self::FNV_PRIME);
        }
    }
}

/// Builder for [`FnvHasher`].
#[derive(Debug, Copy, Clone, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> Self::Hasher {
        FnvHasher::new()
    }
}

/// Spreads the bits of one element hash before it is folded into a
/// collection digest, so that similar element hashes do not cancel out.
#[inline]
fn shuffle_bits(h: u64) -> u64 {
    ((h ^ 89_869_747) ^ (h << 16)).wrapping_mul(3_644_798_167)
}

/// Order-independent digest of a collection of elements.
///
/// Elements are hashed with [`FnvBuildHasher`] rather than a set's own
/// builder, so two equal sets produce the same digest regardless of how they
/// were configured.
pub(crate) fn unordered_digest<'a, T, I>(elements: I) -> u64
where
    T: Hash + 'a,
    I: IntoIterator<Item = &'a T>,
{
    elements
        .into_iter()
        .map(|element| shuffle_bits(FnvBuildHasher.hash_one(element)))
        .fold(0u64, u64::wrapping_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_known_vectors() {
        let mut h = FnvHasher::new();
        h.write(b"");
        assert_eq!(h.finish(), 0xcbf29ce484222325);

        let mut h = FnvHasher::new();
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn default_builder_is_deterministic() {
        let a = DefaultHashBuilder::default();
        let b = DefaultHashBuilder::default();
        assert_eq!(a.hash_one(12345u64), b.hash_one(12345u64));
        assert_eq!(a.hash_one("key"), b.hash_one("key"));
    }

    #[test]
    fn unordered_digest_ignores_order() {
        let forward = [1u32, 2, 3, 4];
        let backward = [4u32, 3, 2, 1];
        assert_eq!(unordered_digest(&forward), unordered_digest(&backward));
        assert_ne!(unordered_digest(&forward), unordered_digest(&forward[..3]));
        assert_eq!(unordered_digest::<u32, _>(&[]), 0);
    }
}
