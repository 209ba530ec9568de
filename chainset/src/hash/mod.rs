// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Key hash functions.
//!
//! A hash set maps every key to a bucket with `hash(key) & (capacity - 1)`, so only the low
//! bits of the hash decide placement. Two functions are available:
//!
//! - [`HashFunction::Squaring`] keeps the historical bucket layout. It is cheap but weak: the
//!   per-byte multiplier is squared after every byte and wraps on 64 bits, reaching 1 from the
//!   63rd byte on, so long keys that differ only by a permutation of their tail collide.
//! - [`HashFunction::Murmur3`] uses the low 64 bits of MurmurHash3 x64-128.

mod murmur;
mod squaring;

pub use self::murmur::murmur3_64;
pub use self::squaring::squaring_hash;

/// Default seed for [`HashFunction::Murmur3`].
pub const DEFAULT_MURMUR3_SEED: u32 = 9001;

/// Function used to map keys to buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashFunction {
    /// Sum of `byte * factor`, where `factor` starts at 3 and is squared after each byte.
    #[default]
    Squaring,
    /// MurmurHash3 x64-128 with the given seed, truncated to its first 64-bit half.
    Murmur3 {
        /// Hash seed.
        seed: u32,
    },
}

impl HashFunction {
    /// MurmurHash3 with [`DEFAULT_MURMUR3_SEED`].
    pub const fn murmur3() -> Self {
        HashFunction::Murmur3 {
            seed: DEFAULT_MURMUR3_SEED,
        }
    }

    /// Hash the key bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::hash::HashFunction;
    /// assert_eq!(HashFunction::Squaring.hash(b"a"), 97 * 3);
    /// ```
    #[inline]
    pub fn hash(&self, key: &[u8]) -> u64 {
        match self {
            HashFunction::Squaring => squaring_hash(key),
            HashFunction::Murmur3 { seed } => murmur3_64(key, *seed),
        }
    }

    /// Bucket index of the key in a table of `capacity` buckets.
    ///
    /// `capacity` must be a power of two.
    #[inline]
    pub fn bucket_index(&self, key: &[u8], capacity: usize) -> usize {
        debug_assert!(capacity.is_power_of_two());
        (self.hash(key) as usize) & (capacity - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_squaring() {
        assert_eq!(HashFunction::default(), HashFunction::Squaring);
    }

    #[test]
    fn test_dispatch() {
        let key = b"dispatch";
        assert_eq!(HashFunction::Squaring.hash(key), squaring_hash(key));
        assert_eq!(
            HashFunction::murmur3().hash(key),
            murmur3_64(key, DEFAULT_MURMUR3_SEED)
        );
        assert_ne!(
            HashFunction::Murmur3 { seed: 1 }.hash(key),
            HashFunction::Murmur3 { seed: 2 }.hash(key)
        );
    }

    #[test]
    fn test_bucket_index_masks_low_bits() {
        // "abc" hashes to 9192 = 0b10_0011_1110_1000
        assert_eq!(HashFunction::Squaring.bucket_index(b"abc", 8), 0);
        assert_eq!(HashFunction::Squaring.bucket_index(b"abc", 16), 8);
        assert_eq!(HashFunction::Squaring.bucket_index(b"abc", 1024), 9192 & 1023);
        for capacity in [8, 64, 1 << 20] {
            let index = HashFunction::murmur3().bucket_index(b"abc", capacity);
            assert!(index < capacity);
        }
    }
}
