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

use std::fmt;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::hash::HashFunction;
use crate::set::ChainedHashSetBuilder;
use crate::set::DEFAULT_LG_MIN_CAPACITY;
use crate::set::GROW_LOAD_FACTOR;
use crate::set::MAX_LG_CAPACITY;
use crate::set::SHRINK_LOAD_FACTOR;
use crate::set::chain::Bucket;
use crate::set::chain::Chain;
use crate::set::chain::Node;

/// Hash set of byte-string keys with separate chaining.
///
/// A set is either initialized (`capacity() >= min_capacity()`) or uninitialized
/// (`capacity() == 0`, after [`deinit`](Self::deinit)). Operations on an uninitialized set fail
/// with [`ErrorKind::InvalidArgument`].
pub struct ChainedHashSet {
    size: usize,
    capacity: usize,
    buckets: Vec<Bucket>,
    hash_function: HashFunction,
    lg_min_capacity: u8,
    lg_max_capacity: u8,
}

impl ChainedHashSet {
    /// Create a new builder for ChainedHashSet
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::set::ChainedHashSet;
    /// let set = ChainedHashSet::builder().lg_min_capacity(5).build().unwrap();
    /// assert_eq!(set.capacity(), 32);
    /// ```
    pub fn builder() -> ChainedHashSetBuilder {
        ChainedHashSetBuilder::default()
    }

    /// Create an initialized set with the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::set::ChainedHashSet;
    /// let set = ChainedHashSet::new().unwrap();
    /// assert_eq!(set.capacity(), 8);
    /// assert_eq!(set.size(), 0);
    /// ```
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Create an uninitialized set; `init` must run before use.
    pub(super) fn uninitialized(
        hash_function: HashFunction,
        lg_min_capacity: u8,
        lg_max_capacity: u8,
    ) -> Self {
        debug_assert!(lg_min_capacity <= lg_max_capacity);
        Self {
            size: 0,
            capacity: 0,
            buckets: Vec::new(),
            hash_function,
            lg_min_capacity,
            lg_max_capacity,
        }
    }

    /// Allocate the initial bucket array and reset the size to zero.
    ///
    /// Any keys of an already initialized set are released. On failure the set is unchanged.
    pub fn init(&mut self) -> Result<(), Error> {
        let capacity = self.min_capacity();
        self.buckets = allocate_buckets(capacity)?;
        self.capacity = capacity;
        self.size = 0;
        trace!(capacity, "hash set initialized");
        Ok(())
    }

    /// Release every key and the bucket array.
    ///
    /// The set becomes uninitialized and must be re-initialized with [`init`](Self::init)
    /// before reuse.
    pub fn deinit(&mut self) -> Result<(), Error> {
        // Bucket teardown walks each chain iteratively.
        self.buckets = Vec::new();
        self.capacity = 0;
        self.size = 0;
        trace!("hash set deinitialized");
        Ok(())
    }

    /// Insert a copy of the key.
    ///
    /// Returns `true` if the key was added, `false` if it was already present. When the load
    /// factor has reached 2.0 the set grows first. If the larger bucket array or the key copy
    /// cannot be allocated, fails with [`ErrorKind::AllocationFailure`] and leaves the set as it
    /// was.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::set::ChainedHashSet;
    /// let mut set = ChainedHashSet::new().unwrap();
    /// assert!(set.insert("a").unwrap());
    /// assert!(set.insert(b"b").unwrap());
    /// assert!(!set.insert(String::from("a")).unwrap());
    /// assert_eq!(set.size(), 2);
    /// ```
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K) -> Result<bool, Error> {
        let key = key.as_ref();
        self.check_key(key)?;

        // Allocate everything fallible before touching the table.
        let node = if self.bucket(key).contains(key) {
            None
        } else {
            Some(Node::boxed(key)?)
        };
        if self.load_factor() >= GROW_LOAD_FACTOR {
            self.grow()?;
        }

        let Some(node) = node else {
            return Ok(false);
        };
        let index = self.hash_function.bucket_index(key, self.capacity);
        self.buckets[index].push_back(node);
        self.size += 1;
        Ok(true)
    }

    /// Return whether the key is in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::set::ChainedHashSet;
    /// let mut set = ChainedHashSet::new().unwrap();
    /// set.insert("apple").unwrap();
    /// assert!(set.contains("apple").unwrap());
    /// assert!(!set.contains("pear").unwrap());
    /// ```
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> Result<bool, Error> {
        let key = key.as_ref();
        self.check_key(key)?;
        Ok(self.bucket(key).contains(key))
    }

    /// Remove the key.
    ///
    /// Fails with [`ErrorKind::NotFound`] if the key is absent. After a successful removal the
    /// set shrinks once the load factor drops to 0.5, unless it is at its minimum capacity. A
    /// shrink that cannot allocate keeps the current capacity and does not undo the removal.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::error::ErrorKind;
    /// # use chainset::set::ChainedHashSet;
    /// let mut set = ChainedHashSet::new().unwrap();
    /// set.insert("apple").unwrap();
    /// set.remove("apple").unwrap();
    /// assert_eq!(set.remove("apple").unwrap_err().kind(), ErrorKind::NotFound);
    /// ```
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> Result<(), Error> {
        let key = key.as_ref();
        self.check_key(key)?;

        let index = self.hash_function.bucket_index(key, self.capacity);
        if !self.buckets[index].remove(key) {
            return Err(Error::not_found(key));
        }
        self.size -= 1;

        if self.load_factor() <= SHRINK_LOAD_FACTOR && self.capacity > self.min_capacity() {
            // The removal is committed; a failed shrink only keeps the larger array.
            let _ = self.resize(self.capacity / 2);
        }
        Ok(())
    }

    /// Number of keys in the set.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Return true if the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets; zero when uninitialized.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Initial capacity and shrink floor.
    pub fn min_capacity(&self) -> usize {
        1 << self.lg_min_capacity
    }

    /// Largest capacity the set may grow to.
    pub fn max_capacity(&self) -> usize {
        1 << self.lg_max_capacity
    }

    /// Return true unless the set was deinitialized.
    pub fn is_initialized(&self) -> bool {
        self.capacity != 0
    }

    /// `size / capacity`, or 0.0 when uninitialized.
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.size as f64 / self.capacity as f64
    }

    /// Hash function used to place keys in buckets.
    pub fn hash_function(&self) -> HashFunction {
        self.hash_function
    }

    /// Index of the bucket the key maps to at the current capacity.
    pub fn bucket_index<K: AsRef<[u8]>>(&self, key: K) -> Result<usize, Error> {
        let key = key.as_ref();
        self.check_key(key)?;
        Ok(self.hash_function.bucket_index(key, self.capacity))
    }

    /// Chains of all buckets, by bucket index.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::set::ChainedHashSet;
    /// let mut set = ChainedHashSet::new().unwrap();
    /// set.insert("a").unwrap();
    /// let index = set.bucket_index("a").unwrap();
    /// let chain: Vec<&[u8]> = set.buckets().nth(index).unwrap().collect();
    /// assert_eq!(chain, [b"a"]);
    /// ```
    pub fn buckets(&self) -> impl ExactSizeIterator<Item = Chain<'_>> + '_ {
        self.buckets.iter().map(Bucket::chain)
    }

    /// All keys, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.buckets().flatten()
    }

    fn check_key(&self, key: &[u8]) -> Result<(), Error> {
        if !self.is_initialized() {
            return Err(Error::uninitialized());
        }
        match key.iter().position(|&b| b == 0) {
            Some(position) => Err(Error::invalid_key(position)),
            None => Ok(()),
        }
    }

    fn bucket(&self, key: &[u8]) -> &Bucket {
        &self.buckets[self.hash_function.bucket_index(key, self.capacity)]
    }

    fn grow(&mut self) -> Result<(), Error> {
        let new_capacity = self
            .capacity
            .checked_mul(2)
            .filter(|&capacity| capacity <= self.max_capacity())
            .ok_or_else(|| Error::capacity_exhausted(self.capacity, self.max_capacity()))?;
        self.resize(new_capacity)
    }

    /// Move every node into a new array of `new_capacity` buckets.
    ///
    /// Nodes are re-pinned at the head of their new bucket. On failure the current array is
    /// left as it was.
    fn resize(&mut self, new_capacity: usize) -> Result<(), Error> {
        let old_capacity = self.capacity;
        let mut new_buckets = match allocate_buckets(new_capacity) {
            Ok(buckets) => buckets,
            Err(err) => {
                warn!(old_capacity, new_capacity, %err, "failed to resize hash set");
                return Err(err);
            }
        };

        for bucket in &mut self.buckets {
            while let Some(node) = bucket.pop_front() {
                let index = self.hash_function.bucket_index(node.key(), new_capacity);
                new_buckets[index].push_front(node);
            }
        }

        self.buckets = new_buckets;
        self.capacity = new_capacity;
        debug!(old_capacity, new_capacity, size = self.size, "resized hash set");
        Ok(())
    }
}

#[cfg(test)]
thread_local! {
    /// Makes `allocate_buckets` fail on the current thread.
    static FAIL_BUCKET_ALLOCATION: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

#[cfg(test)]
fn bucket_allocation_disabled() -> bool {
    FAIL_BUCKET_ALLOCATION.get()
}

#[cfg(not(test))]
fn bucket_allocation_disabled() -> bool {
    false
}

fn allocate_buckets(capacity: usize) -> Result<Vec<Bucket>, Error> {
    debug_assert!(capacity.is_power_of_two());
    if bucket_allocation_disabled() {
        return Err(
            Error::new(ErrorKind::AllocationFailure, "failed to allocate bucket array")
                .with_context("capacity", capacity),
        );
    }
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity).map_err(|err| {
        Error::out_of_memory("failed to allocate bucket array", err)
            .with_context("capacity", capacity)
    })?;
    buckets.resize_with(capacity, Bucket::default);
    Ok(buckets)
}

impl Default for ChainedHashSet {
    /// An initialized set with the default configuration.
    fn default() -> Self {
        let mut set =
            Self::uninitialized(HashFunction::default(), DEFAULT_LG_MIN_CAPACITY, MAX_LG_CAPACITY);
        set.capacity = set.min_capacity();
        set.buckets.resize_with(set.capacity, Bucket::default);
        set
    }
}

impl fmt::Debug for ChainedHashSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct NonEmptyBuckets<'a>(&'a [Bucket]);

        impl fmt::Debug for NonEmptyBuckets<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map()
                    .entries(
                        self.0
                            .iter()
                            .enumerate()
                            .filter(|(_, bucket)| !bucket.is_empty())
                            .map(|(index, bucket)| (index, bucket.chain())),
                    )
                    .finish()
            }
        }

        f.debug_struct("ChainedHashSet")
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .field("hash_function", &self.hash_function)
            .field("buckets", &NonEmptyBuckets(&self.buckets))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::squaring_hash;
    use crate::set::invariants::set_invariants;

    fn key(i: usize) -> String {
        format!("key_{i}")
    }

    #[test]
    fn test_new_set() {
        let set = ChainedHashSet::new().unwrap();
        assert_eq!(set.size(), 0);
        assert_eq!(set.capacity(), 8);
        assert!(set.is_empty());
        assert!(set.is_initialized());
        assert_eq!(set.load_factor(), 0.0);
        assert_eq!(set.iter().count(), 0);
        assert_eq!(set.buckets().len(), 8);
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_default_matches_new() {
        let set = ChainedHashSet::default();
        assert_eq!(set.capacity(), 8);
        assert_eq!(set.min_capacity(), 8);
        assert_eq!(set.max_capacity(), 1 << MAX_LG_CAPACITY);
        assert_eq!(set.hash_function(), HashFunction::Squaring);
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_duplicate_insert_appends_once() {
        let mut set = ChainedHashSet::new().unwrap();
        assert!(set.insert("a").unwrap());
        assert!(set.insert("b").unwrap());
        assert!(!set.insert("a").unwrap());
        assert_eq!(set.size(), 2);
        assert_eq!(set.iter().filter(|k| *k == b"a").count(), 1);
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_insert_appends_at_tail() {
        // "abc" and "" both land in bucket 0 of 8 buckets.
        assert_eq!(squaring_hash(b"abc") & 7, 0);
        let mut set = ChainedHashSet::new().unwrap();
        set.insert("").unwrap();
        set.insert("abc").unwrap();
        let chain: Vec<&[u8]> = set.buckets().next().unwrap().collect();
        assert_eq!(chain, [&b""[..], &b"abc"[..]]);
    }

    #[test]
    fn test_grow_at_load_factor_two() {
        let mut set = ChainedHashSet::new().unwrap();
        for i in 0..16 {
            set.insert(key(i)).unwrap();
        }
        assert_eq!(set.capacity(), 8);
        assert_eq!(set.load_factor(), 2.0);

        set.insert(key(16)).unwrap();
        assert_eq!(set.capacity(), 16);
        assert_eq!(set.size(), 17);
        for i in 0..17 {
            assert!(set.contains(key(i)).unwrap());
        }
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_duplicate_insert_still_grows() {
        let mut set = ChainedHashSet::new().unwrap();
        for i in 0..16 {
            set.insert(key(i)).unwrap();
        }
        assert!(!set.insert(key(0)).unwrap());
        assert_eq!(set.capacity(), 16);
        assert_eq!(set.size(), 16);
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_shrink_at_load_factor_half() {
        let mut set = ChainedHashSet::new().unwrap();
        for i in 0..17 {
            set.insert(key(i)).unwrap();
        }
        assert_eq!(set.capacity(), 16);

        for i in 0..8 {
            set.remove(key(i)).unwrap();
        }
        assert_eq!(set.size(), 9);
        assert_eq!(set.capacity(), 16);

        set.remove(key(8)).unwrap();
        assert_eq!(set.size(), 8);
        assert_eq!(set.capacity(), 8);

        for i in 9..17 {
            set.remove(key(i)).unwrap();
            assert_eq!(set.capacity(), 8);
        }
        assert!(set.is_empty());
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_failed_shrink_keeps_removal() {
        let mut set = ChainedHashSet::new().unwrap();
        for i in 0..17 {
            set.insert(key(i)).unwrap();
        }
        for i in 0..8 {
            set.remove(key(i)).unwrap();
        }
        assert_eq!(set.size(), 9);
        assert_eq!(set.capacity(), 16);

        FAIL_BUCKET_ALLOCATION.set(true);
        let removed = set.remove(key(8));
        FAIL_BUCKET_ALLOCATION.set(false);
        removed.unwrap();
        assert_eq!(set.size(), 8);
        assert_eq!(set.capacity(), 16);
        assert!(!set.contains(key(8)).unwrap());
        for i in 9..17 {
            assert!(set.contains(key(i)).unwrap());
        }
        assert!(set_invariants(&set));

        // the next removal shrinks as usual
        set.remove(key(9)).unwrap();
        assert_eq!(set.size(), 7);
        assert_eq!(set.capacity(), 8);
        for i in 10..17 {
            assert!(set.contains(key(i)).unwrap());
        }
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_failed_grow_keeps_set() {
        let mut set = ChainedHashSet::new().unwrap();
        for i in 0..16 {
            set.insert(key(i)).unwrap();
        }
        FAIL_BUCKET_ALLOCATION.set(true);
        let inserted = set.insert(key(16));
        FAIL_BUCKET_ALLOCATION.set(false);
        assert_eq!(inserted.unwrap_err().kind(), ErrorKind::AllocationFailure);
        assert_eq!(set.size(), 16);
        assert_eq!(set.capacity(), 8);
        assert!(!set.contains(key(16)).unwrap());
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_remove_missing_key() {
        let mut set = ChainedHashSet::new().unwrap();
        set.insert("a").unwrap();
        let err = set.remove("x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(set.size(), 1);
    }

    #[test]
    fn test_invalid_key() {
        let mut set = ChainedHashSet::new().unwrap();
        set.insert("a").unwrap();
        assert_eq!(
            set.insert(b"a\0b").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            set.contains(b"\0").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            set.remove(b"a\0").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(set.size(), 1);
        assert!(set.contains("a").unwrap());
    }

    #[test]
    fn test_deinit_and_reinit() {
        let mut set = ChainedHashSet::new().unwrap();
        for i in 0..40 {
            set.insert(key(i)).unwrap();
        }
        set.deinit().unwrap();
        assert!(!set.is_initialized());
        assert_eq!(set.capacity(), 0);
        assert_eq!(set.size(), 0);
        assert_eq!(set.buckets().len(), 0);
        assert_eq!(set.load_factor(), 0.0);
        for err in [
            set.insert("a").unwrap_err(),
            set.contains("a").unwrap_err(),
            set.remove("a").unwrap_err(),
            set.bucket_index("a").unwrap_err(),
        ] {
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        // deinit of an uninitialized set is a no-op
        set.deinit().unwrap();

        set.init().unwrap();
        assert_eq!(set.capacity(), 8);
        assert!(!set.contains(key(0)).unwrap());
        assert!(set.insert(key(0)).unwrap());
    }

    #[test]
    fn test_init_resets_initialized_set() {
        let mut set = ChainedHashSet::new().unwrap();
        for i in 0..40 {
            set.insert(key(i)).unwrap();
        }
        set.init().unwrap();
        assert_eq!(set.capacity(), 8);
        assert!(set.is_empty());
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_grow_beyond_max_capacity_rolls_back() {
        let mut set = ChainedHashSet::builder()
            .lg_min_capacity(3)
            .lg_max_capacity(3)
            .build()
            .unwrap();
        for i in 0..16 {
            set.insert(key(i)).unwrap();
        }
        let before: Vec<Vec<Vec<u8>>> = set
            .buckets()
            .map(|chain| chain.map(<[u8]>::to_vec).collect())
            .collect();

        let err = set.insert(key(16)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocationFailure);
        assert_eq!(set.size(), 16);
        assert_eq!(set.capacity(), 8);
        assert!(!set.contains(key(16)).unwrap());
        let after: Vec<Vec<Vec<u8>>> = set
            .buckets()
            .map(|chain| chain.map(<[u8]>::to_vec).collect())
            .collect();
        assert_eq!(before, after);

        // removal keeps working at the cap
        set.remove(key(0)).unwrap();
        set.insert(key(16)).unwrap();
        assert_eq!(set.size(), 16);
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_failed_bucket_allocation_keeps_set() {
        let mut set = ChainedHashSet::new().unwrap();
        set.insert("a").unwrap();
        let err = set.resize(1 << MAX_LG_CAPACITY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocationFailure);
        assert_eq!(set.capacity(), 8);
        assert!(set.contains("a").unwrap());
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_resize_moves_nodes() {
        let mut set = ChainedHashSet::new().unwrap();
        for i in 0..10 {
            set.insert(key(i)).unwrap();
        }
        let mut before: Vec<*const u8> = set.iter().map(<[u8]>::as_ptr).collect();
        set.resize(64).unwrap();
        assert_eq!(set.capacity(), 64);
        assert_eq!(set.size(), 10);
        let mut after: Vec<*const u8> = set.iter().map(<[u8]>::as_ptr).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_murmur3_hash_function() {
        let mut set = ChainedHashSet::builder()
            .hash_function(HashFunction::murmur3())
            .build()
            .unwrap();
        for i in 0..100 {
            set.insert(key(i)).unwrap();
        }
        assert_eq!(set.size(), 100);
        assert_eq!(set.capacity(), 64);
        for i in 0..100 {
            assert!(set.contains(key(i)).unwrap());
            let index = set.bucket_index(key(i)).unwrap();
            assert_eq!(
                index,
                HashFunction::murmur3().bucket_index(key(i).as_bytes(), 64)
            );
        }
        assert!(set_invariants(&set));
    }

    #[test]
    fn test_debug_lists_non_empty_buckets() {
        let mut set = ChainedHashSet::new().unwrap();
        set.insert("a").unwrap();
        let rendered = format!("{set:?}");
        assert_eq!(
            rendered,
            r#"ChainedHashSet { size: 1, capacity: 8, hash_function: Squaring, buckets: {3: ["a"]} }"#
        );
    }
}
