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

use crate::error::Error;
use crate::hash::HashFunction;
use crate::set::ChainedHashSet;
use crate::set::DEFAULT_LG_MIN_CAPACITY;
use crate::set::MAX_LG_CAPACITY;
use crate::set::MIN_LG_CAPACITY;

/// Builder for ChainedHashSet
#[derive(Debug, Clone)]
pub struct ChainedHashSetBuilder {
    lg_min_capacity: u8,
    lg_max_capacity: u8,
    hash_function: HashFunction,
}

impl Default for ChainedHashSetBuilder {
    fn default() -> Self {
        Self {
            lg_min_capacity: DEFAULT_LG_MIN_CAPACITY,
            lg_max_capacity: MAX_LG_CAPACITY,
            hash_function: HashFunction::default(),
        }
    }
}

impl ChainedHashSetBuilder {
    /// Set log2 of the minimum capacity, which is also the initial capacity.
    ///
    /// # Panics
    ///
    /// If lg_min_capacity is not in range [3, MAX_LG_CAPACITY]
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::set::ChainedHashSet;
    /// let set = ChainedHashSet::builder().lg_min_capacity(4).build().unwrap();
    /// assert_eq!(set.capacity(), 16);
    /// assert_eq!(set.min_capacity(), 16);
    /// ```
    pub fn lg_min_capacity(mut self, lg_min_capacity: u8) -> Self {
        assert!(
            (MIN_LG_CAPACITY..=MAX_LG_CAPACITY).contains(&lg_min_capacity),
            "lg_min_capacity must be in [{}, {}], got {}",
            MIN_LG_CAPACITY,
            MAX_LG_CAPACITY,
            lg_min_capacity
        );
        self.lg_min_capacity = lg_min_capacity;
        self
    }

    /// Set log2 of the maximum capacity. Inserts that would need to grow beyond it fail.
    ///
    /// # Panics
    ///
    /// If lg_max_capacity is not in range [3, MAX_LG_CAPACITY]
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::set::ChainedHashSet;
    /// let set = ChainedHashSet::builder().lg_max_capacity(10).build().unwrap();
    /// assert_eq!(set.max_capacity(), 1024);
    /// ```
    pub fn lg_max_capacity(mut self, lg_max_capacity: u8) -> Self {
        assert!(
            (MIN_LG_CAPACITY..=MAX_LG_CAPACITY).contains(&lg_max_capacity),
            "lg_max_capacity must be in [{}, {}], got {}",
            MIN_LG_CAPACITY,
            MAX_LG_CAPACITY,
            lg_max_capacity
        );
        self.lg_max_capacity = lg_max_capacity;
        self
    }

    /// Set the hash function used to place keys.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chainset::hash::HashFunction;
    /// # use chainset::set::ChainedHashSet;
    /// let set = ChainedHashSet::builder()
    ///     .hash_function(HashFunction::murmur3())
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(set.hash_function(), HashFunction::murmur3());
    /// ```
    pub fn hash_function(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;
        self
    }

    /// Build an initialized ChainedHashSet.
    ///
    /// # Panics
    ///
    /// If lg_max_capacity is less than lg_min_capacity
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::AllocationFailure`](crate::error::ErrorKind::AllocationFailure) if
    /// the initial bucket array cannot be allocated.
    pub fn build(self) -> Result<ChainedHashSet, Error> {
        assert!(
            self.lg_min_capacity <= self.lg_max_capacity,
            "lg_max_capacity must be >= lg_min_capacity, got lg_min_capacity={}, lg_max_capacity={}",
            self.lg_min_capacity,
            self.lg_max_capacity
        );
        let mut set = ChainedHashSet::uninitialized(
            self.hash_function,
            self.lg_min_capacity,
            self.lg_max_capacity,
        );
        set.init()?;
        Ok(set)
    }
}
