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

//! Separately chained hash set of byte-string keys.
//!
//! # Overview
//!
//! [`ChainedHashSet`] keeps a power-of-two array of buckets. Each bucket owns a singly linked
//! chain of nodes, and each node owns a private copy of one key. A key always lives in bucket
//! `hash(key) & (capacity - 1)`.
//!
//! # Resizing
//!
//! The load factor is `size / capacity`:
//!
//! - Before an insert, a load factor of 2.0 or more doubles the capacity. If the larger bucket
//!   array cannot be obtained, the insert fails and the set is left untouched.
//! - After a successful remove, a load factor of 0.5 or less halves the capacity, never going
//!   below the minimum capacity. If the smaller array cannot be obtained the removal still
//!   stands and the set keeps its current capacity.
//!
//! Resizing moves the existing nodes into the new array; keys are never copied again.
//!
//! # Usage
//!
//! ```rust
//! # use chainset::set::ChainedHashSet;
//! let mut set = ChainedHashSet::new().unwrap();
//! assert!(set.insert("apple").unwrap());
//! assert!(!set.insert("apple").unwrap());
//! assert!(set.contains("apple").unwrap());
//! set.remove("apple").unwrap();
//! assert!(!set.contains("apple").unwrap());
//! assert_eq!(set.size(), 0);
//! ```

mod builder;
mod chain;
mod hash_set;
#[cfg(test)]
mod invariants;

pub use self::builder::ChainedHashSetBuilder;
pub use self::chain::Chain;
pub use self::hash_set::ChainedHashSet;

/// Minimum log2 of the bucket count.
pub const MIN_LG_CAPACITY: u8 = 3;

/// Maximum log2 of the bucket count.
pub const MAX_LG_CAPACITY: u8 = (usize::BITS - 2) as u8;

/// Default log2 of the minimum (and initial) bucket count.
pub const DEFAULT_LG_MIN_CAPACITY: u8 = MIN_LG_CAPACITY;

/// Grow before an insert once `size / capacity` reaches this value.
const GROW_LOAD_FACTOR: f64 = 2.0;

/// Shrink after a remove once `size / capacity` falls to this value.
const SHRINK_LOAD_FACTOR: f64 = 0.5;
