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

use std::collections::HashSet;

use crate::set::ChainedHashSet;

pub(crate) fn set_invariants(set: &ChainedHashSet) -> bool {
    set_invariant_1(set)
        && set_invariant_2(set)
        && set_invariant_3(set)
        && set_invariant_4(set)
        && set_invariant_5(set)
}

// capacity is a power of two within the configured bounds
fn set_invariant_1(set: &ChainedHashSet) -> bool {
    set.capacity().is_power_of_two()
        && (set.min_capacity()..=set.max_capacity()).contains(&set.capacity())
}

fn set_invariant_2(set: &ChainedHashSet) -> bool {
    set.buckets().len() == set.capacity()
}

// size counts every node
fn set_invariant_3(set: &ChainedHashSet) -> bool {
    set.iter().count() == set.size()
}

// every key sits in its own bucket
fn set_invariant_4(set: &ChainedHashSet) -> bool {
    set.buckets().enumerate().all(|(index, mut chain)| {
        chain.all(|key| set.hash_function().bucket_index(key, set.capacity()) == index)
    })
}

// no duplicates
fn set_invariant_5(set: &ChainedHashSet) -> bool {
    let mut seen = HashSet::new();
    set.iter().all(|key| seen.insert(key))
}
