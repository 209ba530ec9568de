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

//! Example demonstrating chained hash set usage

use chainset::error::ErrorKind;
use chainset::set::ChainedHashSet;

fn print_set(set: &ChainedHashSet) {
    println!("   size = {}", set.size());
    println!("   capacity = {}", set.capacity());
    for (index, chain) in set.buckets().enumerate() {
        let keys: Vec<_> = chain.map(String::from_utf8_lossy).collect();
        if !keys.is_empty() {
            println!("   b. #{index}: {}", keys.join(" -> "));
        }
    }
}

fn main() {
    println!("=== Chained Hash Set Example ===\n");

    let mut set = ChainedHashSet::new().unwrap();

    println!("1. Insert a few keys, one of them twice:");
    for key in ["apple", "banana", "cherry", "apple"] {
        let inserted = set.insert(key).unwrap();
        println!("   insert {key:?}: {}", if inserted { "added" } else { "present" });
    }
    print_set(&set);
    println!();

    println!("2. Insert enough keys to grow the table:");
    for i in 0..40 {
        set.insert(format!("item_{i}")).unwrap();
    }
    println!("   size = {}, capacity = {}", set.size(), set.capacity());
    println!();

    println!("3. Search:");
    for key in ["banana", "durian"] {
        let present = set.contains(key).unwrap();
        println!("   {key:?}: {}", if present { "Present" } else { "Absent" });
    }
    println!();

    println!("4. Remove keys until the table shrinks back:");
    for i in 0..40 {
        set.remove(format!("item_{i}")).unwrap();
    }
    print_set(&set);
    match set.remove("durian") {
        Err(err) if err.kind() == ErrorKind::NotFound => println!("   remove \"durian\": {err}"),
        other => println!("   remove \"durian\": unexpected {other:?}"),
    }
}
