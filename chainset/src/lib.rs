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

//! # chainset
//!
//! A hash set of byte-string keys built on separate chaining over power-of-two bucket arrays.
//! The set doubles its bucket count when the load factor reaches 2.0 before an insert and
//! halves it when the load factor falls to 0.5 after a remove.
//!
//! - [`set`]: the [`ChainedHashSet`](set::ChainedHashSet) and its builder.
//! - [`hash`]: the functions mapping keys to buckets.
//! - [`error`]: the error type shared by all operations.
//!
//! The set is not synchronized: mutation goes through `&mut self`, and sharing one set across
//! threads needs an outer lock.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod hash;
pub mod set;
