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

//! Buckets and the node chains they own.

use std::fmt;

use crate::error::Error;

type Link = Option<Box<Node>>;

/// One chain link, owning a private copy of its key.
pub(super) struct Node {
    key: Box<[u8]>,
    next: Link,
}

impl Node {
    /// Allocate a detached node holding a copy of `key`.
    pub(super) fn boxed(key: &[u8]) -> Result<Box<Node>, Error> {
        Ok(Box::new(Node {
            key: copy_key(key)?,
            next: None,
        }))
    }

    pub(super) fn key(&self) -> &[u8] {
        &self.key
    }
}

fn copy_key(key: &[u8]) -> Result<Box<[u8]>, Error> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(key.len()).map_err(|err| {
        Error::out_of_memory("failed to allocate key copy", err).with_context("key_len", key.len())
    })?;
    copy.extend_from_slice(key);
    Ok(copy.into_boxed_slice())
}

/// Bucket slot: the owning head of a chain, or empty.
#[derive(Default)]
pub(super) struct Bucket {
    head: Link,
}

impl Bucket {
    pub(super) fn chain(&self) -> Chain<'_> {
        Chain {
            next: self.head.as_deref(),
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub(super) fn contains(&self, key: &[u8]) -> bool {
        self.chain().any(|k| k == key)
    }

    /// Append at the tail without checking for duplicates.
    pub(super) fn push_back(&mut self, node: Box<Node>) {
        debug_assert!(node.next.is_none());
        let mut link = &mut self.head;
        while let Some(current) = link {
            link = &mut current.next;
        }
        *link = Some(node);
    }

    pub(super) fn push_front(&mut self, mut node: Box<Node>) {
        node.next = self.head.take();
        self.head = Some(node);
    }

    /// Detach the head node; the returned node has no successor.
    pub(super) fn pop_front(&mut self) -> Option<Box<Node>> {
        let mut node = self.head.take()?;
        self.head = node.next.take();
        Some(node)
    }

    /// Unlink and drop the node holding `key`. Returns whether it was found.
    pub(super) fn remove(&mut self, key: &[u8]) -> bool {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| *node.key != *key) {
            if let Some(node) = link {
                link = &mut node.next;
            }
        }
        match link.take() {
            Some(mut node) => {
                *link = node.next.take();
                true
            }
            None => false,
        }
    }

    /// Drop every node, one at a time.
    pub(super) fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }
}

impl Drop for Bucket {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Keys of one bucket, head to tail.
///
/// The order inside a chain is not part of the contract: inserts append at the tail, while
/// resizing prepends relocated nodes.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            node.key()
        })
    }
}

impl fmt::Debug for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.clone().map(String::from_utf8_lossy))
            .finish()
    }
}
