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

const INITIAL_FACTOR: u64 = 3;

/// Sum of `byte * factor` over the key, squaring `factor` after each byte.
///
/// All arithmetic wraps on 64 bits. Bytes are sign-extended, so `0x80..=0xff` weigh as
/// negative values.
#[inline]
pub fn squaring_hash(key: &[u8]) -> u64 {
    let mut sum = 0u64;
    let mut factor = INITIAL_FACTOR;
    for &byte in key {
        sum = sum.wrapping_add((byte as i8 as u64).wrapping_mul(factor));
        factor = factor.wrapping_mul(factor);
    }
    sum
}
