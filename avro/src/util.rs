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

//! Process-wide decoding limits.

/// Maximum number of bytes that can be allocated when decoding
/// Avro-encoded values. This is a protection against ill-formed
/// data, whose length field might be interpreted as enormous.
/// See max_allocation_bytes to change this limit.
pub const DEFAULT_MAX_ALLOCATION_BYTES: usize = 512 * 1024 * 1024;

/// Set the maximum number of bytes that can be allocated when decoding a record.
///
/// Buffers handed to [`deserialize`](crate::Serializer::deserialize) may come from
/// anywhere, and a corrupt string length or array block count would otherwise
/// request an enormous allocation. Such buffers fail with
/// [`Details::Decode`](crate::error::Details::Decode) instead.
///
/// **NOTE** The limit can only be set once per process, and must be set before the
/// first record is decoded. Later calls leave it unchanged.
///
/// # Returns
/// The configured maximum, which might be different from what the function was called with if the
/// value was already set before.
pub fn max_allocation_bytes(num_bytes: usize) -> usize {
    apache_avro::max_allocation_bytes(num_bytes)
}
