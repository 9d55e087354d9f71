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

//! Structural checks run before data reaches the Avro codec.
//!
//! The decoder sizes its collections from the block counts it reads, and
//! resolving JSON narrows `long` to `int` with a cast. Both are checked here
//! first, so bad input is reported as an error instead of aborting the process
//! or producing a wrapped number.

use crate::util::{DEFAULT_MAX_ALLOCATION_BYTES, max_allocation_bytes};
use apache_avro::{
    AvroResult,
    schema::{ArraySchema, FixedSchema, MapSchema, Name, RecordSchema, ResolvedSchema, Schema},
    types::Value,
};
use std::mem::size_of;

/// Named schemas keyed by full name (same shape as `apache_avro`'s crate-private `Names`).
pub(crate) type Names = std::collections::HashMap<Name, Schema>;

const MAX_DEPTH: usize = 128;

/// Named schemas reachable from `schema`, used to follow `Schema::Ref`.
pub(crate) fn collect_names(schema: &Schema) -> AvroResult<Names> {
    let resolved = ResolvedSchema::try_from(schema)?;
    Ok(resolved
        .get_names()
        .iter()
        .map(|(name, schema)| (name.clone(), (*schema).clone()))
        .collect())
}

/// Reject a buffer whose lengths or block counts no buffer of its size could hold.
///
/// Only impossible counts are reported. Anything else that looks wrong is left
/// to the decoder, which has the precise error for it.
pub(crate) fn check_block_counts(schema: &Schema, names: &Names, buf: &[u8]) -> Result<(), String> {
    let mut walker = BlockWalker {
        names,
        limit: max_allocation_bytes(DEFAULT_MAX_ALLOCATION_BYTES),
        buf,
    };
    match walker.walk(schema, 0) {
        Err(Stop::Oversized(reason)) => Err(reason),
        Ok(()) | Err(Stop::Defer) => Ok(()),
    }
}

enum Stop {
    /// The decoder reports the problem itself.
    Defer,
    Oversized(String),
}

struct BlockWalker<'a> {
    names: &'a Names,
    limit: usize,
    buf: &'a [u8],
}

impl BlockWalker<'_> {
    fn walk(&mut self, schema: &Schema, depth: usize) -> Result<(), Stop> {
        if depth > MAX_DEPTH {
            return Err(Stop::Defer);
        }
        match schema {
            Schema::Null => Ok(()),
            Schema::Boolean => self.skip(1),
            Schema::Int | Schema::Long | Schema::Enum(_) => self.read_long().map(|_| ()),
            Schema::Float => self.skip(4),
            Schema::Double => self.skip(8),
            Schema::Bytes | Schema::String => {
                let len = self.read_len()?;
                if len > self.buf.len() {
                    return Err(Stop::Oversized(format!(
                        "Length {len} exceeds the remaining {} bytes",
                        self.buf.len()
                    )));
                }
                self.skip(len)
            }
            Schema::Fixed(FixedSchema { size, .. }) => self.skip(*size),
            Schema::Array(ArraySchema { items, .. }) => {
                self.walk_blocks(items, 0, size_of::<Value>(), depth)
            }
            Schema::Map(MapSchema { types, .. }) => {
                self.walk_blocks(types, 1, size_of::<(String, Value)>(), depth)
            }
            Schema::Union(union) => {
                let index = self.read_len()?;
                let variant = union.variants().get(index).ok_or(Stop::Defer)?;
                self.walk(variant, depth + 1)
            }
            Schema::Record(RecordSchema { fields, .. }) => fields
                .iter()
                .try_for_each(|field| self.walk(&field.schema, depth + 1)),
            Schema::Ref { name } => {
                let names = self.names;
                let schema = names.get(name).ok_or(Stop::Defer)?;
                self.walk(schema, depth + 1)
            }
            // logical types never carry blocks
            _ => Err(Stop::Defer),
        }
    }

    /// Walk the blocks of an array (`key_len == 0`) or a map (`key_len == 1`).
    fn walk_blocks(
        &mut self,
        items: &Schema,
        key_len: usize,
        item_size: usize,
        depth: usize,
    ) -> Result<(), Stop> {
        let item_len = key_len + min_encoded_len(items, self.names, 0);
        let mut total: usize = 0;
        loop {
            let count = match self.read_long()? {
                0 => return Ok(()),
                n if n < 0 => {
                    // the block's size in bytes follows a negative count
                    self.read_long()?;
                    n.checked_neg().ok_or(Stop::Defer)?
                }
                n => n,
            };
            let count = usize::try_from(count).map_err(|_| Stop::Defer)?;
            if count.saturating_mul(item_len) > self.buf.len() {
                return Err(Stop::Oversized(format!(
                    "Block of {count} items cannot fit in the remaining {} bytes",
                    self.buf.len()
                )));
            }
            total = total.saturating_add(count);
            if total.saturating_mul(item_size) > self.limit {
                return Err(Stop::Oversized(format!(
                    "Block of {count} items exceeds the allocation limit of {} bytes",
                    self.limit
                )));
            }
            for _ in 0..count {
                self.walk(items, depth + 1)?;
            }
        }
    }

    fn read_long(&mut self) -> Result<i64, Stop> {
        let buf = self.buf;
        let mut z = 0u64;
        for (j, byte) in buf.iter().enumerate().take(10) {
            z |= u64::from(byte & 0x7F) << (j * 7);
            if byte >> 7 == 0 {
                self.buf = &buf[j + 1..];
                return Ok(if z & 0x1 == 0 {
                    (z >> 1) as i64
                } else {
                    !(z >> 1) as i64
                });
            }
        }
        Err(Stop::Defer)
    }

    fn read_len(&mut self) -> Result<usize, Stop> {
        let n = self.read_long()?;
        usize::try_from(n).map_err(|_| Stop::Defer)
    }

    fn skip(&mut self, len: usize) -> Result<(), Stop> {
        if len > self.buf.len() {
            return Err(Stop::Defer);
        }
        self.buf = &self.buf[len..];
        Ok(())
    }
}

/// The fewest bytes any value of `schema` encodes to.
fn min_encoded_len(schema: &Schema, names: &Names, depth: usize) -> usize {
    if depth > MAX_DEPTH {
        return 0;
    }
    match schema {
        Schema::Null => 0,
        Schema::Float => 4,
        Schema::Double => 8,
        Schema::Fixed(FixedSchema { size, .. }) => *size,
        Schema::Boolean
        | Schema::Int
        | Schema::Long
        | Schema::Enum(_)
        | Schema::Bytes
        | Schema::String
        | Schema::Array(_)
        | Schema::Map(_)
        | Schema::Union(_) => 1,
        Schema::Record(RecordSchema { fields, .. }) => fields.iter().fold(0, |len, field| {
            len.saturating_add(min_encoded_len(&field.schema, names, depth + 1))
        }),
        Schema::Ref { name } => names
            .get(name)
            .map_or(0, |schema| min_encoded_len(schema, names, depth + 1)),
        _ => 0,
    }
}

/// Reject `long` values bound for `int` fields that do not fit in 32 bits.
///
/// `value` is the unresolved conversion of JSON input, so records are still maps.
pub(crate) fn check_int_range(value: &Value, schema: &Schema, names: &Names) -> Result<(), String> {
    check_value(value, schema, names, "", 0)
}

fn check_value(
    value: &Value,
    schema: &Schema,
    names: &Names,
    path: &str,
    depth: usize,
) -> Result<(), String> {
    if depth > MAX_DEPTH {
        return Ok(());
    }
    match (schema, value) {
        (Schema::Int, Value::Long(n)) => match i32::try_from(*n) {
            Ok(_) => Ok(()),
            Err(_) => Err(format!(
                "Value {n} at {} does not fit in an int",
                if path.is_empty() { "(root)" } else { path }
            )),
        },
        (Schema::Record(RecordSchema { fields, .. }), Value::Map(items)) => {
            fields.iter().try_for_each(|field| match items.get(&field.name) {
                Some(item) => check_value(
                    item,
                    &field.schema,
                    names,
                    &field_path(path, &field.name),
                    depth + 1,
                ),
                None => Ok(()),
            })
        }
        (Schema::Record(RecordSchema { fields, .. }), Value::Record(items)) => {
            fields.iter().try_for_each(|field| {
                match items.iter().find(|(name, _)| *name == field.name) {
                    Some((_, item)) => check_value(
                        item,
                        &field.schema,
                        names,
                        &field_path(path, &field.name),
                        depth + 1,
                    ),
                    None => Ok(()),
                }
            })
        }
        (Schema::Array(ArraySchema { items, .. }), Value::Array(values)) => values
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| {
                check_value(item, items, names, &format!("{path}[{i}]"), depth + 1)
            }),
        (Schema::Map(MapSchema { types, .. }), Value::Map(values)) => {
            values.iter().try_for_each(|(key, item)| {
                check_value(item, types, names, &field_path(path, key), depth + 1)
            })
        }
        (Schema::Ref { name }, _) => match names.get(name) {
            Some(schema) => check_value(value, schema, names, path, depth + 1),
            None => Ok(()),
        },
        _ => Ok(()),
    }
}

fn field_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
