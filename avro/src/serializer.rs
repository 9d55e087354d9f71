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

//! Binary serialization of records against one bound schema.

use crate::{
    AvroResult, Error, bounds,
    bounds::Names,
    resolver::{EmbeddedResolver, SchemaResolver},
    schema_type::SchemaType,
};
use apache_avro::{
    Schema, from_avro_datum, from_value, to_avro_datum, to_value, types::Value,
};
use bon::bon;
use log::{debug, error, warn};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use std::str::FromStr;

/// Encodes and decodes single records as raw Avro binary data.
pub trait Serializer {
    /// Validate `record` against the bound schema and return its binary encoding.
    fn serialize(&self, record: Value) -> AvroResult<Vec<u8>>;

    /// Decode one record from the start of `buf`. Bytes after the record are ignored.
    fn deserialize(&self, buf: &[u8]) -> AvroResult<Value>;
}

/// A [`Serializer`] permanently bound to the schema of one [`SchemaType`].
///
/// Construction reads and compiles the schema once. The serializer is
/// immutable afterwards and can be shared between threads.
///
/// ```
/// use apache_avro::types::Value;
/// use callgraph_avro::{AvroSerializer, Serializer};
///
/// let serializer = AvroSerializer::new("callgraph")?;
/// let empty = Value::Record(vec![
///     ("nodes".to_string(), Value::Array(vec![])),
///     ("testRelations".to_string(), Value::Array(vec![])),
///     ("visRelations".to_string(), Value::Array(vec![])),
/// ]);
/// let bytes = serializer.serialize(empty.clone())?;
/// assert_eq!(bytes, vec![0, 0, 0]);
/// assert_eq!(serializer.deserialize(&bytes)?, empty);
/// # Ok::<(), callgraph_avro::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct AvroSerializer {
    schema_type: SchemaType,
    schema: Schema,
    names: Names,
}

#[bon]
impl AvroSerializer {
    /// Creates an `AvroSerializer` for the schema type named `schema_type`, reading
    /// the schema through `resolver` (the bundled schemas if unset).
    #[builder(finish_fn = build)]
    pub fn builder<'a>(
        #[builder(start_fn)] schema_type: &'a str,
        resolver: Option<&'a dyn SchemaResolver>,
    ) -> AvroResult<Self> {
        let typ = match SchemaType::from_str(schema_type) {
            Ok(typ) if typ.is_supported() => typ,
            _ => {
                warn!("Schema type {schema_type:?} is not supported");
                return Err(Error::UnsupportedType(schema_type));
            }
        };
        match resolver {
            Some(resolver) => Self::with_schema_type(typ, resolver),
            None => Self::with_schema_type(typ, &EmbeddedResolver),
        }
    }
}

impl AvroSerializer {
    /// Creates an `AvroSerializer` for `schema_type` from the bundled schemas.
    pub fn new(schema_type: &str) -> AvroResult<Self> {
        AvroSerializer::builder(schema_type).build()
    }

    /// Creates an `AvroSerializer` for `schema_type`, reading its schema through `resolver`.
    pub fn with_schema_type(
        schema_type: SchemaType,
        resolver: &dyn SchemaResolver,
    ) -> AvroResult<Self> {
        let Some(resource) = schema_type.resource_name() else {
            warn!("Schema type {schema_type} has no schema resource");
            return Err(Error::UnsupportedType(schema_type.to_string()));
        };

        debug!("Resolving schema {resource} for {schema_type}");
        let raw = resolver
            .resolve(resource)
            .map_err(|e| Error::SchemaLoad(resource, e))?;
        let text = std::str::from_utf8(&raw).map_err(|e| Error::SchemaNotUtf8(resource, e))?;
        let schema = Schema::parse_str(text).map_err(|e| {
            error!("Schema {resource} for {schema_type} does not compile: {e}");
            Error::SchemaCompile(resource, e)
        })?;
        let names = bounds::collect_names(&schema).map_err(|e| Error::SchemaCompile(resource, e))?;

        debug!("Compiled schema {resource} for {schema_type}");
        Ok(Self {
            schema_type,
            schema,
            names,
        })
    }

    /// The schema type this serializer was built for.
    pub fn schema_type(&self) -> SchemaType {
        self.schema_type
    }

    /// The compiled schema every record is checked against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Serialize map-shaped JSON data.
    ///
    /// Objects are matched to record fields by name and numbers are narrowed to the
    /// field's type, so the input does not need to carry Avro type information.
    /// Numbers that do not fit the field's type fail to encode.
    pub fn serialize_json(&self, record: &JsonValue) -> AvroResult<Vec<u8>> {
        let value = Value::from(record.clone());
        bounds::check_int_range(&value, &self.schema, &self.names).map_err(|reason| {
            Error::Encode(<apache_avro::Error as serde::ser::Error>::custom(reason))
        })?;
        let value = value.resolve(&self.schema).map_err(Error::Encode)?;
        self.serialize(value)
    }

    /// Serialize any [`Serialize`] type whose shape matches the bound schema.
    pub fn serialize_ser<T: Serialize>(&self, record: &T) -> AvroResult<Vec<u8>> {
        let value = to_value(record).map_err(Error::Encode)?;
        self.serialize(value)
    }

    /// Deserialize a record into its JSON representation.
    pub fn deserialize_json(&self, buf: &[u8]) -> AvroResult<JsonValue> {
        let value = self.deserialize(buf)?;
        JsonValue::try_from(value).map_err(Error::Decode)
    }

    /// Deserialize a record into any [`DeserializeOwned`] type whose shape matches the bound schema.
    pub fn deserialize_de<T: DeserializeOwned>(&self, buf: &[u8]) -> AvroResult<T> {
        let value = self.deserialize(buf)?;
        from_value(&value).map_err(Error::Decode)
    }
}

impl Serializer for AvroSerializer {
    fn serialize(&self, record: Value) -> AvroResult<Vec<u8>> {
        to_avro_datum(&self.schema, record).map_err(Error::Encode)
    }

    fn deserialize(&self, mut buf: &[u8]) -> AvroResult<Value> {
        bounds::check_block_counts(&self.schema, &self.names, buf).map_err(|reason| {
            Error::Decode(<apache_avro::Error as serde::de::Error>::custom(reason))
        })?;
        from_avro_datum(&self.schema, &mut buf, None).map_err(Error::Decode)
    }
}
