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

//! Schema-bound **[Apache Avro](https://avro.apache.org/)** serialization.
//!
//! An [`AvroSerializer`] is created once per schema type. Creation looks the
//! type name up, reads the schema text through a [`SchemaResolver`] and compiles
//! it. Afterwards the serializer turns records into raw Avro binary data and
//! back. The encoding itself is done by the [`apache_avro`] crate.
//!
//! Records can be handed over in three shapes:
//!
//! 1. As the generic [`Value`](apache_avro::types::Value), through the [`Serializer`] trait.
//! 2. As map-shaped JSON, through [`AvroSerializer::serialize_json`].
//! 3. As any Serde type, through [`AvroSerializer::serialize_ser`], for example the
//!    [`Callgraph`] model.
//!
//! ```
//! use callgraph_avro::{AvroSerializer, Callgraph, Relation};
//!
//! let serializer = AvroSerializer::new("callgraph")?;
//! let graph = Callgraph {
//!     test_relations: vec![Relation { source: 1, tests: vec![2] }],
//!     ..Default::default()
//! };
//! let bytes = graph.to_avro(&serializer)?;
//! assert_eq!(Callgraph::from_avro(&serializer, &bytes)?, graph);
//! # Ok::<(), callgraph_avro::Error>(())
//! ```
//!
//! The output carries no container header, fingerprint or length prefix.
//! Streams of several records need their own framing.
//!
//! # Errors
//!
//! Every failure is returned as an [`Error`]; see [`error::Details`] for the kinds.
//! A failed `serialize` or `deserialize` does not affect the serializer.

mod bounds;
mod callgraph;
mod serializer;

pub mod error;
pub mod resolver;
pub mod schema_type;
pub mod util;

pub use callgraph::{Callgraph, Node, Relation};
pub use error::Error;
pub use resolver::{DirectoryResolver, EmbeddedResolver, ResolveError, SchemaResolver};
pub use schema_type::SchemaType;
pub use serializer::{AvroSerializer, Serializer};

/// A convenience type alias for `Result`s with `Error`s.
pub type AvroResult<T> = Result<T, Error>;
