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

//! Typed model of the `callgraph` schema.
//!
//! These types convert to and from the dynamic record through serde, so
//! `Callgraph::to_avro` produces exactly the bytes that serializing the
//! equivalent [`Value`](apache_avro::types::Value) would.

use crate::{AvroResult, serializer::AvroSerializer};
use serde::{Deserialize, Serialize};

/// A call graph: the methods of a code base and which tests reach them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Callgraph {
    pub nodes: Vec<Node>,
    pub test_relations: Vec<Relation>,
    pub vis_relations: Vec<Relation>,
}

/// One method in the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub package: String,
    pub method: String,
    pub id: i32,
    pub params: String,
    pub class: String,
    /// `"source"`, `"test"` or `"resource"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub calls_reflection: bool,
    pub file: String,
    pub always_run: bool,
}

/// Edges from one node to the nodes it relates to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub source: i32,
    pub tests: Vec<i32>,
}

impl Callgraph {
    pub fn to_avro(&self, serializer: &AvroSerializer) -> AvroResult<Vec<u8>> {
        serializer.serialize_ser(self)
    }

    pub fn from_avro(serializer: &AvroSerializer, buf: &[u8]) -> AvroResult<Self> {
        serializer.deserialize_de(buf)
    }
}
