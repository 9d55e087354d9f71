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

//! The named schema types a serializer can be bound to.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// File name of the callgraph schema resource.
pub const CALLGRAPH_RESOURCE: &str = "callgraph.avsc";

/// Identifies one schema by its logical type name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaType {
    /// Method-to-test call graph produced by test intelligence.
    Callgraph,
    /// Reserved for the visualisation graph. No schema resource is bundled for it.
    Visgraph,
}

impl SchemaType {
    /// The resource holding this type's schema text, or `None` if the type is not wired up.
    pub fn resource_name(self) -> Option<&'static str> {
        match self {
            SchemaType::Callgraph => Some(CALLGRAPH_RESOURCE),
            SchemaType::Visgraph => None,
        }
    }

    /// Whether a serializer can be built for this type.
    pub fn is_supported(self) -> bool {
        self.resource_name().is_some()
    }

    /// All types that have a schema resource.
    pub fn supported() -> impl Iterator<Item = SchemaType> {
        SchemaType::iter().filter(|t| t.is_supported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("callgraph", SchemaType::Callgraph)]
    #[case("visgraph", SchemaType::Visgraph)]
    fn parses_lowercase_identifiers(#[case] name: &str, #[case] expected: SchemaType) {
        assert_eq!(SchemaType::from_str(name), Ok(expected));
        assert_eq!(expected.to_string(), name);
        assert_eq!(<&'static str>::from(expected), name);
    }

    #[rstest]
    #[case("")]
    #[case("unknown")]
    #[case("Callgraph")]
    #[case("callgraph.avsc")]
    fn rejects_unknown_identifiers(#[case] name: &str) {
        assert!(SchemaType::from_str(name).is_err());
    }

    #[test]
    fn only_callgraph_is_wired() {
        assert_eq!(
            SchemaType::supported().collect::<Vec<_>>(),
            vec![SchemaType::Callgraph]
        );
        assert_eq!(SchemaType::Visgraph.resource_name(), None);
    }
}
