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

//! Errors returned while building a serializer and while encoding or decoding records.

use crate::resolver::ResolveError;
use std::{error::Error as _, fmt};

/// Errors encountered by an [`AvroSerializer`](crate::AvroSerializer).
///
/// To inspect the details of the error use [`details`](Self::details) or [`into_details`](Self::into_details)
/// to get a [`Details`] which contains more precise error information.
#[derive(thiserror::Error, Debug)]
#[repr(transparent)]
#[error(transparent)]
pub struct Error {
    details: Box<Details>,
}

impl Error {
    pub fn new(details: Details) -> Self {
        Self {
            details: Box::new(details),
        }
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn into_details(self) -> Details {
        *self.details
    }
}

/// Functions for constructing a specific error type.
#[allow(non_snake_case, reason = "Want to mimic the `Details` variants")]
impl Error {
    /// Construct a new [`Error`] with a [`Details::UnsupportedType`].
    pub(crate) fn UnsupportedType(value: impl Into<String>) -> Self {
        Self::new(Details::UnsupportedType(value.into()))
    }

    /// Construct a new [`Error`] with a [`Details::SchemaLoad`].
    pub(crate) fn SchemaLoad(resource: &str, source: ResolveError) -> Self {
        Self::new(Details::SchemaLoad {
            resource: resource.to_string(),
            source,
        })
    }

    /// Construct a new [`Error`] with a [`Details::SchemaNotUtf8`].
    pub(crate) fn SchemaNotUtf8(resource: &str, source: std::str::Utf8Error) -> Self {
        Self::new(Details::SchemaNotUtf8 {
            resource: resource.to_string(),
            source,
        })
    }

    /// Construct a new [`Error`] with a [`Details::SchemaCompile`].
    pub(crate) fn SchemaCompile(resource: &str, source: apache_avro::Error) -> Self {
        Self::new(Details::SchemaCompile {
            resource: resource.to_string(),
            source,
        })
    }

    /// Construct a new [`Error`] with a [`Details::Encode`].
    pub(crate) fn Encode(value: apache_avro::Error) -> Self {
        Self::new(Details::Encode(value))
    }

    /// Construct a new [`Error`] with a [`Details::Decode`].
    pub(crate) fn Decode(value: apache_avro::Error) -> Self {
        Self::new(Details::Decode(value))
    }
}

impl From<Details> for Error {
    fn from(details: Details) -> Self {
        Self::new(details)
    }
}

#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum Details {
    /// The schema identifier has no bundled schema. Raised before any resource is read.
    #[error("Schema type {0:?} is not supported")]
    UnsupportedType(String),

    /// The resolver could not supply the schema text.
    #[error("Failed to read schema file {resource:?}")]
    SchemaLoad {
        resource: String,
        #[source]
        source: ResolveError,
    },

    #[error("Schema file {resource:?} is not valid utf-8")]
    SchemaNotUtf8 {
        resource: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The schema text was read but is not a valid Avro schema.
    #[error("Failed to compile schema file {resource:?}")]
    SchemaCompile {
        resource: String,
        #[source]
        source: apache_avro::Error,
    },

    #[error("Failed to encode the data")]
    Encode(#[source] apache_avro::Error),

    #[error("Failed to decode the data")]
    Decode(#[source] apache_avro::Error),
}

impl Details {
    /// Whether the bundled schema text itself is broken, as opposed to being unknown or unreadable.
    pub fn is_compile_failure(&self) -> bool {
        matches!(
            self,
            Details::SchemaCompile { .. } | Details::SchemaNotUtf8 { .. }
        )
    }
}

impl fmt::Debug for Details {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut msg = self.to_string();
        if let Some(e) = self.source() {
            msg.extend([": ", &e.to_string()]);
        }
        write!(f, "{msg}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn debug_appends_the_source() {
        let err = Error::SchemaLoad(
            "callgraph.avsc",
            ResolveError::NotFound("callgraph.avsc".to_string()),
        );
        assert_eq!(
            format!("{err:?}"),
            r#"Error { details: Failed to read schema file "callgraph.avsc": Schema resource "callgraph.avsc" not found }"#
        );
    }

    #[test]
    fn display_is_transparent() {
        let err = Error::UnsupportedType("visgraph");
        assert_eq!(err.to_string(), r#"Schema type "visgraph" is not supported"#);
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn compile_failures_are_distinct() {
        let bad = std::str::from_utf8(&[0xff, 0xfe]).unwrap_err();
        assert!(Error::SchemaNotUtf8("x.avsc", bad).details().is_compile_failure());
        assert!(!Error::UnsupportedType("x").details().is_compile_failure());
        assert!(
            !Error::SchemaLoad("x.avsc", ResolveError::NotFound("x.avsc".into()))
                .details()
                .is_compile_failure()
        );
    }
}
