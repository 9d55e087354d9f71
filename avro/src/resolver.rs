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

//! Lookup of raw schema text by resource name.
//!
//! A [`SchemaResolver`] is the only place a serializer performs I/O. The
//! default [`EmbeddedResolver`] serves the schemas compiled into the crate;
//! [`DirectoryResolver`] reads them from a directory on disk.

use crate::schema_type::CALLGRAPH_RESOURCE;
use log::debug;
use std::{borrow::Cow, io, path::PathBuf};

const CALLGRAPH_SCHEMA: &str = include_str!("../schemas/callgraph.avsc");

/// Errors returned by a [`SchemaResolver`].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("Schema resource {0:?} not found")]
    NotFound(String),

    #[error("Failed to read schema resource at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Supplies the schema definition text for a resource name.
pub trait SchemaResolver: Send + Sync {
    fn resolve(&self, resource: &str) -> Result<Cow<'static, [u8]>, ResolveError>;
}

/// Serves the schemas bundled with this crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedResolver;

impl SchemaResolver for EmbeddedResolver {
    fn resolve(&self, resource: &str) -> Result<Cow<'static, [u8]>, ResolveError> {
        match resource {
            CALLGRAPH_RESOURCE => Ok(Cow::Borrowed(CALLGRAPH_SCHEMA.as_bytes())),
            _ => Err(ResolveError::NotFound(resource.to_string())),
        }
    }
}

/// Reads `<root>/<resource>` from the file system.
///
/// Resource names are plain file names; anything that would escape `root` is
/// reported as [`ResolveError::NotFound`].
#[derive(Clone, Debug)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SchemaResolver for DirectoryResolver {
    fn resolve(&self, resource: &str) -> Result<Cow<'static, [u8]>, ResolveError> {
        if resource.is_empty()
            || resource == "."
            || resource == ".."
            || resource.contains(['/', '\\'])
        {
            return Err(ResolveError::NotFound(resource.to_string()));
        }

        let path = self.root.join(resource);
        debug!("Reading schema resource from {}", path.display());
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ResolveError::NotFound(resource.to_string()))
            }
            Err(source) => Err(ResolveError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apache_avro_test_helper::TestResult;
    use pretty_assertions::assert_eq;

    #[test]
    fn embedded_serves_callgraph() -> TestResult {
        let bytes = EmbeddedResolver.resolve(CALLGRAPH_RESOURCE)?;
        let text = std::str::from_utf8(&bytes)?;
        let json: serde_json::Value = serde_json::from_str(text)?;
        assert_eq!(json["name"], "Callgraph");
        Ok(())
    }

    #[test]
    fn embedded_has_no_visgraph() {
        assert!(matches!(
            EmbeddedResolver.resolve("visgraph.avsc"),
            Err(ResolveError::NotFound(name)) if name == "visgraph.avsc"
        ));
    }

    #[test]
    fn directory_reads_files() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("x.avsc"), br#""string""#)?;
        let resolver = DirectoryResolver::new(dir.path());
        assert_eq!(&*resolver.resolve("x.avsc")?, br#""string""#);
        Ok(())
    }

    #[test]
    fn directory_missing_file_is_not_found() -> TestResult {
        let dir = tempfile::tempdir()?;
        let resolver = DirectoryResolver::new(dir.path());
        assert!(matches!(
            resolver.resolve("callgraph.avsc"),
            Err(ResolveError::NotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn directory_rejects_paths() -> TestResult {
        let dir = tempfile::tempdir()?;
        let resolver = DirectoryResolver::new(dir.path().join("schemas"));
        for name in ["", ".", "..", "../secret", "a/b.avsc", r"a\b.avsc"] {
            assert!(
                matches!(resolver.resolve(name), Err(ResolveError::NotFound(_))),
                "{name:?} should be rejected"
            );
        }
        Ok(())
    }

    #[test]
    fn directory_read_error_is_io() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("callgraph.avsc"))?;
        let resolver = DirectoryResolver::new(dir.path());
        assert!(matches!(
            resolver.resolve("callgraph.avsc"),
            Err(ResolveError::Io { .. })
        ));
        Ok(())
    }
}
