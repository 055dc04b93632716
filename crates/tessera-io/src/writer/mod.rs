// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Writers serialize in-memory resources back to disk; the inverse of
//! importers.
//!
//! Every writer validates the resource first and only then writes, through a
//! temporary file renamed into place, so a failed write never leaves a
//! partial file behind.

mod material;
mod world;

pub use material::MaterialWriter;
pub use world::WorldWriter;

use crate::error::WriteError;
use crate::fs::{ensure_parent, normalize_extension, write_atomic};
use ahash::AHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tessera_core::asset::{AnyResource, AssetType};

/// Paths and policies shared by every write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterContext {
    /// Root of the engine's built-in resources.
    pub engine_resources_root: PathBuf,
    /// Root of the project's resources. [`resolve`](Self::resolve) places
    /// relative targets here.
    pub project_resources_root: PathBuf,
    /// Root of the artifact cache.
    pub cache_root: PathBuf,
    /// Create missing parent directories of the target.
    pub create_directories: bool,
}

impl WriterContext {
    /// Resolves `target` against the project root when it is relative.
    pub fn resolve(&self, target: &Path) -> PathBuf {
        if target.is_absolute() || self.project_resources_root.as_os_str().is_empty() {
            target.to_path_buf()
        } else {
            self.project_resources_root.join(target)
        }
    }

    /// Writes `bytes` to `target`, which is used exactly as given.
    pub fn commit(&self, target: &Path, bytes: &[u8]) -> Result<(), WriteError> {
        if self.create_directories {
            ensure_parent(target).map_err(|e| WriteError::io(target, e))?;
        }
        write_atomic(target, bytes).map_err(|e| WriteError::io(target, e))
    }
}

/// Serializes one kind of resource.
pub trait AssetWriter: Send + Sync {
    /// The kind of resource this writer accepts.
    fn asset_type(&self) -> AssetType;

    /// The target extensions (lowercase, without the dot) this writer produces.
    fn extensions(&self) -> &'static [&'static str];

    /// Writes `resource` to `target`. Callers pass the final path; see
    /// [`WriterContext::resolve`].
    ///
    /// Fails without touching the target if `resource` is of another kind or
    /// cannot be serialized.
    fn write(
        &self,
        resource: &AnyResource,
        target: &Path,
        ctx: &WriterContext,
    ) -> Result<(), WriteError>;
}

/// The built-in writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriterKind {
    /// Writes `.lmat` documents.
    Material,
    /// Writes `.lworld` / `.worldbin` files.
    World,
}

impl WriterKind {
    /// Instantiates the writer for this kind.
    pub fn create(self) -> Arc<dyn AssetWriter> {
        match self {
            WriterKind::Material => Arc::new(MaterialWriter),
            WriterKind::World => Arc::new(WorldWriter),
        }
    }
}

/// The built-in writers, in registration order.
pub const DEFAULT_WRITERS: &[WriterKind] = &[WriterKind::Material, WriterKind::World];

/// A registry of writers, looked up by target extension or asset type.
#[derive(Default, Clone)]
pub struct WriterHub {
    writers: Vec<Arc<dyn AssetWriter>>,
    by_extension: AHashMap<String, usize>,
}

impl WriterHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hub holding every built-in writer.
    pub fn with_defaults() -> Self {
        let mut hub = Self::new();
        for kind in DEFAULT_WRITERS {
            hub.register_writer(kind.create());
        }
        hub
    }

    /// Registers `writer` for each of its extensions not already claimed.
    pub fn register_writer(&mut self, writer: Arc<dyn AssetWriter>) {
        let index = self.writers.len();
        for ext in writer.extensions() {
            self.by_extension
                .entry(normalize_extension(ext))
                .or_insert(index);
        }
        self.writers.push(writer);
    }

    /// The writer producing `ext` (with or without the dot, any case).
    pub fn find_by_extension(&self, ext: &str) -> Option<&Arc<dyn AssetWriter>> {
        self.by_extension
            .get(&normalize_extension(ext))
            .map(|&i| &self.writers[i])
    }

    /// The first writer accepting `asset_type`.
    pub fn find_by_type(&self, asset_type: AssetType) -> Option<&Arc<dyn AssetWriter>> {
        self.writers.iter().find(|w| w.asset_type() == asset_type)
    }

    /// Number of registered writers.
    pub fn len(&self) -> usize {
        self.writers.len()
    }

    /// Returns `true` if no writer is registered.
    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

pub(crate) fn type_mismatch(expected: AssetType, resource: &AnyResource) -> WriteError {
    WriteError::TypeMismatch {
        expected,
        found: resource.asset_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_writers() {
        let hub = WriterHub::with_defaults();
        assert_eq!(hub.len(), 2);
        assert_eq!(
            hub.find_by_extension(".lmat").unwrap().asset_type(),
            AssetType::Material
        );
        assert_eq!(
            hub.find_by_extension("WORLDBIN").unwrap().asset_type(),
            AssetType::World
        );
        assert!(hub.find_by_type(AssetType::Mesh).is_none());
    }

    #[test]
    fn test_relative_targets_resolve_under_project_root() {
        let ctx = WriterContext {
            project_resources_root: PathBuf::from("project"),
            ..Default::default()
        };
        assert_eq!(
            ctx.resolve(Path::new("Materials/a.lmat")),
            Path::new("project/Materials/a.lmat")
        );
    }

    #[test]
    fn test_commit_writes_the_target_as_given() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = WriterContext {
            project_resources_root: dir.path().join("project"),
            create_directories: true,
            ..Default::default()
        };
        let target = dir.path().join("cache/Worlds/a.worldbin");

        ctx.commit(&target, b"data").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"data");
        assert!(!dir.path().join("project").exists());
    }
}
