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

//! Importers turn source files into cached artifacts plus an [`AssetInfo`].
//!
//! Dispatch is a table built from [`DEFAULT_IMPORTERS`], a static list of
//! `(extension, ImporterKind)` pairs, rather than from registration order.

mod material;
mod mesh;
mod script;
mod shader;
mod texture;
mod world;

pub use material::MaterialImporter;
pub use mesh::MeshImporter;
pub use script::ScriptImporter;
pub use shader::ShaderImporter;
pub use texture::TextureImporter;
pub use world::WorldImporter;

use crate::error::ImportError;
use crate::fs::{ensure_parent, normalize_extension, write_atomic, FileStamp};
use ahash::AHashMap;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tessera_core::asset::{AssetId, AssetInfo, AssetType};

/// Converts one kind of source file into a cached artifact.
pub trait AssetImporter: Send + Sync {
    /// The extensions (lowercase, without the dot) this importer handles.
    fn extensions(&self) -> &'static [&'static str];

    /// The kind of asset produced.
    fn asset_type(&self) -> AssetType;

    /// Imports `source`, writing its artifact under `cache_root`.
    ///
    /// The returned record's id is derived from `source` as given, and its
    /// `imported_path` is the artifact's full path.
    fn import(&self, source: &Path, cache_root: &Path) -> Result<AssetInfo, ImportError>;

    /// Whether this importer handles `ext` (with or without the dot, any case).
    fn supports_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.extensions().iter().any(|e| *e == ext)
    }
}

/// The built-in importer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImporterKind {
    /// `.lmat` materials.
    Material,
    /// `.obj` meshes.
    Mesh,
    /// `.vert` / `.frag` shader stages.
    Shader,
    /// `.lua` scripts.
    Script,
    /// `.png` / `.jpg` / `.jpeg` textures.
    Texture,
    /// `.lworld` scenes.
    World,
}

impl ImporterKind {
    /// Instantiates the importer for this kind.
    pub fn create(self) -> Arc<dyn AssetImporter> {
        match self {
            ImporterKind::Material => Arc::new(MaterialImporter),
            ImporterKind::Mesh => Arc::new(MeshImporter),
            ImporterKind::Shader => Arc::new(ShaderImporter),
            ImporterKind::Script => Arc::new(ScriptImporter),
            ImporterKind::Texture => Arc::new(TextureImporter),
            ImporterKind::World => Arc::new(WorldImporter),
        }
    }
}

/// Extension to importer dispatch for the built-in importers.
pub const DEFAULT_IMPORTERS: &[(&str, ImporterKind)] = &[
    ("png", ImporterKind::Texture),
    ("jpg", ImporterKind::Texture),
    ("jpeg", ImporterKind::Texture),
    ("vert", ImporterKind::Shader),
    ("frag", ImporterKind::Shader),
    ("obj", ImporterKind::Mesh),
    ("lworld", ImporterKind::World),
    ("lmat", ImporterKind::Material),
    ("lua", ImporterKind::Script),
];

/// A registry of importers, looked up by extension or by asset type.
#[derive(Default, Clone)]
pub struct ImporterHub {
    importers: Vec<Arc<dyn AssetImporter>>,
    by_extension: AHashMap<String, usize>,
}

impl ImporterHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hub holding every built-in importer.
    pub fn with_defaults() -> Self {
        let mut hub = Self::new();
        hub.register_defaults();
        hub
    }

    /// Registers the built-in importers from [`DEFAULT_IMPORTERS`].
    pub fn register_defaults(&mut self) {
        let mut created: AHashMap<ImporterKind, usize> = AHashMap::new();
        for (ext, kind) in DEFAULT_IMPORTERS {
            let index = *created.entry(*kind).or_insert_with(|| {
                self.importers.push(kind.create());
                self.importers.len() - 1
            });
            self.by_extension
                .entry((*ext).to_owned())
                .or_insert(index);
        }
        debug!(
            "Registered {} default importer(s) for {} extension(s)",
            created.len(),
            DEFAULT_IMPORTERS.len()
        );
    }

    /// Registers `importer` for each of its extensions not already claimed.
    pub fn register_importer(&mut self, importer: Arc<dyn AssetImporter>) {
        let index = self.importers.len();
        for ext in importer.extensions() {
            self.by_extension
                .entry(normalize_extension(ext))
                .or_insert(index);
        }
        self.importers.push(importer);
    }

    /// The importer handling `ext` (with or without the dot, any case).
    pub fn find_by_extension(&self, ext: &str) -> Option<&Arc<dyn AssetImporter>> {
        self.by_extension
            .get(&normalize_extension(ext))
            .map(|&i| &self.importers[i])
    }

    /// The first importer producing `asset_type`.
    pub fn find_by_type(&self, asset_type: AssetType) -> Option<&Arc<dyn AssetImporter>> {
        self.importers
            .iter()
            .find(|importer| importer.asset_type() == asset_type)
    }

    /// The importer for `path`'s extension.
    pub fn find_for_path(&self, path: &Path) -> Option<&Arc<dyn AssetImporter>> {
        let ext = path.extension()?.to_str()?;
        self.find_by_extension(ext)
    }

    /// Number of registered importers.
    pub fn len(&self) -> usize {
        self.importers.len()
    }

    /// Returns `true` if no importer is registered.
    pub fn is_empty(&self) -> bool {
        self.importers.is_empty()
    }
}

/// Starts a record for `source`: checks it exists, derives its id and stamps
/// its modification time and size.
pub(crate) fn begin_import(source: &Path, asset_type: AssetType) -> Result<AssetInfo, ImportError> {
    if !source.is_file() {
        return Err(ImportError::SourceNotFound(source.to_path_buf()));
    }
    let stamp = FileStamp::of(source).map_err(|e| ImportError::io(source, e))?;
    Ok(AssetInfo {
        guid: AssetId::from_path(source),
        asset_type,
        source_path: source.to_string_lossy().into_owned(),
        source_timestamp: stamp.modified,
        source_file_size: stamp.size,
        ..Default::default()
    })
}

/// `<cache_root>/<dir>/<guid>.<ext>`.
pub(crate) fn artifact_path(cache_root: &Path, dir: &str, guid: AssetId, ext: &str) -> PathBuf {
    cache_root.join(dir).join(format!("{guid}.{ext}"))
}

/// Writes the artifact and stamps it into `info`.
pub(crate) fn finish_import(
    mut info: AssetInfo,
    artifact: &Path,
    bytes: &[u8],
) -> Result<AssetInfo, ImportError> {
    ensure_parent(artifact)
        .and_then(|()| write_atomic(artifact, bytes))
        .map_err(|e| ImportError::io(artifact, e))?;
    let stamp = FileStamp::of(artifact).map_err(|e| ImportError::io(artifact, e))?;

    info.imported_path = artifact.to_string_lossy().into_owned();
    info.imported_timestamp = stamp.modified;
    info.imported_file_size = stamp.size;
    debug!(
        "Imported '{}' -> '{}' ({} bytes)",
        info.source_path, info.imported_path, stamp.size
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dispatch_table() {
        let hub = ImporterHub::with_defaults();
        assert_eq!(hub.len(), 6);

        let expect = [
            ("png", AssetType::Texture),
            (".JPG", AssetType::Texture),
            ("vert", AssetType::Shader),
            (".frag", AssetType::Shader),
            ("obj", AssetType::Mesh),
            ("lworld", AssetType::World),
            (".lmat", AssetType::Material),
            ("lua", AssetType::Script),
        ];
        for (ext, ty) in expect {
            let importer = hub.find_by_extension(ext).unwrap();
            assert_eq!(importer.asset_type(), ty, "extension {ext}");
            assert!(importer.supports_extension(ext));
        }
        assert!(hub.find_by_extension("txt").is_none());
        assert!(hub.find_by_type(AssetType::Unknown).is_none());
    }

    #[test]
    fn test_every_default_extension_is_supported_by_its_importer() {
        for (ext, kind) in DEFAULT_IMPORTERS {
            assert!(kind.create().supports_extension(ext), "{kind:?} / {ext}");
        }
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let hub = ImporterHub::with_defaults();
        for (ext, _) in DEFAULT_IMPORTERS {
            let source = dir.path().join(format!("missing.{ext}"));
            let importer = hub.find_for_path(&source).unwrap();
            assert!(matches!(
                importer.import(&source, dir.path()),
                Err(ImportError::SourceNotFound(_))
            ));
        }
    }
}
