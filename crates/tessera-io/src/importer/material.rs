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

use super::{artifact_path, begin_import, finish_import, AssetImporter};
use crate::artifact::MaterialDocument;
use crate::error::ImportError;
use std::fs;
use std::path::Path;
use tessera_core::asset::{AssetInfo, AssetType};

/// Imports `.lmat` material documents.
///
/// The cached copy is a normalized document with every field spelled out and
/// every texture reference resolved to an id. Texture references are recorded
/// as dependencies. A malformed document is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialImporter;

impl AssetImporter for MaterialImporter {
    fn extensions(&self) -> &'static [&'static str] {
        &["lmat"]
    }

    fn asset_type(&self) -> AssetType {
        AssetType::Material
    }

    fn import(&self, source: &Path, cache_root: &Path) -> Result<AssetInfo, ImportError> {
        let mut info = begin_import(source, AssetType::Material)?;

        let text = fs::read_to_string(source).map_err(|e| ImportError::io(source, e))?;
        let document = MaterialDocument::parse(&text).map_err(|e| ImportError::Json {
            path: source.to_path_buf(),
            source: e,
        })?;

        let artifact = artifact_path(cache_root, "Materials", info.guid, "lmat");
        let material = document.to_material(&artifact);
        let cached = MaterialDocument::from_material(&material, info.guid)
            .to_json()
            .map_err(|e| ImportError::Json {
                path: source.to_path_buf(),
                source: e,
            })?;

        info.dependencies = document.texture_references();
        finish_import(info, &artifact, cached.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::asset::AssetId;

    #[test]
    fn test_import_records_texture_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("brick.lmat");
        fs::write(
            &source,
            r#"{"name":"Brick","albedoTexture":"Textures/brick.png","normalTexture":""}"#,
        )
        .unwrap();

        let info = MaterialImporter.import(&source, &dir.path().join("cache")).unwrap();
        assert_eq!(info.asset_type, AssetType::Material);
        assert_eq!(info.dependencies, vec!["Textures/brick.png".to_owned()]);
        assert!(info.imported_path.ends_with(&format!("{}.lmat", info.guid)));

        let cached = MaterialDocument::parse(&fs::read_to_string(&info.imported_path).unwrap())
            .unwrap()
            .to_material("x");
        assert_eq!(cached.name, "Brick");
        assert_eq!(cached.albedo_texture, AssetId::new("Textures/brick.png"));
        assert_eq!(cached.material_id, info.guid);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.lmat");
        fs::write(&source, "{ name: ").unwrap();

        assert!(matches!(
            MaterialImporter.import(&source, dir.path()),
            Err(ImportError::Json { .. })
        ));
    }
}
