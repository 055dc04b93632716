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

use super::{begin_import, finish_import, AssetImporter};
use crate::error::ImportError;
use std::fs;
use std::path::Path;
use tessera_core::asset::{AssetInfo, AssetType};

/// Copies GLSL stage files into `<cache>/Shaders/`, keeping their file names
/// so that the `.vert`/`.frag` pair of a program stays side by side.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderImporter;

impl AssetImporter for ShaderImporter {
    fn extensions(&self) -> &'static [&'static str] {
        &["vert", "frag"]
    }

    fn asset_type(&self) -> AssetType {
        AssetType::Shader
    }

    fn import(&self, source: &Path, cache_root: &Path) -> Result<AssetInfo, ImportError> {
        let info = begin_import(source, AssetType::Shader)?;
        let text = fs::read(source).map_err(|e| ImportError::io(source, e))?;
        if text.is_empty() {
            return Err(ImportError::Empty {
                path: source.to_path_buf(),
                reason: "empty shader stage",
            });
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| ImportError::SourceNotFound(source.to_path_buf()))?;
        let artifact = cache_root.join("Shaders").join(file_name);
        finish_import(info, &artifact, &text)
    }
}
