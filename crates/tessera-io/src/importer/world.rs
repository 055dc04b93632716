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
use crate::artifact::{encode_blob, MAX_BLOB_LEN};
use crate::error::ImportError;
use log::warn;
use std::fs;
use std::path::Path;
use tessera_core::asset::{AssetInfo, AssetType};

/// Imports `.lworld` scene files into length-prefixed `.worldbin` artifacts.
///
/// The scene JSON belongs to the scene layer and is cached verbatim. Unlike
/// materials, a world that is not valid JSON is still imported; the problem is
/// only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldImporter;

impl AssetImporter for WorldImporter {
    fn extensions(&self) -> &'static [&'static str] {
        &["lworld"]
    }

    fn asset_type(&self) -> AssetType {
        AssetType::World
    }

    fn import(&self, source: &Path, cache_root: &Path) -> Result<AssetInfo, ImportError> {
        let info = begin_import(source, AssetType::World)?;
        let bytes = fs::read(source).map_err(|e| ImportError::io(source, e))?;
        if bytes.len() > MAX_BLOB_LEN {
            return Err(ImportError::TooLarge {
                path: source.to_path_buf(),
                what: "world size",
            });
        }

        if let Err(e) = serde_json::from_slice::<serde_json::Value>(&bytes) {
            warn!(
                "World '{}' is not valid JSON ({}), caching it verbatim",
                source.display(),
                e
            );
        }

        let artifact = artifact_path(cache_root, "Worlds", info.guid, "worldbin");
        finish_import(info, &artifact, &encode_blob(&bytes))
    }
}
