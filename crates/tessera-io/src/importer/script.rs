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
use std::fs;
use std::path::Path;
use tessera_core::asset::{AssetInfo, AssetType};

/// Imports Lua scripts into length-prefixed `.luabin` artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptImporter;

impl AssetImporter for ScriptImporter {
    fn extensions(&self) -> &'static [&'static str] {
        &["lua"]
    }

    fn asset_type(&self) -> AssetType {
        AssetType::Script
    }

    fn import(&self, source: &Path, cache_root: &Path) -> Result<AssetInfo, ImportError> {
        let info = begin_import(source, AssetType::Script)?;
        let text = fs::read_to_string(source).map_err(|e| ImportError::io(source, e))?;
        if text.len() > MAX_BLOB_LEN {
            return Err(ImportError::TooLarge {
                path: source.to_path_buf(),
                what: "script size",
            });
        }

        let artifact = artifact_path(cache_root, "Scripts", info.guid, "luabin");
        finish_import(info, &artifact, &encode_blob(text.as_bytes()))
    }
}
