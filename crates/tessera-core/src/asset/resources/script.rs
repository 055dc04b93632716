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

use super::impl_resource;
use crate::asset::AssetType;
use std::path::PathBuf;

/// Lua source code loaded from a `.luabin` artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    /// Raw source text.
    pub source: String,
    /// Path of the artifact this script was read from.
    pub origin: PathBuf,
}

impl Script {
    /// Creates a script from source text.
    pub fn new(source: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            origin: origin.into(),
        }
    }
}

impl_resource!(Script, Script, AssetType::Script, |_s| true);
