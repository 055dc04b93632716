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

/// A GLSL program as a vertex/fragment source pair.
///
/// Both stages share a file stem (`lit.vert` + `lit.frag`). A missing stage is
/// left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shader {
    /// Vertex stage source.
    pub vertex_source: String,
    /// Fragment stage source.
    pub fragment_source: String,
    /// Path of the stage file this shader was loaded through.
    pub origin: PathBuf,
}

impl_resource!(Shader, Shader, AssetType::Shader, |s| !s
    .vertex_source
    .is_empty()
    || !s.fragment_source.is_empty());
