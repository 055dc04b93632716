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

use super::id::AssetId;
use serde::{Deserialize, Serialize};

/// The kind of resource an asset is imported as.
///
/// Persisted as an integer. Value `5` is reserved and decodes as
/// [`AssetType::Unknown`], like any other unrecognized value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[repr(u8)]
pub enum AssetType {
    /// Not recognized by any importer.
    #[default]
    Unknown = 0,
    /// A decoded RGBA8 image.
    Texture = 1,
    /// Indexed triangle geometry.
    Mesh = 2,
    /// A GLSL vertex/fragment source pair.
    Shader = 3,
    /// A PBR material description.
    Material = 4,
    /// A Lua script.
    Script = 6,
    /// A serialized scene graph.
    World = 7,
}

impl AssetType {
    /// The extension (without the dot) of the cached artifact produced for this type.
    pub fn artifact_extension(self) -> Option<&'static str> {
        match self {
            AssetType::Texture => Some("texbin"),
            AssetType::Mesh => Some("meshbin"),
            AssetType::Script => Some("luabin"),
            AssetType::World => Some("worldbin"),
            AssetType::Material => Some("lmat"),
            AssetType::Shader | AssetType::Unknown => None,
        }
    }
}

impl From<u8> for AssetType {
    fn from(value: u8) -> Self {
        match value {
            1 => AssetType::Texture,
            2 => AssetType::Mesh,
            3 => AssetType::Shader,
            4 => AssetType::Material,
            6 => AssetType::Script,
            7 => AssetType::World,
            _ => AssetType::Unknown,
        }
    }
}

impl From<AssetType> for u8 {
    fn from(value: AssetType) -> Self {
        value as u8
    }
}

/// Which resource root an asset was discovered under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[repr(u8)]
pub enum AssetOrigin {
    /// The user project's resources.
    #[default]
    Project = 0,
    /// Resources shipped with the engine itself.
    Engine = 1,
}

impl From<u8> for AssetOrigin {
    fn from(value: u8) -> Self {
        match value {
            1 => AssetOrigin::Engine,
            _ => AssetOrigin::Project,
        }
    }
}

impl From<AssetOrigin> for u8 {
    fn from(value: AssetOrigin) -> Self {
        value as u8
    }
}

/// Serializable metadata describing one imported asset.
///
/// This is the "identity card" the asset database stores for every source
/// file: where it came from, where its engine-ready artifact lives, which other
/// sources it references and the timestamps/sizes used to detect changes.
///
/// Timestamps are nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// The identifier, derived from the normalized source path.
    pub guid: AssetId,

    /// The kind of resource this asset imports as.
    #[serde(rename = "type")]
    pub asset_type: AssetType,

    /// The resource root this asset belongs to.
    #[serde(default)]
    pub origin: AssetOrigin,

    /// The source file, relative to its resource root once registered.
    #[serde(rename = "source")]
    pub source_path: String,

    /// The cached artifact. May be empty.
    #[serde(rename = "imported")]
    pub imported_path: String,

    /// Other source paths (or literal ids) this asset references.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Last modification time of the source file.
    #[serde(default, rename = "sourceTimestamp")]
    pub source_timestamp: u64,

    /// Last modification time of the cached artifact.
    #[serde(default, rename = "importedTimestamp")]
    pub imported_timestamp: u64,

    /// Size in bytes of the source file.
    #[serde(default, rename = "sourceFileSize")]
    pub source_file_size: u64,

    /// Size in bytes of the cached artifact.
    #[serde(default, rename = "importedFileSize")]
    pub imported_file_size: u64,
}

impl AssetInfo {
    /// Returns `true` if the record can be stored in a database:
    /// it has a non-empty id and a non-empty source path.
    pub fn is_storable(&self) -> bool {
        !self.guid.is_empty() && !self.source_path.is_empty()
    }
}
