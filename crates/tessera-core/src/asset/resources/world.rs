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

/// A serialized scene graph.
///
/// The payload is opaque JSON text owned by the scene layer. It is not
/// validated here: a world whose source was malformed still loads, and a
/// world with an empty payload is constructed but invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct World {
    /// Raw scene JSON.
    pub json: String,
    /// Path of the artifact this world was read from.
    pub origin: PathBuf,
}

impl World {
    /// Creates a world from its JSON payload.
    pub fn new(json: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        Self {
            json: json.into(),
            origin: origin.into(),
        }
    }
}

impl_resource!(World, World, AssetType::World, |w| !w.json.is_empty());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Resource;

    #[test]
    fn test_empty_payload_is_invalid() {
        assert!(!World::new("", "a.worldbin").is_valid());
        assert!(World::new("{}", "a.worldbin").is_valid());
        assert!(World::new("{not json", "a.worldbin").is_valid());
    }
}
