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
use crate::asset::{AssetId, AssetType};
use std::path::PathBuf;

/// Name given to materials that do not declare one.
pub const DEFAULT_MATERIAL_NAME: &str = "DefaultMaterial";

/// PBR surface parameters loaded from a `.lmat` document.
///
/// Texture slots hold identifiers, not loaded textures; an empty
/// [`AssetId`] means the slot is unused.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Display name.
    pub name: String,
    /// Base color, RGBA.
    pub albedo_color: [f32; 4],
    /// Emitted light, RGB.
    pub emissive_color: [f32; 3],
    /// 0 is a mirror, 1 fully rough.
    pub roughness: f32,
    /// 0 is dielectric, 1 is metal.
    pub metallic: f32,
    /// Scale applied to the normal map.
    pub normal_strength: f32,
    /// Albedo texture slot.
    pub albedo_texture: AssetId,
    /// Normal map slot.
    pub normal_texture: AssetId,
    /// Packed roughness/metallic texture slot.
    pub roughness_metallic_texture: AssetId,
    /// Emissive texture slot.
    pub emissive_texture: AssetId,
    /// The material's own identifier, if the document declared one.
    pub material_id: AssetId,
    /// Path of the document this material was read from.
    pub origin: PathBuf,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: DEFAULT_MATERIAL_NAME.to_owned(),
            albedo_color: [1.0; 4],
            emissive_color: [0.0; 3],
            roughness: 0.5,
            metallic: 0.0,
            normal_strength: 1.0,
            albedo_texture: AssetId::EMPTY,
            normal_texture: AssetId::EMPTY,
            roughness_metallic_texture: AssetId::EMPTY,
            emissive_texture: AssetId::EMPTY,
            material_id: AssetId::EMPTY,
            origin: PathBuf::new(),
        }
    }
}

impl Material {
    /// Iterates the non-empty texture slots.
    pub fn textures(&self) -> impl Iterator<Item = AssetId> + '_ {
        [
            self.albedo_texture,
            self.normal_texture,
            self.roughness_metallic_texture,
            self.emissive_texture,
        ]
        .into_iter()
        .filter(|id| !id.is_empty())
    }
}

impl_resource!(Material, Material, AssetType::Material, |_m| true);
