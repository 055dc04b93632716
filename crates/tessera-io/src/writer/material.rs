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

use super::{type_mismatch, AssetWriter, WriterContext};
use crate::artifact::MaterialDocument;
use crate::error::WriteError;
use std::path::Path;
use tessera_core::asset::{AnyResource, AssetType};

/// Writes materials as `.lmat` JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialWriter;

impl AssetWriter for MaterialWriter {
    fn asset_type(&self) -> AssetType {
        AssetType::Material
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["lmat"]
    }

    fn write(
        &self,
        resource: &AnyResource,
        target: &Path,
        ctx: &WriterContext,
    ) -> Result<(), WriteError> {
        let AnyResource::Material(material) = resource else {
            return Err(type_mismatch(AssetType::Material, resource));
        };

        let json = MaterialDocument::from_material(material, material.material_id).to_json()?;
        ctx.commit(target, json.as_bytes())?;
        Ok(())
    }
}
