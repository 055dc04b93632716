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
use crate::artifact::{encode_blob, MAX_BLOB_LEN};
use crate::error::WriteError;
use crate::fs::extension_of;
use std::path::Path;
use tessera_core::asset::{AnyResource, AssetType};

/// Writes worlds either as raw `.lworld` JSON or as a `.worldbin` artifact,
/// depending on the target extension.
///
/// A world with an empty payload cannot be written.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldWriter;

impl AssetWriter for WorldWriter {
    fn asset_type(&self) -> AssetType {
        AssetType::World
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["lworld", "worldbin"]
    }

    fn write(
        &self,
        resource: &AnyResource,
        target: &Path,
        ctx: &WriterContext,
    ) -> Result<(), WriteError> {
        let AnyResource::World(world) = resource else {
            return Err(type_mismatch(AssetType::World, resource));
        };

        let payload = world.json.as_bytes();
        if payload.is_empty() {
            return Err(WriteError::InvalidResource("world payload is empty"));
        }
        if payload.len() >= MAX_BLOB_LEN {
            return Err(WriteError::PayloadTooLarge {
                size: payload.len(),
                limit: MAX_BLOB_LEN,
            });
        }

        match extension_of(target).as_deref() {
            Some("worldbin") => ctx.commit(target, &encode_blob(payload))?,
            _ => ctx.commit(target, payload)?,
        };
        Ok(())
    }
}
