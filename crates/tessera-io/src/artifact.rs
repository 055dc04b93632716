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

//! Encoders and decoders for the cached artifact formats.
//!
//! All integers and floats are stored in native byte order (little-endian on
//! every supported target):
//!
//! | Format      | Layout                                                                |
//! |-------------|-----------------------------------------------------------------------|
//! | `.texbin`   | `i32 width, i32 height, i32 channels, u8[width*height*4]` (RGBA8)      |
//! | `.meshbin`  | `u32 vertices, u32 indices, f32[3v] positions, f32[3v] normals, f32[2v] uvs, u32[i]` |
//! | `.luabin`   | `u32 length, u8[length]` (script source)                             |
//! | `.worldbin` | `u32 length, u8[length]` (scene JSON)                                 |
//! | `.lmat`     | JSON [`MaterialDocument`]                                             |

use crate::error::ArtifactError;
use crate::fs::extension_of;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tessera_core::asset::{
    AssetId, Material, Mesh, MeshVertex, Resource, Script, Shader, Texture, World,
    DEFAULT_MATERIAL_NAME,
};

/// Largest accepted texture edge, in pixels.
pub const MAX_TEXTURE_DIMENSION: u32 = 16_384;
/// Largest accepted vertex count in a mesh.
pub const MAX_MESH_VERTICES: u32 = 1_000_000;
/// Largest accepted index count in a mesh.
pub const MAX_MESH_INDICES: u32 = 10_000_000;
/// Largest accepted length-prefixed payload, in bytes.
pub const MAX_BLOB_LEN: usize = 100 * 1024 * 1024;

struct Reader<'a> {
    bytes: &'a [u8],
    origin: &'a Path,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], origin: &'a Path) -> Self {
        Self { bytes, origin }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ArtifactError> {
        if len > self.bytes.len() {
            return Err(ArtifactError::Truncated {
                path: self.origin.to_path_buf(),
                needed: len,
                available: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn u32(&mut self) -> Result<u32, ArtifactError> {
        let raw = self.take(4)?;
        Ok(u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn i32(&mut self) -> Result<i32, ArtifactError> {
        let raw = self.take(4)?;
        Ok(i32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn f32s(&mut self, count: usize) -> Result<Vec<f32>, ArtifactError> {
        Ok(bytemuck::pod_collect_to_vec(self.take(count * 4)?))
    }

    fn u32s(&mut self, count: usize) -> Result<Vec<u32>, ArtifactError> {
        Ok(bytemuck::pod_collect_to_vec(self.take(count * 4)?))
    }
}

/// Encodes RGBA8 pixels as a `.texbin` artifact.
pub fn encode_texture(width: u32, height: u32, channels: u32, rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(12 + rgba.len());
    out.extend_from_slice(&(width as i32).to_ne_bytes());
    out.extend_from_slice(&(height as i32).to_ne_bytes());
    out.extend_from_slice(&(channels as i32).to_ne_bytes());
    out.extend_from_slice(rgba);
    out
}

/// Decodes a `.texbin` artifact.
pub fn decode_texture(bytes: &[u8], origin: &Path) -> Result<Texture, ArtifactError> {
    let mut reader = Reader::new(bytes, origin);
    let width = reader.i32()?;
    let height = reader.i32()?;
    let channels = reader.i32()?;

    let in_range = |v: i32| v > 0 && v as u32 <= MAX_TEXTURE_DIMENSION;
    if !in_range(width) || !in_range(height) {
        return Err(ArtifactError::corrupted(
            origin,
            format!("invalid texture size {width}x{height}"),
        ));
    }
    if !(1..=4).contains(&channels) {
        return Err(ArtifactError::corrupted(
            origin,
            format!("invalid channel count {channels}"),
        ));
    }

    let (width, height) = (width as u32, height as u32);
    let pixels = reader.take(Texture::rgba_len(width, height))?.to_vec();
    Ok(Texture {
        width,
        height,
        channels: channels as u32,
        pixels,
        origin: origin.to_path_buf(),
    })
}

/// Encodes vertices and indices as a `.meshbin` artifact.
pub fn encode_mesh(vertices: &[MeshVertex], indices: &[u32]) -> Vec<u8> {
    let positions: Vec<f32> = vertices.iter().flat_map(|v| v.position).collect();
    let normals: Vec<f32> = vertices.iter().flat_map(|v| v.normal).collect();
    let uvs: Vec<f32> = vertices.iter().flat_map(|v| v.uv).collect();

    let mut out = Vec::with_capacity(8 + vertices.len() * 32 + indices.len() * 4);
    out.extend_from_slice(&(vertices.len() as u32).to_ne_bytes());
    out.extend_from_slice(&(indices.len() as u32).to_ne_bytes());
    out.extend_from_slice(bytemuck::cast_slice(&positions));
    out.extend_from_slice(bytemuck::cast_slice(&normals));
    out.extend_from_slice(bytemuck::cast_slice(&uvs));
    out.extend_from_slice(bytemuck::cast_slice(indices));
    out
}

/// Decodes a `.meshbin` artifact and computes its bounding box.
pub fn decode_mesh(bytes: &[u8], origin: &Path) -> Result<Mesh, ArtifactError> {
    let mut reader = Reader::new(bytes, origin);
    let vertex_count = reader.u32()?;
    let index_count = reader.u32()?;

    if vertex_count == 0 || vertex_count > MAX_MESH_VERTICES {
        return Err(ArtifactError::corrupted(
            origin,
            format!("invalid vertex count {vertex_count}"),
        ));
    }
    if index_count > MAX_MESH_INDICES {
        return Err(ArtifactError::corrupted(
            origin,
            format!("invalid index count {index_count}"),
        ));
    }

    let count = vertex_count as usize;
    let positions = reader.f32s(count * 3)?;
    let normals = reader.f32s(count * 3)?;
    let uvs = reader.f32s(count * 2)?;
    let indices = reader.u32s(index_count as usize)?;

    if let Some(bad) = indices.iter().find(|&&i| i >= vertex_count) {
        return Err(ArtifactError::corrupted(
            origin,
            format!("index {bad} out of range for {vertex_count} vertices"),
        ));
    }

    let vertices = (0..count)
        .map(|i| MeshVertex {
            position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
            normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
            uv: [uvs[i * 2], uvs[i * 2 + 1]],
        })
        .collect();

    Ok(Mesh::new(vertices, indices, origin))
}

/// Encodes a length-prefixed payload (`.luabin`, `.worldbin`).
pub fn encode_blob(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
    out.extend_from_slice(payload);
    out
}

/// Decodes a length-prefixed payload.
pub fn decode_blob<'a>(bytes: &'a [u8], origin: &'a Path) -> Result<&'a [u8], ArtifactError> {
    let mut reader = Reader::new(bytes, origin);
    let len = reader.u32()? as usize;
    if len > MAX_BLOB_LEN {
        return Err(ArtifactError::corrupted(
            origin,
            format!("payload length {len} exceeds limit"),
        ));
    }
    reader.take(len)
}

/// The JSON form of a material, used both for editable `.lmat` sources and
/// for their cached copies.
///
/// Texture slots hold either a literal id or a source path, which is hashed
/// into an id on conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDocument {
    /// Literal id of the material, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// RGB or RGBA base color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albedo_color: Option<Vec<f32>>,
    /// RGB emitted color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive_color: Option<Vec<f32>>,
    /// Roughness factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    /// Metallic factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallic: Option<f32>,
    /// Normal map strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_strength: Option<f32>,
    /// Albedo texture reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albedo_texture: Option<String>,
    /// Normal map reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<String>,
    /// Roughness/metallic texture reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_metallic_texture: Option<String>,
    /// Emissive texture reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<String>,
}

impl MaterialDocument {
    /// Parses a document from JSON text.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serializes the document as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// The non-empty texture references, in slot order.
    pub fn texture_references(&self) -> Vec<String> {
        [
            &self.albedo_texture,
            &self.normal_texture,
            &self.roughness_metallic_texture,
            &self.emissive_texture,
        ]
        .into_iter()
        .flatten()
        .filter(|r| !r.is_empty() && !AssetId::new(r).is_empty())
        .cloned()
        .collect()
    }

    /// Builds a material, filling unspecified fields with defaults.
    pub fn to_material(&self, origin: impl Into<PathBuf>) -> Material {
        let defaults = Material::default();
        let slot = |r: &Option<String>| r.as_deref().map(AssetId::new).unwrap_or_default();

        let albedo_color = match self.albedo_color.as_deref() {
            Some([r, g, b, a, ..]) => [*r, *g, *b, *a],
            Some([r, g, b]) => [*r, *g, *b, 1.0],
            _ => defaults.albedo_color,
        };
        let emissive_color = match self.emissive_color.as_deref() {
            Some([r, g, b, ..]) => [*r, *g, *b],
            _ => defaults.emissive_color,
        };

        Material {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_MATERIAL_NAME.to_owned()),
            albedo_color,
            emissive_color,
            roughness: self.roughness.unwrap_or(defaults.roughness),
            metallic: self.metallic.unwrap_or(defaults.metallic),
            normal_strength: self.normal_strength.unwrap_or(defaults.normal_strength),
            albedo_texture: slot(&self.albedo_texture),
            normal_texture: slot(&self.normal_texture),
            roughness_metallic_texture: slot(&self.roughness_metallic_texture),
            emissive_texture: slot(&self.emissive_texture),
            material_id: slot(&self.guid),
            origin: origin.into(),
        }
    }

    /// Captures every field of `material`. Texture slots are written as ids.
    pub fn from_material(material: &Material, guid: AssetId) -> Self {
        let slot = |id: AssetId| (!id.is_empty()).then(|| id.str());
        Self {
            guid: (!guid.is_empty()).then(|| guid.str()),
            name: Some(material.name.clone()),
            albedo_color: Some(material.albedo_color.to_vec()),
            emissive_color: Some(material.emissive_color.to_vec()),
            roughness: Some(material.roughness),
            metallic: Some(material.metallic),
            normal_strength: Some(material.normal_strength),
            albedo_texture: slot(material.albedo_texture),
            normal_texture: slot(material.normal_texture),
            roughness_metallic_texture: slot(material.roughness_metallic_texture),
            emissive_texture: slot(material.emissive_texture),
        }
    }
}

/// Construction of a resource from its cached artifact.
///
/// `origin` is the recorded artifact path. Decoders use its extension to pick
/// a format and store it on the resource; the bytes may come from a pak
/// rather than from that file.
pub trait ArtifactLoad: Resource {
    /// Decodes an artifact already read into memory.
    fn decode_artifact(bytes: &[u8], origin: &Path) -> Result<Self, ArtifactError>;

    /// Reads and decodes the artifact at `path`.
    fn load_artifact(path: &Path) -> Result<Self, ArtifactError> {
        Self::decode_artifact(&read(path)?, path)
    }
}

fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|e| ArtifactError::io(path, e))
}

fn utf8<'a>(bytes: &'a [u8], origin: &Path) -> Result<&'a str, ArtifactError> {
    std::str::from_utf8(bytes).map_err(|_| ArtifactError::InvalidUtf8 {
        path: origin.to_path_buf(),
    })
}

impl ArtifactLoad for Texture {
    fn decode_artifact(bytes: &[u8], origin: &Path) -> Result<Self, ArtifactError> {
        decode_texture(bytes, origin)
    }
}

impl ArtifactLoad for Mesh {
    fn decode_artifact(bytes: &[u8], origin: &Path) -> Result<Self, ArtifactError> {
        decode_mesh(bytes, origin)
    }
}

impl ArtifactLoad for Script {
    fn decode_artifact(bytes: &[u8], origin: &Path) -> Result<Self, ArtifactError> {
        let source = utf8(decode_blob(bytes, origin)?, origin)?;
        Ok(Script::new(source, origin))
    }
}

impl ArtifactLoad for World {
    /// Accepts both the cached `.worldbin` form and a raw JSON file. The
    /// payload is not validated; an empty one yields an invalid world.
    fn decode_artifact(bytes: &[u8], origin: &Path) -> Result<Self, ArtifactError> {
        let payload = match extension_of(origin).as_deref() {
            Some("worldbin") => decode_blob(bytes, origin)?,
            _ => bytes,
        };
        Ok(World::new(String::from_utf8_lossy(payload), origin))
    }
}

impl ArtifactLoad for Material {
    fn decode_artifact(bytes: &[u8], origin: &Path) -> Result<Self, ArtifactError> {
        let document =
            MaterialDocument::parse(utf8(bytes, origin)?).map_err(|source| ArtifactError::Json {
                path: origin.to_path_buf(),
                source,
            })?;
        Ok(document.to_material(origin))
    }
}

impl ArtifactLoad for Shader {
    /// A single stage, picked by the extension of `origin`: `.frag` is the
    /// fragment stage, anything else the vertex stage.
    fn decode_artifact(bytes: &[u8], origin: &Path) -> Result<Self, ArtifactError> {
        if bytes.is_empty() {
            return Err(ArtifactError::MissingShaderStages(origin.to_path_buf()));
        }
        let source = utf8(bytes, origin)?.to_owned();
        let (vertex_source, fragment_source) = match extension_of(origin).as_deref() {
            Some("frag") => (String::new(), source),
            _ => (source, String::new()),
        };
        Ok(Shader {
            vertex_source,
            fragment_source,
            origin: origin.to_path_buf(),
        })
    }

    /// Loads the `<stem>.vert` / `<stem>.frag` pair next to `path`. A missing
    /// stage is left empty; at least one must exist.
    fn load_artifact(path: &Path) -> Result<Self, ArtifactError> {
        let stem = path
            .file_stem()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ArtifactError::corrupted(path, "shader path has no file stem"))?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));

        let stage = |ext: &str| -> Result<Option<String>, ArtifactError> {
            let mut name = stem.to_owned();
            name.push(".");
            name.push(ext);
            let stage_path = dir.join(name);
            if !stage_path.is_file() {
                return Ok(None);
            }
            fs::read_to_string(&stage_path)
                .map(Some)
                .map_err(|e| ArtifactError::io(&stage_path, e))
        };

        let vertex = stage("vert")?;
        let fragment = stage("frag")?;
        if vertex.is_none() && fragment.is_none() {
            return Err(ArtifactError::MissingShaderStages(path.to_path_buf()));
        }

        Ok(Shader {
            vertex_source: vertex.unwrap_or_default(),
            fragment_source: fragment.unwrap_or_default(),
            origin: path.to_path_buf(),
        })
    }
}
