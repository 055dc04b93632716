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
use crate::artifact::{encode_mesh, MAX_MESH_INDICES, MAX_MESH_VERTICES};
use crate::error::ImportError;
use std::path::Path;
use tessera_core::asset::{AssetInfo, AssetType, MeshVertex};

/// Imports Wavefront `.obj` meshes into `.meshbin` artifacts.
///
/// Faces are triangulated and vertices are de-duplicated on their
/// position/normal/uv index triple. All models in the file are merged. Missing
/// normals or texture coordinates are written as zeros so the artifact layout
/// is always complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshImporter;

impl AssetImporter for MeshImporter {
    fn extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }

    fn asset_type(&self) -> AssetType {
        AssetType::Mesh
    }

    fn import(&self, source: &Path, cache_root: &Path) -> Result<AssetInfo, ImportError> {
        let info = begin_import(source, AssetType::Mesh)?;

        let (models, _materials) = tobj::load_obj(
            source,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|e| ImportError::Obj {
            path: source.to_path_buf(),
            source: e,
        })?;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for model in &models {
            let mesh = &model.mesh;
            let base = vertices.len() as u32;
            let count = mesh.positions.len() / 3;
            for i in 0..count {
                let normal = if mesh.normals.len() >= (i + 1) * 3 {
                    [mesh.normals[i * 3], mesh.normals[i * 3 + 1], mesh.normals[i * 3 + 2]]
                } else {
                    [0.0; 3]
                };
                let uv = if mesh.texcoords.len() >= (i + 1) * 2 {
                    [mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1]]
                } else {
                    [0.0; 2]
                };
                vertices.push(MeshVertex {
                    position: [
                        mesh.positions[i * 3],
                        mesh.positions[i * 3 + 1],
                        mesh.positions[i * 3 + 2],
                    ],
                    normal,
                    uv,
                });
            }
            indices.extend(mesh.indices.iter().map(|&i| base + i));
        }

        if vertices.is_empty() || indices.is_empty() {
            return Err(ImportError::Empty {
                path: source.to_path_buf(),
                reason: "no triangles",
            });
        }
        if vertices.len() > MAX_MESH_VERTICES as usize || indices.len() > MAX_MESH_INDICES as usize
        {
            return Err(ImportError::TooLarge {
                path: source.to_path_buf(),
                what: "mesh size",
            });
        }

        let artifact = artifact_path(cache_root, "Meshes", info.guid, "meshbin");
        finish_import(info, &artifact, &encode_mesh(&vertices, &indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::decode_mesh;
    use std::fs;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn test_quad_is_triangulated_and_padded() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("quad.obj");
        fs::write(&source, QUAD).unwrap();

        let info = MeshImporter.import(&source, dir.path()).unwrap();
        let bytes = fs::read(&info.imported_path).unwrap();
        let mesh = decode_mesh(&bytes, Path::new(&info.imported_path)).unwrap();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
        assert_eq!(mesh.aabb_max, [1.0, 1.0, 0.0]);
        assert_eq!(info.imported_file_size, bytes.len() as u64);
    }

    #[test]
    fn test_file_without_faces_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("points.obj");
        fs::write(&source, "v 0 0 0\nv 1 0 0\n").unwrap();

        assert!(MeshImporter.import(&source, dir.path()).is_err());
    }
}
