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

/// One interleaved mesh vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Vertex normal. Zero when the source had none.
    pub normal: [f32; 3],
    /// Texture coordinate. Zero when the source had none.
    pub uv: [f32; 2],
}

/// Indexed triangle geometry loaded from a `.meshbin` artifact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Unique vertices.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
    /// Minimum corner of the bounding box.
    pub aabb_min: [f32; 3],
    /// Maximum corner of the bounding box.
    pub aabb_max: [f32; 3],
    /// Path of the artifact this mesh was read from.
    pub origin: PathBuf,
}

impl Mesh {
    /// Builds a mesh and computes its bounding box.
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>, origin: impl Into<PathBuf>) -> Self {
        let (aabb_min, aabb_max) = bounds(&vertices);
        Self {
            vertices,
            indices,
            aabb_min,
            aabb_max,
            origin: origin.into(),
        }
    }
}

fn bounds(vertices: &[MeshVertex]) -> ([f32; 3], [f32; 3]) {
    if vertices.is_empty() {
        return ([0.0; 3], [0.0; 3]);
    }
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for v in vertices {
        for axis in 0..3 {
            min[axis] = min[axis].min(v.position[axis]);
            max[axis] = max[axis].max(v.position[axis]);
        }
    }
    (min, max)
}

impl_resource!(Mesh, Mesh, AssetType::Mesh, |m| !m.vertices.is_empty()
    && !m.indices.is_empty());

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex {
            position: [x, y, z],
            ..Default::default()
        }
    }

    #[test]
    fn test_aabb_covers_all_vertices() {
        let mesh = Mesh::new(
            vec![vertex(-1.0, 0.0, 2.0), vertex(3.0, -4.0, 0.5), vertex(0.0, 1.0, -2.0)],
            vec![0, 1, 2],
            "a.meshbin",
        );
        assert_eq!(mesh.aabb_min, [-1.0, -4.0, -2.0]);
        assert_eq!(mesh.aabb_max, [3.0, 1.0, 2.0]);
        assert!(crate::asset::Resource::is_valid(&mesh));
    }

    #[test]
    fn test_empty_mesh_is_invalid() {
        let mesh = Mesh::new(Vec::new(), Vec::new(), "empty.meshbin");
        assert_eq!(mesh.aabb_min, [0.0; 3]);
        assert!(!crate::asset::Resource::is_valid(&mesh));
    }
}
