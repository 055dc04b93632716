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

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tessera_io::{AssetManager, ResourceConfig};

/// A throw-away project with engine and project resource roots.
pub struct Sandbox {
    pub dir: TempDir,
    pub config: ResourceConfig,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = ResourceConfig::from_root(dir.path());
        fs::create_dir_all(&config.engine_resources_root).expect("engine root");
        fs::create_dir_all(&config.project_resources_root).expect("project root");
        Self { dir, config }
    }

    /// Writes a file under the project root and returns its full path.
    pub fn project_file(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        write(&self.config.project_resources_root, relative, contents)
    }

    /// Writes a file under the engine root and returns its full path.
    pub fn engine_file(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        write(&self.config.engine_resources_root, relative, contents)
    }

    /// An asset manager with the built-in importers and writers.
    pub fn manager(&self) -> AssetManager {
        let mut manager = AssetManager::new(self.config.clone());
        manager.register_default_importers();
        manager.register_default_writers();
        manager
    }
}

fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(&path, contents).expect("write file");
    path
}

pub const TEST_MATERIAL: &str =
    r#"{"name":"TestMaterial","albedoColor":[1,0,0,1],"roughness":0.5,"metallic":0}"#;

pub const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";
