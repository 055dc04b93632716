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

//! A layout given with relative roots, as a `Resources.toml` next to the
//! working directory produces. Kept in its own test binary because it changes
//! the process working directory.

use std::fs;
use tessera_core::asset::{Material, World};
use tessera_io::{AssetManager, ResourceConfig, SaveParams};

#[test]
fn test_save_and_reload_with_relative_roots() -> anyhow::Result<()> {
    // --- 1. SETUP ---
    let dir = tempfile::tempdir()?;
    std::env::set_current_dir(dir.path())?;

    let config = ResourceConfig::load("Resources.toml")?;
    assert!(config.cache_root.is_relative());
    assert!(config.project_resources_root.is_relative());

    let world_source = config.project_resources_root.join("Worlds/main.lworld");
    let material_source = config.project_resources_root.join("Materials/red.lmat");
    fs::create_dir_all(world_source.parent().unwrap())?;
    fs::create_dir_all(material_source.parent().unwrap())?;
    fs::write(&world_source, r#"{"v":1}"#)?;
    fs::write(&material_source, r#"{"name":"Red","albedoColor":[1,0,0]}"#)?;

    let mut manager = AssetManager::new(config.clone());
    manager.register_default_importers();
    manager.register_default_writers();
    let world_id = manager.import_file(&world_source)?.guid;
    let material_id = manager.import_file(&material_source)?.guid;
    let resources = manager.resource_manager();
    let before = resources.database().get(&world_id).unwrap();

    // --- 2. ACTION ---
    resources.load::<World>(world_id).unwrap();
    resources.load::<Material>(material_id).unwrap();
    let saved_world = resources.save(&world_id, &SaveParams::default());
    let saved_material = resources.save(&material_id, &SaveParams::default());
    resources.unload(&world_id);
    resources.unload(&material_id);

    // --- 3. ASSERT ---
    assert!(saved_world && saved_material);
    let after = resources.database().get(&world_id).unwrap();
    assert_eq!(after.imported_path, before.imported_path);
    assert!(config.cache_root.join(&after.imported_path).is_file());

    // Nothing lands in a cache directory nested under the project root.
    let nested = config.project_resources_root.join(&config.cache_root);
    assert!(!nested.exists());

    assert_eq!(resources.load::<World>(world_id).unwrap().json, r#"{"v":1}"#);
    assert_eq!(resources.load::<Material>(material_id).unwrap().name, "Red");
    Ok(())
}
