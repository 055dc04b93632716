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

//! Cooking a content directory and loading resources back from its pak.

mod common;

use common::{Sandbox, TEST_MATERIAL, TRIANGLE_OBJ};
use std::fs;
use tessera_core::asset::{Material, Mesh, Script};
use tessera_io::{AssetCooker, PakReader};

#[test]
fn test_mounted_pak_serves_artifacts_gone_from_the_cache() -> anyhow::Result<()> {
    // --- 1. SETUP ---
    let sandbox = Sandbox::new();
    sandbox.project_file("Materials/m.lmat", TEST_MATERIAL);
    sandbox.project_file("Meshes/tri.obj", TRIANGLE_OBJ);
    sandbox.engine_file("Scripts/boot.lua", "return 'boot'");
    let manager = sandbox.manager();
    manager.scan_and_import_all();
    let db = manager.database();
    let material_id = db.find_by_source("Materials/m.lmat").unwrap().guid;
    let mesh_id = db.find_by_source("Meshes/tri.obj").unwrap().guid;
    let script_id = db.find_by_source("Scripts/boot.lua").unwrap().guid;

    let report = AssetCooker::new(db, &sandbox.config).cook()?;
    assert_eq!(report.packed, 3);
    fs::remove_dir_all(&sandbox.config.cache_root)?;

    // --- 2. ACTION ---
    let resources = manager.resource_manager();
    assert!(resources.load::<Script>(script_id).is_none());
    assert!(resources.mount_pak(sandbox.config.content_root.join("Content.pak")));

    // --- 3. ASSERT ---
    assert_eq!(resources.load::<Script>(script_id).unwrap().source, "return 'boot'");
    assert_eq!(resources.load::<Material>(material_id).unwrap().name, "TestMaterial");
    assert_eq!(resources.load::<Mesh>(mesh_id).unwrap().indices.len(), 3);
    Ok(())
}

#[test]
fn test_ids_missing_from_the_pak_still_load_from_the_cache() {
    let sandbox = Sandbox::new();
    sandbox.project_file("Scripts/a.lua", "a = 1");
    let manager = sandbox.manager();
    manager.scan_and_import_all();
    let db = manager.database();
    let packed_id = db.find_by_source("Scripts/a.lua").unwrap().guid;
    AssetCooker::new(db, &sandbox.config).cook().unwrap();

    let later = sandbox.project_file("Scripts/b.lua", "b = 2");
    let loose_id = manager.import_file(&later).unwrap().guid;

    let resources = manager.resource_manager();
    assert!(resources.mount_pak(sandbox.config.content_root.join("Content.pak")));
    assert!(resources.is_pak_mounted());
    assert_eq!(resources.load::<Script>(loose_id).unwrap().source, "b = 2");
    assert_eq!(resources.load::<Script>(packed_id).unwrap().source, "a = 1");

    let pak = PakReader::open(sandbox.config.content_root.join("Content.pak")).unwrap();
    assert!(pak.contains(&packed_id));
    assert!(!pak.contains(&loose_id));
}

#[test]
fn test_pak_entries_still_need_a_database_record() {
    let sandbox = Sandbox::new();
    sandbox.project_file("Scripts/a.lua", "a = 1");
    let manager = sandbox.manager();
    manager.scan_and_import_all();
    let db = manager.database();
    let id = db.find_by_source("Scripts/a.lua").unwrap().guid;
    AssetCooker::new(db, &sandbox.config).cook().unwrap();

    let resources = manager.resource_manager();
    assert!(resources.mount_pak(sandbox.config.content_root.join("Content.pak")));
    db.remove(&id);
    assert!(resources.load::<Script>(id).is_none());
}

#[test]
fn test_failed_mount_leaves_nothing_mounted() {
    let sandbox = Sandbox::new();
    sandbox.project_file("Scripts/a.lua", "a = 1");
    let manager = sandbox.manager();
    manager.scan_and_import_all();
    AssetCooker::new(manager.database(), &sandbox.config).cook().unwrap();

    let resources = manager.resource_manager();
    assert!(resources.mount_pak(sandbox.config.content_root.join("Content.pak")));
    assert!(!resources.mount_pak(sandbox.dir.path().join("missing.pak")));
    assert!(!resources.is_pak_mounted());

    assert!(resources.mount_pak(sandbox.config.content_root.join("Content.pak")));
    resources.unmount_pak();
    assert!(!resources.is_pak_mounted());
}
