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

//! Writers and the save paths of the resource manager.

mod common;

use common::{Sandbox, TEST_MATERIAL};
use std::path::PathBuf;
use tessera_core::asset::{
    AnyResource, AssetHandle, AssetId, AssetOrigin, AssetType, Material, Resource, World,
};
use tessera_io::artifact::ArtifactLoad;
use tessera_io::writer::{AssetWriter, MaterialWriter, WorldWriter, WriterContext};
use tessera_io::{SaveParams, WriteError};

fn context(sandbox: &Sandbox) -> WriterContext {
    sandbox.config.writer_context()
}

#[test]
fn test_material_writer_output_loads_back() {
    let sandbox = Sandbox::new();
    let material = Material {
        name: "Copper".into(),
        albedo_color: [0.9, 0.5, 0.3, 1.0],
        metallic: 1.0,
        roughness: 0.25,
        albedo_texture: AssetId::new("Textures/copper.png"),
        ..Default::default()
    };
    let resource = Material::into_any(AssetHandle::new(material.clone()));

    let written = sandbox.config.project_resources_root.join("Materials/copper.lmat");
    MaterialWriter
        .write(&resource, &written, &context(&sandbox))
        .unwrap();

    let loaded = Material::load_artifact(&written).unwrap();
    assert_eq!(loaded.name, material.name);
    assert_eq!(loaded.albedo_color, material.albedo_color);
    assert_eq!(loaded.metallic, material.metallic);
    assert_eq!(loaded.roughness, material.roughness);
    assert_eq!(loaded.albedo_texture, material.albedo_texture);
    assert!(loaded.normal_texture.is_empty());
}

#[test]
fn test_world_writer_handles_both_forms() {
    let sandbox = Sandbox::new();
    let ctx = context(&sandbox);
    let json = r#"{"entities":[{"name":"Camera"}]}"#;
    let resource = World::into_any(AssetHandle::new(World::new(json, "")));

    for name in ["Worlds/a.lworld", "Worlds/a.worldbin"] {
        let target = ctx.resolve(name.as_ref());
        WorldWriter.write(&resource, &target, &ctx).unwrap();
        let loaded = World::load_artifact(&target).unwrap();
        assert_eq!(loaded.json, json, "{name}");
        assert!(loaded.is_valid());
    }
}

#[test]
fn test_writers_refuse_without_touching_the_target() {
    let sandbox = Sandbox::new();
    let ctx = context(&sandbox);

    let empty = World::into_any(AssetHandle::new(World::new("", "")));
    let target = ctx.resolve("Worlds/empty.lworld".as_ref());
    assert!(matches!(
        WorldWriter.write(&empty, &target, &ctx),
        Err(WriteError::InvalidResource(_))
    ));
    assert!(!target.exists());

    let world = World::into_any(AssetHandle::new(World::new("{}", "")));
    let target = ctx.resolve("Materials/w.lmat".as_ref());
    assert!(matches!(
        MaterialWriter.write(&world, &target, &ctx),
        Err(WriteError::TypeMismatch {
            expected: AssetType::Material,
            found: AssetType::World,
        })
    ));
    assert!(!target.exists());
}

#[test]
fn test_save_as_registers_a_loadable_copy() {
    let sandbox = Sandbox::new();
    let source = sandbox.project_file("Materials/base.lmat", TEST_MATERIAL);
    let manager = sandbox.manager();
    let id = manager.import_file(&source).unwrap().guid;
    let resources = manager.resource_manager();
    resources.load::<Material>(id).unwrap();

    let explicit = AssetId::new("7d444840-9dc0-11d1-b245-5ffdce74fad2");
    let params = SaveParams {
        explicit_guid: Some(explicit),
        origin_override: Some(AssetOrigin::Engine),
        ..Default::default()
    };
    let new_id = resources
        .save_as(&id, "Materials/Generated/copy.lmat", &params)
        .expect("save_as succeeds");
    assert_eq!(new_id, explicit);

    let record = resources.database().get(&new_id).unwrap();
    assert_eq!(record.asset_type, AssetType::Material);
    assert_eq!(record.origin, AssetOrigin::Engine);
    assert_eq!(record.source_path, "Materials/Generated/copy.lmat");

    let copy = resources.load::<Material>(new_id).unwrap();
    assert_eq!(copy.name, "TestMaterial");
    assert_eq!(copy.albedo_color, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_save_as_without_guid_uses_a_random_one() {
    let sandbox = Sandbox::new();
    let source = sandbox.project_file("Worlds/level.lworld", r#"{"level":1}"#);
    let manager = sandbox.manager();
    let id = manager.import_file(&source).unwrap().guid;
    let resources = manager.resource_manager();
    resources.load::<World>(id).unwrap();

    let a = resources
        .save_as(&id, "Worlds/level_a.lworld", &SaveParams::default())
        .unwrap();
    let b = resources
        .save_as(&id, "Worlds/level_b.lworld", &SaveParams::default())
        .unwrap();
    assert_ne!(a, b);
    assert!(!a.is_empty());
    assert_eq!(resources.load::<World>(a).unwrap().json, r#"{"level":1}"#);
}

#[test]
fn test_save_rewrites_the_artifact_and_refreshes_the_record() {
    let sandbox = Sandbox::new();
    let source = sandbox.project_file("Worlds/main.lworld", r#"{"v":1}"#);
    let manager = sandbox.manager();
    let id = manager.import_file(&source).unwrap().guid;
    let resources = manager.resource_manager();
    resources.load::<World>(id).unwrap();

    let before = resources.database().get(&id).unwrap();
    assert!(resources.save(&id, &SaveParams::default()));
    let after = resources.database().get(&id).unwrap();
    assert_eq!(after.imported_path, before.imported_path);
    assert_eq!(after.source_path, before.source_path);

    // The rewritten artifact still decodes.
    resources.unload(&id);
    assert_eq!(resources.load::<World>(id).unwrap().json, r#"{"v":1}"#);
}

#[test]
fn test_save_to_override_leaves_the_record_alone_when_asked() {
    let sandbox = Sandbox::new();
    let source = sandbox.project_file("Materials/m.lmat", TEST_MATERIAL);
    let manager = sandbox.manager();
    let id = manager.import_file(&source).unwrap().guid;
    let resources = manager.resource_manager();
    resources.load::<Material>(id).unwrap();

    let target: PathBuf = sandbox.dir.path().join("export/m.lmat");
    let params = SaveParams {
        target_path_override: Some(target.clone()),
        update_database: false,
        ..Default::default()
    };
    let before = resources.database().get(&id).unwrap();
    assert!(resources.save(&id, &params));
    assert!(target.exists());
    assert_eq!(resources.database().get(&id).unwrap(), before);
}

#[test]
fn test_saving_what_is_not_loaded_fails() {
    let sandbox = Sandbox::new();
    let resources = sandbox.manager().resource_manager();
    let id = AssetId::new("Worlds/ghost.lworld");

    assert!(!resources.save(&id, &SaveParams::default()));
    assert!(resources.save_as(&id, "Worlds/ghost2.lworld", &SaveParams::default()).is_none());
}

#[test]
fn test_empty_world_loads_invalid_and_cannot_be_saved() {
    let sandbox = Sandbox::new();
    let source = sandbox.project_file("Worlds/empty.lworld", "");
    let manager = sandbox.manager();
    let id = manager.import_file(&source).unwrap().guid;
    let resources = manager.resource_manager();

    let world = resources.load::<World>(id).unwrap();
    assert!(!world.is_valid());
    assert!(!resources.save(&id, &SaveParams::default()));
    assert!(matches!(resources.get_loaded(&id), Some(AnyResource::World(_))));
}

#[test]
fn test_save_resource_as_stores_a_resource_never_loaded() {
    // --- 1. SETUP ---
    let sandbox = Sandbox::new();
    let resources = sandbox.manager().resource_manager();
    let world = World::into_any(AssetHandle::new(World::new(r#"{"made":"here"}"#, "")));

    // --- 2. ACTION ---
    let id = resources
        .save_resource_as(&world, "Worlds/fresh.lworld", &SaveParams::default())
        .expect("save_resource_as succeeds");

    // --- 3. ASSERT ---
    let record = resources.database().get(&id).unwrap();
    assert_eq!(record.asset_type, AssetType::World);
    assert_eq!(record.origin, AssetOrigin::Project);
    assert_eq!(record.source_path, "Worlds/fresh.lworld");
    assert!(sandbox
        .config
        .project_resources_root
        .join("Worlds/fresh.lworld")
        .is_file());
    assert_eq!(resources.loaded_count(), 0);
    assert_eq!(resources.load::<World>(id).unwrap().json, r#"{"made":"here"}"#);

    let empty = World::into_any(AssetHandle::new(World::new("", "")));
    assert!(resources
        .save_resource_as(&empty, "Worlds/nothing.lworld", &SaveParams::default())
        .is_none());
}
