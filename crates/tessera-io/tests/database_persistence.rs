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

//! Persistence tests for the asset database.

use anyhow::Result;
use std::fs;
use tempfile::tempdir;
use tessera_core::asset::{AssetId, AssetInfo, AssetOrigin, AssetType};
use tessera_io::AssetDatabase;

fn sample_records() -> Vec<AssetInfo> {
    vec![
        AssetInfo {
            guid: AssetId::new("Materials/x.lmat"),
            asset_type: AssetType::Material,
            origin: AssetOrigin::Project,
            source_path: "Materials/x.lmat".into(),
            imported_path: "Materials/x.lmat".into(),
            dependencies: vec!["Textures/a.png".into(), "Textures/b.png".into()],
            source_timestamp: 1_700_000_000_123_456_789,
            imported_timestamp: 1_700_000_000_223_456_789,
            source_file_size: 120,
            imported_file_size: 340,
        },
        AssetInfo {
            guid: AssetId::new("Shaders/lit.vert"),
            asset_type: AssetType::Shader,
            origin: AssetOrigin::Engine,
            source_path: "Shaders/lit.vert".into(),
            imported_path: "Shaders/lit.vert".into(),
            dependencies: Vec::new(),
            ..Default::default()
        },
        AssetInfo {
            guid: AssetId::new("550e8400-e29b-41d4-a716-446655440000"),
            asset_type: AssetType::World,
            source_path: "Worlds/main.lworld".into(),
            imported_path: String::new(),
            ..Default::default()
        },
    ]
}

#[test]
fn test_save_then_load_reproduces_every_field() -> Result<()> {
    // --- 1. SETUP ---
    let dir = tempdir()?;
    let path = dir.path().join("nested").join("asset_database.json");
    let original = AssetDatabase::new();
    for record in sample_records() {
        original.upsert(record);
    }

    // --- 2. ACTION ---
    assert!(original.save(&path));
    let restored = AssetDatabase::new();
    assert!(restored.load(&path));

    // --- 3. ASSERT ---
    assert_eq!(restored.len(), sample_records().len());
    for record in sample_records() {
        assert_eq!(restored.get(&record.guid), Some(record));
    }
    Ok(())
}

#[test]
fn test_document_is_keyed_by_guid() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("db.json");
    let db = AssetDatabase::new();
    for record in sample_records() {
        db.upsert(record);
    }
    assert!(db.save(&path));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    let object = json.as_object().expect("database must be a JSON object");
    for record in sample_records() {
        let entry = &object[&record.guid.str()];
        assert_eq!(entry["guid"], record.guid.str());
        assert_eq!(entry["type"], u8::from(record.asset_type));
        assert_eq!(entry["source"], record.source_path);
    }
    Ok(())
}

#[test]
fn test_find_by_source_tolerates_separator_style() {
    let db = AssetDatabase::new();
    for record in sample_records() {
        db.upsert(record);
    }

    let forward = db.find_by_source("Materials/x.lmat");
    let backward = db.find_by_source("Materials\\x.lmat");
    assert!(forward.is_some());
    assert_eq!(forward, backward);
}

#[test]
fn test_loading_a_missing_file_fails_and_leaves_database_empty() {
    let db = AssetDatabase::new();
    for record in sample_records() {
        db.upsert(record);
    }

    assert!(!db.load("nonexistent.json"));
    assert_eq!(db.len(), 0);
}

#[test]
fn test_minimal_records_load_with_defaults() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("db.json");
    let id = AssetId::new("Scripts/ai.lua");
    fs::write(
        &path,
        format!(
            r#"{{ "{id}": {{ "guid": "{id}", "type": 6, "source": "Scripts/ai.lua", "imported": "Scripts/x.luabin" }} }}"#
        ),
    )?;

    let db = AssetDatabase::new();
    assert!(db.load(&path));
    let info = db.get(&id).expect("record must load");
    assert_eq!(info.asset_type, AssetType::Script);
    assert_eq!(info.origin, AssetOrigin::Project);
    assert!(info.dependencies.is_empty());
    assert_eq!(info.source_timestamp, 0);
    Ok(())
}

#[test]
fn test_every_accepted_record_survives_a_round_trip() -> Result<()> {
    // --- 1. SETUP ---
    let dir = tempdir()?;
    let path = dir.path().join("db.json");
    let db = AssetDatabase::new();
    let sourceless = AssetInfo {
        guid: AssetId::random(),
        asset_type: AssetType::Material,
        ..Default::default()
    };
    let script = AssetInfo {
        guid: AssetId::new("a.lua"),
        asset_type: AssetType::Script,
        source_path: "a.lua".into(),
        ..Default::default()
    };

    // --- 2. ACTION ---
    let accepted = [db.upsert(sourceless.clone()), db.upsert(script.clone())];
    assert!(db.save(&path));
    let restored = AssetDatabase::new();
    assert!(restored.load(&path));

    // --- 3. ASSERT ---
    assert_eq!(accepted, [false, true]);
    assert_eq!(restored.len(), db.len());
    assert_eq!(restored.get(&script.guid), Some(script));
    assert!(restored.get(&sourceless.guid).is_none());
    Ok(())
}
