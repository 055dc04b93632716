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

//! The persisted table of imported assets.

use crate::fs::ensure_parent;
use ahash::AHashMap;
use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tessera_core::asset::{normalize_path, AssetId, AssetInfo, AssetOrigin};

#[derive(Default)]
struct Tables {
    assets: AHashMap<AssetId, AssetInfo>,
    by_source: AHashMap<String, AssetId>,
}

impl Tables {
    fn insert(&mut self, info: AssetInfo) {
        if let Some(previous) = self.assets.get(&info.guid) {
            let stale = normalize_path(&previous.source_path);
            if self.by_source.get(&stale) == Some(&info.guid) {
                self.by_source.remove(&stale);
            }
        }
        self.by_source
            .insert(normalize_path(&info.source_path), info.guid);
        self.assets.insert(info.guid, info);
    }

    fn remove(&mut self, id: &AssetId) -> bool {
        let Some(info) = self.assets.remove(id) else {
            return false;
        };
        let key = normalize_path(&info.source_path);
        if self.by_source.get(&key) == Some(id) {
            self.by_source.remove(&key);
        }
        true
    }

    fn clear(&mut self) {
        self.assets.clear();
        self.by_source.clear();
    }
}

/// A thread-safe mapping from [`AssetId`] to [`AssetInfo`], indexed by
/// normalized source path and persisted as JSON.
///
/// The on-disk form is a single JSON object keyed by the canonical id string,
/// each value being one `AssetInfo` record.
///
/// Every public operation holds the internal lock for its whole duration,
/// including the file I/O of [`load`](Self::load) and [`save`](Self::save).
/// Iteration ([`for_each`](Self::for_each) and friends) runs over a snapshot,
/// so callbacks may freely call back into the database.
#[derive(Default)]
pub struct AssetDatabase {
    tables: RwLock<Tables>,
}

impl AssetDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the record for `info.guid`.
    ///
    /// Records with an empty id or an empty source path are rejected with a
    /// warning, the same rule [`load`](Self::load) applies. Returns `true` if
    /// the record was stored.
    pub fn upsert(&self, info: AssetInfo) -> bool {
        if !info.is_storable() {
            warn!(
                "Ignoring asset record {} with an empty id or source path ('{}')",
                info.guid, info.source_path
            );
            return false;
        }
        self.write().insert(info);
        true
    }

    /// Returns a copy of the record for `id`.
    pub fn get(&self, id: &AssetId) -> Option<AssetInfo> {
        self.read().assets.get(id).cloned()
    }

    /// Looks a record up by source path. Separator style does not matter.
    pub fn find_by_source(&self, source: &str) -> Option<AssetInfo> {
        let tables = self.read();
        let id = tables.by_source.get(&normalize_path(source))?;
        tables.assets.get(id).cloned()
    }

    /// Returns `true` if a record exists for `id`.
    pub fn contains(&self, id: &AssetId) -> bool {
        self.read().assets.contains_key(id)
    }

    /// Removes the record for `id`. Returns `true` if one was present.
    pub fn remove(&self, id: &AssetId) -> bool {
        self.write().remove(id)
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.read().assets.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of every record, ordered by id.
    pub fn all(&self) -> Vec<AssetInfo> {
        let mut records: Vec<AssetInfo> = self.read().assets.values().cloned().collect();
        records.sort_by(|a, b| a.guid.cmp(&b.guid));
        records
    }

    /// Calls `f` for every record of a consistent snapshot.
    pub fn for_each(&self, f: impl FnMut(&AssetInfo)) {
        self.all().iter().for_each(f);
    }

    /// Calls `f` for every record of `origin` in a consistent snapshot.
    pub fn for_each_by_origin(&self, origin: AssetOrigin, mut f: impl FnMut(&AssetInfo)) {
        for info in self.get_by_origin(origin) {
            f(&info);
        }
    }

    /// Every record of `origin`, ordered by id.
    pub fn get_by_origin(&self, origin: AssetOrigin) -> Vec<AssetInfo> {
        let mut records: Vec<AssetInfo> = self
            .read()
            .assets
            .values()
            .filter(|info| info.origin == origin)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.guid.cmp(&b.guid));
        records
    }

    /// Replaces the contents with the records stored at `path`.
    ///
    /// Returns `false` and leaves the database empty if the file is missing
    /// or is not a JSON object. Individual records that fail to decode, or
    /// that lack an id or a source path, are skipped with a warning.
    pub fn load(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let mut tables = self.write();
        tables.clear();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Cannot open asset database '{}': {}", path.display(), e);
                return false;
            }
        };

        let document = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                error!("Asset database '{}' is not a JSON object", path.display());
                return false;
            }
            Err(e) => {
                error!("Failed to parse asset database '{}': {}", path.display(), e);
                return false;
            }
        };

        let mut skipped = 0usize;
        for (key, value) in document {
            match serde_json::from_value::<AssetInfo>(value) {
                Ok(info) if info.is_storable() => tables.insert(info),
                Ok(_) => {
                    warn!("Skipping asset record '{}': empty id or source path", key);
                    skipped += 1;
                }
                Err(e) => {
                    warn!("Skipping malformed asset record '{}': {}", key, e);
                    skipped += 1;
                }
            }
        }

        info!(
            "Loaded {} asset record(s) from '{}' ({} skipped)",
            tables.assets.len(),
            path.display(),
            skipped
        );
        true
    }

    /// Writes every record to `path` as pretty-printed JSON, creating the
    /// parent directory if needed. Returns `false` on any failure.
    pub fn save(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let tables = self.read();

        let mut records: Vec<&AssetInfo> = tables.assets.values().collect();
        records.sort_by(|a, b| a.guid.cmp(&b.guid));

        let mut document = Map::with_capacity(records.len());
        for info in records {
            match serde_json::to_value(info) {
                Ok(value) => {
                    document.insert(info.guid.str(), value);
                }
                Err(e) => {
                    error!("Failed to serialize asset record {}: {}", info.guid, e);
                    return false;
                }
            }
        }

        let text = match serde_json::to_string_pretty(&Value::Object(document)) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to serialize asset database: {}", e);
                return false;
            }
        };

        if let Err(e) = ensure_parent(path).and_then(|()| fs::write(path, text)) {
            error!("Failed to write asset database '{}': {}", path.display(), e);
            return false;
        }

        debug!(
            "Saved {} asset record(s) to '{}'",
            tables.assets.len(),
            path.display()
        );
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::asset::AssetType;

    fn record(source: &str) -> AssetInfo {
        AssetInfo {
            guid: AssetId::new(source),
            asset_type: AssetType::Material,
            source_path: source.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_upsert_then_get_and_find() {
        let db = AssetDatabase::new();
        let info = record("Materials/x.lmat");
        assert!(db.upsert(info.clone()));

        assert_eq!(db.get(&info.guid), Some(info.clone()));
        assert_eq!(db.find_by_source("Materials/x.lmat"), Some(info.clone()));
        assert_eq!(db.find_by_source("Materials\\x.lmat"), Some(info));
    }

    #[test]
    fn test_empty_guid_is_rejected() {
        let db = AssetDatabase::new();
        assert!(!db.upsert(AssetInfo {
            source_path: "a.lua".into(),
            ..Default::default()
        }));
        assert!(db.is_empty());
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let db = AssetDatabase::new();
        let info = AssetInfo {
            guid: AssetId::random(),
            ..Default::default()
        };
        assert!(!db.upsert(info.clone()));
        assert!(!db.contains(&info.guid));
        assert!(db.find_by_source("").is_none());
    }

    #[test]
    fn test_source_change_drops_stale_index_entry() {
        let db = AssetDatabase::new();
        let mut info = record("Old/a.lmat");
        db.upsert(info.clone());

        info.source_path = "New/a.lmat".into();
        db.upsert(info.clone());

        assert!(db.find_by_source("Old/a.lmat").is_none());
        assert_eq!(db.find_by_source("New/a.lmat").unwrap().guid, info.guid);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_remove_drops_index_entry() {
        let db = AssetDatabase::new();
        let info = record("Scripts/a.lua");
        db.upsert(info.clone());

        assert!(db.remove(&info.guid));
        assert!(!db.remove(&info.guid));
        assert!(db.find_by_source("Scripts/a.lua").is_none());
    }

    #[test]
    fn test_by_origin() {
        let db = AssetDatabase::new();
        let mut engine = record("Shaders/lit.vert");
        engine.origin = AssetOrigin::Engine;
        db.upsert(engine.clone());
        db.upsert(record("Materials/a.lmat"));
        db.upsert(record("Materials/b.lmat"));

        assert_eq!(db.get_by_origin(AssetOrigin::Engine), vec![engine]);
        let mut count = 0;
        db.for_each_by_origin(AssetOrigin::Project, |_| count += 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_for_each_may_reenter() {
        let db = AssetDatabase::new();
        db.upsert(record("a.lua"));
        db.upsert(record("b.lua"));

        db.for_each(|info| {
            assert!(db.get(&info.guid).is_some());
            db.upsert(record(&format!("copy/{}", info.source_path)));
        });
        assert_eq!(db.len(), 4);
    }

    #[test]
    fn test_malformed_document_leaves_database_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{ not json").unwrap();

        let db = AssetDatabase::new();
        db.upsert(record("a.lua"));
        assert!(!db.load(&path));
        assert!(db.is_empty());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(!db.load(&path));
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let good = AssetId::new("Textures/t.png");
        fs::write(
            &path,
            format!(
                r#"{{
                    "{good}": {{ "guid": "{good}", "type": 1, "source": "Textures/t.png", "imported": "" }},
                    "bad-type": {{ "guid": "{good}", "type": "texture" }},
                    "no-source": {{ "guid": "{}", "type": 1, "source": "", "imported": "" }}
                }}"#,
                AssetId::random()
            ),
        )
        .unwrap();

        let db = AssetDatabase::new();
        assert!(db.load(&path));
        assert_eq!(db.len(), 1);
        assert!(db.get(&good).is_some());
    }
}
