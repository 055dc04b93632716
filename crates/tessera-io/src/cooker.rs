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

//! Cooking: turning the imported cache into the content directory a shipped
//! build reads.
//!
//! A cooked content directory holds:
//!
//! - `Content.pak` (or the configured name): every artifact, see [`crate::pak`].
//! - Loose artifact copies, when no pak is made or when asked for.
//! - `AssetDatabase.runtime.json`: `{ "<guid>": { "type", "imported" } }`.
//! - `Content.manifest.json`: `{ "usePak", "pakName" }`.

use crate::config::ResourceConfig;
use crate::database::AssetDatabase;
use crate::error::CookError;
use crate::fs::{ensure_parent, resolve_under, write_atomic};
use crate::pak::PakBuilder;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tessera_core::asset::{AssetId, AssetInfo, AssetOrigin, AssetType};

/// File name of the runtime database in a content directory.
pub const RUNTIME_DATABASE_FILE: &str = "AssetDatabase.runtime.json";
/// File name of the content manifest.
pub const CONTENT_MANIFEST_FILE: &str = "Content.manifest.json";

/// What [`AssetCooker::cook`] produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookSettings {
    /// Pack every artifact into one archive.
    pub make_pak: bool,
    /// Also copy loose artifacts when a pak is made.
    pub copy_loose_alongside_pak: bool,
    /// Ship records of engine origin.
    pub include_engine_assets: bool,
    /// File name of the archive inside the content directory.
    pub pak_name: String,
}

impl Default for CookSettings {
    fn default() -> Self {
        Self {
            make_pak: true,
            copy_loose_alongside_pak: false,
            include_engine_assets: true,
            pak_name: "Content.pak".to_owned(),
        }
    }
}

/// One entry of the runtime database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeRecord {
    /// Kind of the asset.
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// The recorded artifact path.
    pub imported: String,
}

/// Tells a shipped build where to read its content from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentManifest {
    /// Whether the content is packed.
    pub use_pak: bool,
    /// The archive file name, meaningful when `use_pak` is set.
    pub pak_name: String,
}

/// Counts from one cook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CookReport {
    /// Entries written to the pak.
    pub packed: usize,
    /// Loose artifacts copied.
    pub copied: usize,
    /// Records written to the runtime database.
    pub runtime_records: usize,
}

impl fmt::Display for CookReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packed, {} copied, {} runtime records",
            self.packed, self.copied, self.runtime_records
        )
    }
}

/// Writes the content directory for the records of a database.
pub struct AssetCooker<'a> {
    database: &'a AssetDatabase,
    cache_root: PathBuf,
    content_root: PathBuf,
    settings: CookSettings,
}

impl<'a> AssetCooker<'a> {
    /// A cooker reading artifacts from the cache of `config` and writing to
    /// its content root, with default settings.
    pub fn new(database: &'a AssetDatabase, config: &ResourceConfig) -> Self {
        Self {
            database,
            cache_root: config.cache_root.clone(),
            content_root: config.content_root.clone(),
            settings: CookSettings::default(),
        }
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: CookSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The directory being written.
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Writes the pak, the loose copies and both JSON documents.
    ///
    /// A record whose artifact is missing is left out of the pak and of the
    /// loose copies with a warning, but still listed in the runtime database.
    pub fn cook(&self) -> Result<CookReport, CookError> {
        info!("Cooking content into '{}'", self.content_root.display());
        fs::create_dir_all(&self.content_root)
            .map_err(|e| CookError::io(&self.content_root, e))?;

        let records: Vec<AssetInfo> = self
            .database
            .all()
            .into_iter()
            .filter(|info| self.ships(info))
            .collect();
        let mut report = CookReport::default();

        if self.settings.make_pak {
            let pak = self.content_root.join(&self.settings.pak_name);
            report.packed = PakBuilder::new(&self.cache_root)
                .include_engine_assets(self.settings.include_engine_assets)
                .build(self.database, &pak)?;
        }
        if !self.settings.make_pak || self.settings.copy_loose_alongside_pak {
            report.copied = self.copy_loose(&records)?;
        }

        let runtime: BTreeMap<AssetId, RuntimeRecord> = records
            .iter()
            .map(|info| {
                let record = RuntimeRecord {
                    asset_type: info.asset_type,
                    imported: info.imported_path.clone(),
                };
                (info.guid, record)
            })
            .collect();
        report.runtime_records = runtime.len();
        self.write_json(RUNTIME_DATABASE_FILE, &runtime)?;

        let manifest = ContentManifest {
            use_pak: self.settings.make_pak,
            pak_name: self.settings.pak_name.clone(),
        };
        self.write_json(CONTENT_MANIFEST_FILE, &manifest)?;

        info!("Cooked '{}': {}", self.content_root.display(), report);
        Ok(report)
    }

    fn ships(&self, info: &AssetInfo) -> bool {
        info.is_storable()
            && (self.settings.include_engine_assets || info.origin != AssetOrigin::Engine)
    }

    fn copy_loose(&self, records: &[AssetInfo]) -> Result<usize, CookError> {
        let mut copied = 0;
        for info in records.iter().filter(|info| !info.imported_path.is_empty()) {
            let from = resolve_under(&self.cache_root, &info.imported_path);
            if !from.is_file() {
                warn!(
                    "Skipping {}: artifact '{}' is missing",
                    info.guid,
                    from.display()
                );
                continue;
            }

            let recorded = Path::new(&info.imported_path);
            let to = if recorded.is_absolute() {
                match recorded.file_name() {
                    Some(name) => self.content_root.join(name),
                    None => continue,
                }
            } else {
                self.content_root.join(recorded)
            };
            ensure_parent(&to).map_err(|e| CookError::io(&to, e))?;
            fs::copy(&from, &to).map_err(|e| CookError::io(&to, e))?;
            debug!("Copied '{}' to '{}'", from.display(), to.display());
            copied += 1;
        }
        Ok(copied)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), CookError> {
        let path = self.content_root.join(name);
        let text = serde_json::to_string_pretty(value).map_err(|source| CookError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, text.as_bytes()).map_err(|e| CookError::io(&path, e))
    }
}
