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

//! Drives importers over the resource roots and owns the asset database.

use crate::config::ResourceConfig;
use crate::database::AssetDatabase;
use crate::error::ImportError;
use crate::fs::{generic_string, relative_to, resolve_under, FileStamp};
use crate::importer::{AssetImporter, ImporterHub};
use crate::resource_manager::ResourceManager;
use crate::writer::{AssetWriter, WriterHub};
use log::{debug, error, info, trace, warn};
use std::fmt;
use std::ops::AddAssign;
use std::path::Path;
use std::sync::Arc;
use tessera_core::asset::{AssetId, AssetInfo, AssetOrigin};
use walkdir::WalkDir;

/// Outcome of a scan over one or more resource roots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Files with a registered importer.
    pub found: usize,
    /// Files (re-)imported successfully.
    pub imported: usize,
    /// Files left alone because they did not change since their last import.
    pub skipped: usize,
    /// Files whose import failed.
    pub failed: usize,
}

impl AddAssign for ScanReport {
    fn add_assign(&mut self, rhs: Self) {
        self.found += rhs.found;
        self.imported += rhs.imported;
        self.skipped += rhs.skipped;
        self.failed += rhs.failed;
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found {}, imported {}, skipped {}, failed {}",
            self.found, self.imported, self.skipped, self.failed
        )
    }
}

/// Owns the [`AssetDatabase`] and keeps it in sync with the resource roots.
///
/// Records produced through the manager are normalized: `source_path` is
/// relative to the resource root the file lives under, `guid` is derived from
/// that relative path, `origin` names the root, and `imported_path` is
/// relative to the cache root.
pub struct AssetManager {
    config: ResourceConfig,
    database: Arc<AssetDatabase>,
    importers: ImporterHub,
    writers: WriterHub,
}

impl AssetManager {
    /// Creates a manager with an empty database and no importers or writers.
    pub fn new(config: ResourceConfig) -> Self {
        Self::with_database(config, Arc::new(AssetDatabase::new()))
    }

    /// Creates a manager around an existing database.
    pub fn with_database(config: ResourceConfig, database: Arc<AssetDatabase>) -> Self {
        Self {
            config,
            database,
            importers: ImporterHub::new(),
            writers: WriterHub::new(),
        }
    }

    /// The configured layout.
    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// The owned database.
    pub fn database(&self) -> &Arc<AssetDatabase> {
        &self.database
    }

    /// The registered importers.
    pub fn importers(&self) -> &ImporterHub {
        &self.importers
    }

    /// The registered writers.
    pub fn writers(&self) -> &WriterHub {
        &self.writers
    }

    /// Registers an additional importer.
    pub fn register_importer(&mut self, importer: Arc<dyn AssetImporter>) {
        self.importers.register_importer(importer);
    }

    /// Registers the built-in importers.
    pub fn register_default_importers(&mut self) {
        self.importers.register_defaults();
        info!("Registered {} default importer(s)", self.importers.len());
    }

    /// Registers an additional writer.
    pub fn register_writer(&mut self, writer: Arc<dyn AssetWriter>) {
        self.writers.register_writer(writer);
    }

    /// Registers the built-in writers.
    pub fn register_default_writers(&mut self) {
        for kind in crate::writer::DEFAULT_WRITERS {
            self.writers.register_writer(kind.create());
        }
        info!("Registered {} default writer(s)", self.writers.len());
    }

    /// Loads the database, registers the built-in importers and writers, and
    /// scans both resource roots.
    pub fn startup(&mut self) -> ScanReport {
        info!("Starting up asset manager...");
        if !self.load_database() {
            warn!(
                "No usable asset database at '{}', starting empty",
                self.config.database_path.display()
            );
        }
        if self.importers.is_empty() {
            self.register_default_importers();
        }
        if self.writers.is_empty() {
            self.register_default_writers();
        }
        self.scan_and_import_all()
    }

    /// Persists the database.
    pub fn shutdown(&self) -> bool {
        info!("Shutting down asset manager...");
        self.save_database()
    }

    /// Replaces the database contents with the persisted file.
    pub fn load_database(&self) -> bool {
        self.database.load(&self.config.database_path)
    }

    /// Persists the database to the configured path.
    pub fn save_database(&self) -> bool {
        self.database.save(&self.config.database_path)
    }

    /// Scans the engine root, then the project root.
    pub fn scan_and_import_all(&self) -> ScanReport {
        let mut report = self.scan_and_import_all_in(&self.config.engine_resources_root);
        report += self.scan_and_import_all_in(&self.config.project_resources_root);
        info!("Asset scan complete: {}", report);
        report
    }

    /// Recursively imports every supported file under `root`.
    ///
    /// Unchanged files (same modification time and size as their record, with
    /// the artifact still present) are skipped. A file that fails to import is
    /// logged and counted; it never aborts the rest of the scan.
    pub fn scan_and_import_all_in(&self, root: impl AsRef<Path>) -> ScanReport {
        let root = root.as_ref();
        let mut report = ScanReport::default();
        if !root.is_dir() {
            error!("Resource root '{}' does not exist", root.display());
            return report;
        }

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(importer) = self.importers.find_for_path(path) else {
                trace!("No importer for '{}'", path.display());
                continue;
            };
            report.found += 1;

            if self.is_up_to_date(path) {
                debug!("Skipping unchanged '{}'", path.display());
                report.skipped += 1;
                continue;
            }

            match self.import_with(importer.as_ref(), path) {
                Ok(info) => {
                    info!("Imported [{}] {}", info.guid, info.source_path);
                    report.imported += 1;
                }
                Err(e) => {
                    error!("Failed to import '{}': {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }

        info!("Scanned '{}': {}", root.display(), report);
        report
    }

    /// Imports a single file and stores its normalized record.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<AssetInfo, ImportError> {
        let path = path.as_ref();
        let importer = self
            .importers
            .find_for_path(path)
            .ok_or_else(|| ImportError::UnsupportedExtension(path.to_path_buf()))?;
        self.import_with(importer.as_ref(), path)
    }

    /// A [`ResourceManager`] over this manager's database, roots and writers.
    pub fn resource_manager(&self) -> ResourceManager {
        let mut resources = ResourceManager::new(Arc::clone(&self.database), &self.config);
        resources.set_writers(self.writers.clone());
        resources
    }

    fn import_with(
        &self,
        importer: &dyn AssetImporter,
        path: &Path,
    ) -> Result<AssetInfo, ImportError> {
        let mut info = importer.import(path, &self.config.cache_root)?;
        let (relative, origin) = self.classify(path);

        info.guid = AssetId::from_path(&relative);
        info.source_path = relative;
        info.origin = origin;
        if let Some(rel) = relative_to(Path::new(&info.imported_path), &self.config.cache_root) {
            info.imported_path = rel;
        }

        self.database.upsert(info.clone());
        Ok(info)
    }

    fn is_up_to_date(&self, path: &Path) -> bool {
        let (relative, _) = self.classify(path);
        let Some(record) = self.database.find_by_source(&relative) else {
            return false;
        };
        let Ok(stamp) = FileStamp::of(path) else {
            return false;
        };
        stamp.modified == record.source_timestamp
            && stamp.size == record.source_file_size
            && self.artifact_exists(&record.imported_path)
    }

    fn artifact_exists(&self, imported: &str) -> bool {
        resolve_under(&self.config.cache_root, imported).exists()
    }

    /// The path relative to the resource root it lives under, and that root's
    /// origin. Files outside both roots keep their full path.
    fn classify(&self, path: &Path) -> (String, AssetOrigin) {
        let roots = [
            (&self.config.project_resources_root, AssetOrigin::Project),
            (&self.config.engine_resources_root, AssetOrigin::Engine),
        ];

        let best = roots
            .iter()
            .filter_map(|(root, origin)| {
                let rel = relative_to(path, root).or_else(|| {
                    let canonical = path.canonicalize().ok()?;
                    relative_to(&canonical, &root.canonicalize().ok()?)
                })?;
                Some((root.components().count(), rel, *origin))
            })
            .max_by_key(|(depth, _, _)| *depth);

        match best {
            Some((_, rel, origin)) => (rel, origin),
            None => (generic_string(path), AssetOrigin::Project),
        }
    }
}
