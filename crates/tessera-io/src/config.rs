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

//! Resource-root configuration, read from a `Resources.toml` manifest.

use crate::error::ConfigError;
use crate::writer::WriterContext;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "Resources.toml";

/// Where resources, artifacts and the asset database live.
///
/// Every field may be omitted from the manifest. Relative paths are resolved
/// against the directory containing the manifest.
///
/// ```toml
/// engine_resources_root = "resources/engine"
/// project_resources_root = "resources/project"
/// cache_root = "cache"
/// database_path = "cache/asset_database.json"
/// content_root = "content"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceConfig {
    /// Root of the resources shipped with the engine.
    pub engine_resources_root: PathBuf,
    /// Root of the project's own resources.
    pub project_resources_root: PathBuf,
    /// Root under which importers write artifacts.
    pub cache_root: PathBuf,
    /// Location of the persisted asset database.
    pub database_path: PathBuf,
    /// Where cooked runtime content is written.
    pub content_root: PathBuf,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            engine_resources_root: PathBuf::from("resources/engine"),
            project_resources_root: PathBuf::from("resources/project"),
            cache_root: PathBuf::from("cache"),
            database_path: PathBuf::from("cache/asset_database.json"),
            content_root: PathBuf::from("content"),
        }
    }
}

impl ResourceConfig {
    /// The default layout placed under `root`.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        Self::default().relative_to(root.as_ref())
    }

    /// Loads the manifest at `path`.
    ///
    /// A missing manifest yields the default layout next to where it would be.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        if !path.exists() {
            info!(
                "No '{}' found. Using default resource configuration.",
                path.display()
            );
            return Ok(Self::from_root(base));
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded resource configuration from '{}'", path.display());
        Ok(config.relative_to(base))
    }

    /// The writer context matching this layout.
    pub fn writer_context(&self) -> WriterContext {
        WriterContext {
            engine_resources_root: self.engine_resources_root.clone(),
            project_resources_root: self.project_resources_root.clone(),
            cache_root: self.cache_root.clone(),
            create_directories: true,
        }
    }

    fn relative_to(self, base: &Path) -> Self {
        let join = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Self {
            engine_resources_root: join(self.engine_resources_root),
            project_resources_root: join(self.project_resources_root),
            cache_root: join(self.cache_root),
            database_path: join(self.database_path),
            content_root: join(self.content_root),
        }
    }
}
