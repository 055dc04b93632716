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

//! # Tessera IO
//!
//! The file-facing half of the asset subsystem: the persisted asset database,
//! importers and writers, the artifact formats, and the resource manager that
//! turns artifacts into shared, typed handles. Cooking packs the artifacts of
//! a shipped build into a content directory.

#![warn(missing_docs)]

pub mod artifact;
pub mod config;
pub mod cooker;
pub mod database;
pub mod error;
mod fs;
pub mod importer;
pub mod manager;
pub mod pak;
pub mod resource_manager;
pub mod writer;

pub use config::ResourceConfig;
pub use cooker::{AssetCooker, CookReport, CookSettings};
pub use database::AssetDatabase;
pub use error::{ArtifactError, ConfigError, CookError, ImportError, PakError, WriteError};
pub use manager::{AssetManager, ScanReport};
pub use pak::{PakBuilder, PakReader};
pub use resource_manager::{ResourceManager, SaveParams};
