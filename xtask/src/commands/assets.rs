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

use crate::helpers::*;
use anyhow::{Context, Result};
use std::path::Path;
use tessera_core::asset::{AssetInfo, AssetOrigin};
use tessera_io::{AssetCooker, AssetDatabase, AssetManager, CookSettings, ResourceConfig};

/// Scans the engine and project roots and imports every new or changed
/// resource, then persists the database.
pub fn import(manifest: &Path) -> Result<()> {
    print_task_start("Importing Resources", BOX, MAGENTA);

    let config = load_config(manifest)?;
    print_info(&format!(
        "Engine root '{}', project root '{}', cache '{}'",
        config.engine_resources_root.display(),
        config.project_resources_root.display(),
        config.cache_root.display()
    ));

    let mut manager = AssetManager::new(config);
    let report = manager.startup();
    println!("{}🔎 Scan:{} {}", BOLD, RESET, report);

    if !manager.shutdown() {
        anyhow::bail!(
            "Failed to write the asset database to '{}'",
            manager.config().database_path.display()
        );
    }

    if report.failed > 0 {
        print_error(&format!("{} resource(s) failed to import", report.failed));
        anyhow::bail!("Import finished with {} failure(s)", report.failed);
    }
    print_success(&format!(
        "{} record(s) written to '{}'",
        manager.database().len(),
        manager.config().database_path.display()
    ));
    Ok(())
}

/// Prints every record of the database named by the manifest.
pub fn list(manifest: &Path) -> Result<()> {
    print_task_start("Asset Database", GEAR, CYAN);

    let config = load_config(manifest)?;
    let database = AssetDatabase::new();
    if !database.load(&config.database_path) {
        print_error(&format!(
            "No readable database at '{}'. Run `cargo xtask assets import` first.",
            config.database_path.display()
        ));
        return Ok(());
    }

    let records = database.all();
    for record in &records {
        println!("{}", describe(record));
    }
    print_success(&format!("{} record(s)", records.len()));
    Ok(())
}

/// Packs the imported artifacts into the content directory named by the
/// manifest.
pub fn cook(manifest: &Path, loose: bool, no_engine: bool) -> Result<()> {
    print_task_start("Cooking Content", ROCKET, GREEN);

    let config = load_config(manifest)?;
    let database = AssetDatabase::new();
    if !database.load(&config.database_path) {
        anyhow::bail!(
            "No readable database at '{}'. Run `cargo xtask assets import` first.",
            config.database_path.display()
        );
    }

    let settings = CookSettings {
        make_pak: !loose,
        include_engine_assets: !no_engine,
        ..Default::default()
    };
    let report = AssetCooker::new(&database, &config)
        .with_settings(settings)
        .cook()
        .with_context(|| format!("Failed to cook into '{}'", config.content_root.display()))?;

    println!("{}{} Cook:{} {}", BOLD, BOX, RESET, report);
    print_success(&format!(
        "Content written to '{}'",
        config.content_root.display()
    ));
    Ok(())
}

fn load_config(manifest: &Path) -> Result<ResourceConfig> {
    ResourceConfig::load(manifest)
        .with_context(|| format!("Failed to load manifest '{}'", manifest.display()))
}

fn describe(record: &AssetInfo) -> String {
    let origin = match record.origin {
        AssetOrigin::Engine => "engine",
        AssetOrigin::Project => "project",
    };
    let kind = format!("{:?}", record.asset_type);
    let mut line = format!(
        "{}{}{}  {:<9} {:<8} {} -> {}",
        BOLD,
        record.guid,
        RESET,
        kind,
        origin,
        record.source_path,
        record.imported_path
    );
    if !record.dependencies.is_empty() {
        line.push_str(&format!("  [deps: {}]", record.dependencies.join(", ")));
    }
    line
}
