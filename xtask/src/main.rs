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

// Build automation and resource pipeline tasks for Tessera.
// Run with: cargo xtask <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask", version)]
#[command(about = "Build automation and resource pipeline for Tessera")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all crates in the workspace
    Build,
    /// Run all tests in the workspace
    Test,
    /// Run `cargo check` on all crates
    Check,
    /// Format all code in the workspace
    Format,
    /// Run clippy on all crates with warnings as errors
    Clippy,
    /// Run every CI task in sequence
    All,
    /// Resource pipeline management
    Assets {
        #[command(subcommand)]
        command: AssetsCommand,
    },
}

#[derive(Subcommand)]
enum AssetsCommand {
    /// Scan both resource roots and import new or changed files
    Import {
        /// Path to the resource manifest
        #[arg(long, default_value = "Resources.toml")]
        config: PathBuf,
    },
    /// Print every record of the asset database
    List {
        /// Path to the resource manifest
        #[arg(long, default_value = "Resources.toml")]
        config: PathBuf,
    },
    /// Write the content directory of a shipped build
    Cook {
        /// Path to the resource manifest
        #[arg(long, default_value = "Resources.toml")]
        config: PathBuf,
        /// Copy loose artifacts instead of packing them
        #[arg(long)]
        loose: bool,
        /// Leave engine resources out
        #[arg(long)]
        no_engine: bool,
    },
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let Some(command) = Cli::parse().command else {
        helpers::print_custom_help();
        return Ok(());
    };

    match command {
        Commands::Build => commands::ci::run(commands::ci::CiTask::Build),
        Commands::Test => commands::ci::run(commands::ci::CiTask::Test),
        Commands::Check => commands::ci::run(commands::ci::CiTask::Check),
        Commands::Format => commands::ci::run(commands::ci::CiTask::Format),
        Commands::Clippy => commands::ci::run(commands::ci::CiTask::Clippy),
        Commands::All => commands::ci::all(),
        Commands::Assets { command } => match command {
            AssetsCommand::Import { config } => commands::assets::import(&config),
            AssetsCommand::List { config } => commands::assets::list(&config),
            AssetsCommand::Cook {
                config,
                loose,
                no_engine,
            } => commands::assets::cook(&config, loose, no_engine),
        },
    }
}
