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
use anyhow::Result;
use std::time::Instant;

/// One step of the CI pipeline.
#[derive(Debug, Clone, Copy)]
pub enum CiTask {
    Build,
    Test,
    Check,
    Format,
    Clippy,
}

impl CiTask {
    const PIPELINE: [CiTask; 5] = [
        CiTask::Build,
        CiTask::Test,
        CiTask::Check,
        CiTask::Format,
        CiTask::Clippy,
    ];

    fn title(self) -> &'static str {
        match self {
            CiTask::Build => "Building All Crates",
            CiTask::Test => "Running All Tests",
            CiTask::Check => "Checking All Crates",
            CiTask::Format => "Formatting Code",
            CiTask::Clippy => "Running Clippy",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CiTask::Build => "Build",
            CiTask::Test => "Tests",
            CiTask::Check => "Check",
            CiTask::Format => "Format",
            CiTask::Clippy => "Clippy",
        }
    }

    fn style(self) -> (&'static str, &'static str) {
        match self {
            CiTask::Build => (HAMMER, BLUE),
            CiTask::Test => (TEST_TUBE, GREEN),
            CiTask::Check => (MAGNIFIER, CYAN),
            CiTask::Format => (BRUSH, MAGENTA),
            CiTask::Clippy => (CLIPPY, YELLOW),
        }
    }

    fn info(self) -> &'static str {
        match self {
            CiTask::Build => "Compiling all workspace crates in debug mode",
            CiTask::Test => "Running unit tests, integration tests and doc tests",
            CiTask::Check => "Checking code for errors without building executables",
            CiTask::Format => "Formatting code using rustfmt with default settings",
            CiTask::Clippy => "Running Clippy linter with warnings as errors",
        }
    }

    fn cargo_args(self) -> &'static [&'static str] {
        match self {
            CiTask::Build => &["build", "--workspace", "--exclude", "xtask"],
            CiTask::Test => &["test", "--workspace"],
            CiTask::Check => &["check", "--workspace"],
            // `fmt` takes `--all`, not `--workspace`.
            CiTask::Format => &["fmt", "--all"],
            CiTask::Clippy => &["clippy", "--workspace", "--", "-D", "warnings"],
        }
    }
}

pub fn run(task: CiTask) -> Result<()> {
    let (emoji, color) = task.style();
    print_task_start(task.title(), emoji, color);
    print_info(task.info());
    execute_command("cargo", task.cargo_args(), task.label())
}

pub fn all() -> Result<()> {
    println!("{}", BANNER);
    println!("{}{}Starting full build pipeline...{}", BOLD, CYAN, RESET);
    println!(
        "{}💡 Pipeline:{} This will run build → test → check → format → clippy",
        BOLD, RESET
    );

    let start_time = Instant::now();
    let total_tasks = CiTask::PIPELINE.len();
    let mut success_count = 0;

    for (i, task) in CiTask::PIPELINE.into_iter().enumerate() {
        println!(
            "\n{}{}[{}/{}] {} Phase{}",
            BOLD,
            task.style().1,
            i + 1,
            total_tasks,
            task.label(),
            RESET
        );
        if run(task).is_ok() {
            success_count += 1;
        }
    }

    println!(
        "\n{}{}╔═══════════════════════════════════════╗{}",
        BOLD, CYAN, RESET
    );
    println!(
        "{}{}║            PIPELINE SUMMARY           ║{}",
        BOLD, CYAN, RESET
    );
    println!(
        "{}{}╚═══════════════════════════════════════╝{}",
        BOLD, CYAN, RESET
    );

    if success_count == total_tasks {
        print_success(&format!("All {} tasks completed successfully! {}", total_tasks, ROCKET));
    } else {
        println!(
            "{}{} ⚠ {}/{} tasks completed{}",
            BOLD, YELLOW, success_count, total_tasks, RESET
        );
    }
    println!(
        "{}{}Total time: {:.2}s{}",
        BOLD,
        BLUE,
        start_time.elapsed().as_secs_f64(),
        RESET
    );

    if success_count != total_tasks {
        anyhow::bail!(
            "Pipeline failed with {}/{} successful tasks.",
            success_count,
            total_tasks
        );
    }
    Ok(())
}
