//! Command implementations

pub mod build;
pub mod completions;
pub mod configure;
pub mod doctor;
pub mod run;
pub mod tasks;

use std::path::Path;

use anyhow::Result;

use cmake_tasks::core::{SystemHost, TaskKind};
use cmake_tasks::ops::{format_command, run_task, Project, TaskOptions, TaskOutcome};
use cmake_tasks::util::config::SettingsConfig;
use cmake_tasks::util::GlobalContext;

/// Load the project and run one task, relaying tool output to stdout.
pub fn execute_task(
    ctx: &GlobalContext,
    manifest_path: Option<&Path>,
    name: &str,
    expected_kind: Option<TaskKind>,
    overrides: SettingsConfig,
    dry_run: bool,
) -> Result<()> {
    let project = Project::load(ctx, manifest_path)?;

    let opts = TaskOptions {
        overrides,
        dry_run,
        expected_kind,
    };

    if !dry_run {
        eprintln!("     Running `{}`", name);
    }

    let mut relay = |line: &str| println!("{}", line);
    match run_task(&project, name, opts, &SystemHost, &mut relay)? {
        TaskOutcome::DryRun(argv) => println!("{}", format_command(&argv)),
        TaskOutcome::Finished { duration } => {
            eprintln!(
                "    Finished `{}` in {:.2}s",
                name,
                duration.as_secs_f64()
            );
        }
    }

    Ok(())
}
