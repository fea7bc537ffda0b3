//! Running a named task from the project configuration.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};

use crate::builder::CMakeTask;
use crate::core::task::{TaskKind, TaskSpec};
use crate::core::HostPlatform;
use crate::util::config::{load_config, Config, SettingsConfig};
use crate::util::process::LineSink;
use crate::util::GlobalContext;

/// A loaded project configuration.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory relative paths are resolved against
    pub root: PathBuf,

    /// Merged global and project configuration
    pub config: Config,
}

impl Project {
    /// Load the project from an explicit path or by searching upward.
    pub fn load(ctx: &GlobalContext, manifest_path: Option<&Path>) -> Result<Self> {
        let manifest = match manifest_path {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => ctx.cwd().join(path),
            None => ctx.require_project_config()?,
        };

        let global = ctx.config_path();
        let config = load_config(global.as_deref(), Some(manifest.as_path()))?;
        let root = manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| ctx.cwd().to_path_buf());

        tracing::debug!("loaded {}", manifest.display());
        Ok(Project { root, config })
    }

    /// Resolve a task with command-line overrides applied on top.
    pub fn resolve(&self, name: &str, overrides: SettingsConfig) -> Result<TaskSpec> {
        self.config.resolve_task(name, &self.root, overrides)
    }
}

/// Options for running a task.
#[derive(Debug, Clone, Default)]
pub struct TaskOptions {
    /// Settings that override everything from the config files
    pub overrides: SettingsConfig,

    /// Only compute the command line
    pub dry_run: bool,

    /// Fail unless the task has this kind
    pub expected_kind: Option<TaskKind>,
}

/// What running a task produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The command line that would have been executed.
    DryRun(Vec<String>),
    /// The tool ran and exited successfully.
    Finished { duration: Duration },
}

/// Resolve and run one task.
pub fn run_task(
    project: &Project,
    name: &str,
    opts: TaskOptions,
    host: &dyn HostPlatform,
    sink: &mut dyn LineSink,
) -> Result<TaskOutcome> {
    let spec = project.resolve(name, opts.overrides)?;

    if let Some(expected) = opts.expected_kind {
        if spec.kind != expected {
            bail!(
                "task `{}` is a {} task, not a {} task\n\
                 \n\
                 help: Run it with `cmake-tasks run {}`",
                name,
                spec.kind,
                expected,
                name
            );
        }
    }

    let task = CMakeTask::new(&spec, host);

    if opts.dry_run {
        return Ok(TaskOutcome::DryRun(task.arguments()?));
    }

    let start = Instant::now();
    task.run(sink)?;
    Ok(TaskOutcome::Finished {
        duration: start.elapsed(),
    })
}

/// Render an argument vector as a single shell-pasteable line.
pub fn format_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| shell_quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));

    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
