//! Running configure and build tasks against the cmake executable.

use std::io;
use std::path::Path;

use crate::builder::args::ArgumentBuilder;
use crate::builder::errors::{TaskError, NO_EXIT_CODE};
use crate::core::settings::{ResetPolicy, CMAKE_CACHE_FILE};
use crate::core::task::{TaskKind, TaskSpec};
use crate::core::HostPlatform;
use crate::util::fs::{
    clear_dir, ensure_dir, normalize_path, remove_file_if_exists, resolve_path,
};
use crate::util::process::{LineSink, ProcessBuilder};

/// A configure or build task bound to a host.
pub struct CMakeTask<'a> {
    spec: &'a TaskSpec,
    host: &'a dyn HostPlatform,
}

impl<'a> CMakeTask<'a> {
    /// Create a new task runner.
    pub fn new(spec: &'a TaskSpec, host: &'a dyn HostPlatform) -> Self {
        CMakeTask { spec, host }
    }

    /// The argument vector this task would execute.
    pub fn arguments(&self) -> Result<Vec<String>, TaskError> {
        ArgumentBuilder::new(&self.spec.name, &self.spec.settings, self.host)
            .for_kind(self.spec.kind)
    }

    /// Run the task, streaming tool output into `sink`.
    pub fn run(&self, sink: &mut dyn LineSink) -> Result<(), TaskError> {
        let working_dir = self
            .spec
            .settings
            .working_dir()
            .ok_or_else(|| TaskError::MissingSetting {
                task: self.spec.name.clone(),
                setting: "working_dir",
            })?;
        let working_dir =
            normalize_path(working_dir).map_err(|e| self.preparation_error(working_dir, e))?;

        // Build the command line first so bad settings never touch the disk.
        let argv = self.arguments()?;

        if self.spec.kind == TaskKind::Configure {
            self.prepare_working_dir(&working_dir)?;
        }

        run_tool(&self.spec.name, &argv, &working_dir, sink)
    }

    /// Reset the working directory before configuring.
    fn prepare_working_dir(&self, dir: &Path) -> Result<(), TaskError> {
        let policy = self.spec.settings.reset;
        tracing::debug!("resetting {} ({:?})", dir.display(), policy);

        let result = match policy {
            ResetPolicy::Wipe => self.check_wipe_target(dir).and_then(|()| clear_dir(dir)),
            ResetPolicy::CacheFile => {
                remove_file_if_exists(&dir.join(CMAKE_CACHE_FILE)).and_then(|()| ensure_dir(dir))
            }
        };

        result.map_err(|source| self.preparation_error(dir, source))
    }

    /// Refuse to wipe a directory holding the sources or the project config.
    fn check_wipe_target(&self, dir: &Path) -> io::Result<()> {
        let target = resolve_path(dir)?;

        let protected = self
            .spec
            .settings
            .source_dir()
            .into_iter()
            .chain(self.spec.project_root());

        for path in protected {
            let path = resolve_path(path)?;
            if path.starts_with(&target) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("refusing to delete a directory that contains {}", path.display()),
                ));
            }
        }

        Ok(())
    }

    fn preparation_error(&self, dir: &Path, source: io::Error) -> TaskError {
        TaskError::ConfigPreparation {
            task: self.spec.name.clone(),
            path: dir.to_path_buf(),
            source,
        }
    }
}

/// Execute `argv` inside `working_dir` and check the exit code.
///
/// The working directory is created if missing. Output is relayed to `sink`
/// line by line while the tool runs.
pub fn run_tool(
    task: &str,
    argv: &[String],
    working_dir: &Path,
    sink: &mut dyn LineSink,
) -> Result<(), TaskError> {
    let launch_error = |program: &str, source| TaskError::Launch {
        task: task.to_string(),
        program: program.to_string(),
        source,
    };

    let cmd = ProcessBuilder::from_argv(argv)
        .ok_or_else(|| TaskError::MissingSetting {
            task: task.to_string(),
            setting: "executable",
        })?
        .cwd(working_dir);
    let program = cmd.get_program().display().to_string();

    ensure_dir(working_dir).map_err(|e| launch_error(&program, e))?;

    tracing::info!("task {} - exec: {}", task, cmd.display_command());

    let status = cmd
        .exec_streaming(sink)
        .map_err(|e| launch_error(&program, e))?;

    if !status.success() {
        return Err(TaskError::BuildTool {
            task: task.to_string(),
            code: status.code().unwrap_or(NO_EXIT_CODE),
        });
    }

    tracing::debug!("task {} finished", task);
    Ok(())
}
