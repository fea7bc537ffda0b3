//! Task identity: a name, a kind, and the settings it runs with.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::settings::BuildSettings;

/// Name marker that routes a task to a Linux guest on Windows hosts.
pub const LINUX_MARKER: &str = "linux";

/// Task created for configure when the config file names none.
pub const DEFAULT_CONFIGURE_TASK: &str = "cmakeConfigure";

/// Task created for build when the config file names none.
pub const DEFAULT_BUILD_TASK: &str = "cmakeBuild";

/// The two operations a task can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Configure,
    Build,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Configure => "configure",
            TaskKind::Build => "build",
        }
    }

    /// Infer the kind from a task name ending in `Configure` or `Build`.
    pub fn infer(task_name: &str) -> Option<Self> {
        let lower = task_name.to_lowercase();
        if lower.ends_with("configure") {
            Some(TaskKind::Configure)
        } else if lower.ends_with("build") {
            Some(TaskKind::Build)
        } else {
            None
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a task name asks for a Linux target.
pub fn targets_linux(task_name: &str) -> bool {
    task_name.contains(LINUX_MARKER)
}

/// A fully resolved task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: String,
    pub kind: TaskKind,
    pub settings: BuildSettings,

    /// Directory holding the project config; never wiped by a configure
    pub project_root: Option<PathBuf>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, kind: TaskKind, settings: BuildSettings) -> Self {
        TaskSpec {
            name: name.into(),
            kind,
            settings,
            project_root: None,
        }
    }

    /// Record the project directory this task was loaded from.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}
