//! Global context for task operations.
//!
//! Provides centralized access to the working directory and the
//! configuration file locations.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;

use crate::util::config::PROJECT_CONFIG_NAME;

/// Project directories for cmake-tasks
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "cmake-tasks", "cmake-tasks"));

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Directory holding the global config file, if the platform has one
    config_dir: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let config_dir = PROJECT_DIRS
            .as_ref()
            .map(|dirs| dirs.config_dir().to_path_buf());

        Ok(GlobalContext { cwd, config_dir })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Replace the global config directory.
    pub fn with_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config_dir = dir;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join("config.toml"))
    }

    /// Find `CMakeTasks.toml` starting from cwd and searching upward.
    pub fn find_project_config(&self) -> Option<PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(PROJECT_CONFIG_NAME))
            .find(|path| path.is_file())
    }

    /// Like [`GlobalContext::find_project_config`], but an error when absent.
    pub fn require_project_config(&self) -> Result<PathBuf> {
        match self.find_project_config() {
            Some(path) => Ok(path),
            None => bail!(
                "could not find `{}` in `{}` or any parent directory\n\
                 \n\
                 help: Create a {} with a [cmake] table, or pass --manifest-path",
                PROJECT_CONFIG_NAME,
                self.cwd.display(),
                PROJECT_CONFIG_NAME
            ),
        }
    }
}
