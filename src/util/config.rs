//! Configuration file support.
//!
//! Task settings come from two files:
//! - Global: `<config dir>/cmake-tasks/config.toml` - user-wide defaults
//! - Project: `CMakeTasks.toml` - project settings and named tasks
//!
//! Project config takes precedence over global config. Within the project
//! file, a `[tasks.<name>]` table overrides `[cmake]` for that task only.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::settings::{BuildSettings, ResetPolicy};
use crate::core::task::{TaskKind, TaskSpec, DEFAULT_BUILD_TASK, DEFAULT_CONFIGURE_TASK};

/// File name of the project configuration.
pub const PROJECT_CONFIG_NAME: &str = "CMakeTasks.toml";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings shared by every task
    pub cmake: SettingsConfig,

    /// Named tasks with their own overrides
    pub tasks: IndexMap<String, TaskConfig>,

    /// Top-level keys nothing reads
    #[serde(flatten, skip_serializing)]
    pub unknown: IndexMap<String, toml::Value>,
}

/// Settings as written in a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub executable: Option<String>,
    pub working_dir: Option<PathBuf>,
    pub source_dir: Option<PathBuf>,
    pub generator: Option<String>,
    pub platform: Option<String>,
    pub toolset: Option<String>,
    pub configuration_types: Option<String>,
    pub install_prefix: Option<String>,
    pub build_shared_libs: Option<bool>,
    pub build_static_libs: Option<bool>,
    pub build_target: Option<String>,
    pub build_config: Option<String>,
    pub build_clean: Option<bool>,
    pub job_count: Option<u32>,
    pub distribution: Option<String>,
    pub reset: Option<ResetPolicy>,

    /// `-D` definitions, kept in file order
    pub options: IndexMap<String, String>,

    /// Keys nothing reads, usually typos
    #[serde(flatten, skip_serializing)]
    pub unknown: IndexMap<String, toml::Value>,
}

/// A named task entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Configure or build; inferred from the name when omitted
    pub kind: Option<TaskKind>,

    #[serde(flatten)]
    pub settings: SettingsConfig,
}

impl SettingsConfig {
    /// Merge another layer into this one (other takes precedence).
    ///
    /// Options are appended; a key that already exists keeps its position
    /// and takes the new value.
    pub fn merge(&mut self, other: SettingsConfig) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.executable, other.executable);
        take(&mut self.working_dir, other.working_dir);
        take(&mut self.source_dir, other.source_dir);
        take(&mut self.generator, other.generator);
        take(&mut self.platform, other.platform);
        take(&mut self.toolset, other.toolset);
        take(&mut self.configuration_types, other.configuration_types);
        take(&mut self.install_prefix, other.install_prefix);
        take(&mut self.build_shared_libs, other.build_shared_libs);
        take(&mut self.build_static_libs, other.build_static_libs);
        take(&mut self.build_target, other.build_target);
        take(&mut self.build_config, other.build_config);
        take(&mut self.build_clean, other.build_clean);
        take(&mut self.job_count, other.job_count);
        take(&mut self.distribution, other.distribution);
        take(&mut self.reset, other.reset);

        self.options.extend(other.options);
    }

    /// Turn this layer into immutable settings.
    ///
    /// Relative directories are resolved against `root`.
    pub fn into_settings(self, root: &Path) -> BuildSettings {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { root.join(p) };

        BuildSettings {
            executable: self.executable,
            working_dir: self.working_dir.map(resolve),
            source_dir: self.source_dir.map(resolve),
            generator: self.generator,
            platform: self.platform,
            toolset: self.toolset,
            configuration_types: self.configuration_types,
            install_prefix: self.install_prefix,
            build_shared_libs: self.build_shared_libs,
            build_static_libs: self.build_static_libs,
            options: self.options,
            build_target: self.build_target,
            build_config: self.build_config,
            build_clean: self.build_clean,
            job_count: self.job_count,
            distribution: self.distribution,
            reset: self.reset.unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        for key in config.unknown_keys() {
            tracing::warn!("unknown key `{}` in {}", key, path.display());
        }

        Ok(config)
    }

    /// Dotted paths of every key that no setting reads.
    pub fn unknown_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.unknown.keys().cloned().collect();
        keys.extend(self.cmake.unknown.keys().map(|k| format!("cmake.{}", k)));

        for (name, task) in &self.tasks {
            keys.extend(
                task.settings
                    .unknown
                    .keys()
                    .map(|k| format!("tasks.{}.{}", name, k)),
            );
        }

        keys
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.cmake.merge(other.cmake);

        for (name, task) in other.tasks {
            match self.tasks.get_mut(&name) {
                Some(existing) => {
                    if task.kind.is_some() {
                        existing.kind = task.kind;
                    }
                    existing.settings.merge(task.settings);
                }
                None => {
                    self.tasks.insert(name, task);
                }
            }
        }
    }

    /// All known tasks: the two built-in ones followed by configured ones.
    pub fn task_names(&self) -> Result<Vec<(String, TaskKind)>> {
        let mut names: IndexMap<String, TaskKind> = IndexMap::new();
        names.insert(DEFAULT_CONFIGURE_TASK.to_string(), TaskKind::Configure);
        names.insert(DEFAULT_BUILD_TASK.to_string(), TaskKind::Build);

        for name in self.tasks.keys() {
            names.insert(name.clone(), self.task_kind(name)?);
        }

        Ok(names.into_iter().collect())
    }

    /// Kind of a task, from its entry, its name, or the built-in defaults.
    pub fn task_kind(&self, name: &str) -> Result<TaskKind> {
        if let Some(kind) = self.tasks.get(name).and_then(|t| t.kind) {
            return Ok(kind);
        }

        match name {
            DEFAULT_CONFIGURE_TASK => return Ok(TaskKind::Configure),
            DEFAULT_BUILD_TASK => return Ok(TaskKind::Build),
            _ => {}
        }

        if !self.tasks.contains_key(name) {
            bail!(
                "unknown task `{}`\n\
                 \n\
                 help: Run `cmake-tasks tasks` to see available tasks",
                name
            );
        }

        TaskKind::infer(name).ok_or_else(|| {
            anyhow!(
                "cannot tell whether task `{}` configures or builds\n\
                 \n\
                 help: Add `kind = \"configure\"` or `kind = \"build\"` to [tasks.{}]",
                name,
                name
            )
        })
    }

    /// Resolve a task into its final settings.
    ///
    /// Layers, lowest to highest: `[cmake]`, `[tasks.<name>]`, `overrides`.
    pub fn resolve_task(
        &self,
        name: &str,
        root: &Path,
        overrides: SettingsConfig,
    ) -> Result<TaskSpec> {
        let kind = self.task_kind(name)?;

        let mut layer = self.cmake.clone();
        if let Some(task) = self.tasks.get(name) {
            layer.merge(task.settings.clone());
        }
        layer.merge(overrides);

        Ok(TaskSpec::new(name, kind, layer.into_settings(root)).with_project_root(root))
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (CMakeTasks.toml)
/// 2. Global config (<config dir>/cmake-tasks/config.toml)
/// 3. Defaults
///
/// A broken global file only warns; a broken project file is an error.
pub fn load_config(global_path: Option<&Path>, project_path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }

    if let Some(project) = project_path {
        config.merge(Config::load(project)?);
    }

    Ok(config)
}
