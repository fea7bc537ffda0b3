//! Settings consumed by the configure and build tasks.
//!
//! A [`BuildSettings`] value is assembled once per invocation by the config
//! layer and is read-only afterwards. Every optional field follows the same
//! rule: absence means "omit the corresponding flag", never "use a default".

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Executable used when no explicit path is configured.
pub const DEFAULT_EXECUTABLE: &str = "cmake";

/// Cache file removed by [`ResetPolicy::CacheFile`].
pub const CMAKE_CACHE_FILE: &str = "CMakeCache.txt";

/// How the working directory is prepared before a configure run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetPolicy {
    /// Delete the whole working directory and recreate it empty.
    #[default]
    Wipe,
    /// Only delete `CMakeCache.txt` inside the working directory.
    #[serde(rename = "cache")]
    CacheFile,
}

impl std::str::FromStr for ResetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wipe" => Ok(ResetPolicy::Wipe),
            "cache" => Ok(ResetPolicy::CacheFile),
            _ => Err(format!(
                "invalid reset policy '{}'; expected 'wipe' or 'cache'",
                s
            )),
        }
    }
}

/// Immutable settings for one configure or build invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSettings {
    /// Path or name of the cmake executable
    pub executable: Option<String>,

    /// Directory the tool runs in (the build tree)
    pub working_dir: Option<PathBuf>,

    /// Directory holding the top-level CMakeLists.txt
    pub source_dir: Option<PathBuf>,

    /// Generator name, e.g. "Visual Studio 16 2019"
    pub generator: Option<String>,

    /// Generator platform, e.g. "x64" or "ARM64"
    pub platform: Option<String>,

    /// Generator toolset, e.g. "v142"
    pub toolset: Option<String>,

    /// Value for CMAKE_CONFIGURATION_TYPES
    pub configuration_types: Option<String>,

    /// Value for CMAKE_INSTALL_PREFIX
    pub install_prefix: Option<String>,

    /// BUILD_SHARED_LIBS; `None` means the flag is not passed at all
    pub build_shared_libs: Option<bool>,

    /// BUILD_STATIC_LIBS; `None` means the flag is not passed at all
    pub build_static_libs: Option<bool>,

    /// Extra `-D<key>=<value>` definitions, in insertion order
    pub options: IndexMap<String, String>,

    /// `--target` for the build step
    pub build_target: Option<String>,

    /// `--config` for the build step
    pub build_config: Option<String>,

    /// Pass `--clean-first` to the build step
    pub build_clean: Option<bool>,

    /// Requests a parallel native build. Only presence matters: the job
    /// count passed to the native tool comes from the host.
    pub job_count: Option<u32>,

    /// WSL distribution used when dispatching to a Linux guest
    pub distribution: Option<String>,

    /// Pre-configure reset of the working directory
    pub reset: ResetPolicy,
}

impl BuildSettings {
    /// Create settings rooted at a working directory.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        BuildSettings {
            working_dir: Some(working_dir.into()),
            ..Default::default()
        }
    }

    /// Set the source directory.
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Set the executable.
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    /// Add a `-D` option, keeping insertion order.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// The executable to launch, falling back to `cmake`.
    pub fn executable(&self) -> &str {
        self.executable.as_deref().unwrap_or(DEFAULT_EXECUTABLE)
    }

    /// The working directory, if configured.
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// The source directory, if configured.
    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    /// Whether `--clean-first` should be passed.
    pub fn clean_first(&self) -> bool {
        self.build_clean.unwrap_or(false)
    }

    /// Whether a parallel build was requested.
    pub fn parallel(&self) -> bool {
        self.job_count.is_some()
    }
}

/// Returns the string if it is set and not empty.
///
/// Every optional string setting goes through this, so an explicitly empty
/// value behaves exactly like an unset one.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Render a tri-state flag as cmake's `ON`/`OFF`.
pub fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}
