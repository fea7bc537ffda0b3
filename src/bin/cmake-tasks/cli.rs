//! CLI definitions using clap.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use cmake_tasks::core::ResetPolicy;
use cmake_tasks::util::config::SettingsConfig;

/// cmake-tasks - configure and build CMake projects from CMakeTasks.toml
#[derive(Parser)]
#[command(name = "cmake-tasks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the project configuration (defaults to searching for CMakeTasks.toml)
    #[arg(long, global = true, value_name = "PATH", env = "CMAKE_TASKS_MANIFEST")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a configure task (wipes the working directory first)
    Configure(ConfigureArgs),

    /// Run a build task
    Build(BuildArgs),

    /// Run any configured task by name
    Run(RunArgs),

    /// List available tasks
    Tasks,

    /// Check that cmake and related tools are available
    Doctor,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Settings accepted by both configure and build.
#[derive(Args)]
pub struct CommonArgs {
    /// Print the command line instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// cmake executable to run
    #[arg(long, value_name = "PATH")]
    pub executable: Option<String>,

    /// Working (build) directory
    #[arg(short = 'B', long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// WSL distribution for linux tasks on Windows
    #[arg(long, value_name = "NAME")]
    pub distribution: Option<String>,
}

impl CommonArgs {
    fn overrides(&self, cwd: &Path) -> SettingsConfig {
        SettingsConfig {
            executable: self.executable.clone(),
            working_dir: self.working_dir.as_ref().map(|dir| cwd.join(dir)),
            distribution: self.distribution.clone(),
            ..Default::default()
        }
    }
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Task to run (defaults to cmakeConfigure)
    pub task: Option<String>,

    /// Generator name
    #[arg(short = 'G', long)]
    pub generator: Option<String>,

    /// Generator platform
    #[arg(short = 'A', long)]
    pub platform: Option<String>,

    /// Generator toolset
    #[arg(short = 'T', long)]
    pub toolset: Option<String>,

    /// Extra cache definition, KEY=VALUE (repeatable)
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_define)]
    pub define: Vec<(String, String)>,

    /// Source directory
    #[arg(short = 'S', long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// How to reset the working directory: wipe or cache
    #[arg(long)]
    pub reset: Option<ResetPolicy>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ConfigureArgs {
    /// Command-line settings layered over the config files.
    ///
    /// Relative directories are taken from `cwd`, like cmake's own `-S`/`-B`.
    pub fn overrides(&self, cwd: &Path) -> SettingsConfig {
        SettingsConfig {
            generator: self.generator.clone(),
            platform: self.platform.clone(),
            toolset: self.toolset.clone(),
            source_dir: self.source_dir.as_ref().map(|dir| cwd.join(dir)),
            reset: self.reset,
            options: self.define.iter().cloned().collect(),
            ..self.common.overrides(cwd)
        }
    }
}

#[derive(Args)]
pub struct BuildArgs {
    /// Task to run (defaults to cmakeBuild)
    pub task: Option<String>,

    /// Build configuration (for multi-config generators)
    #[arg(long = "config", value_name = "CONFIG")]
    pub build_config: Option<String>,

    /// Target to build
    #[arg(long)]
    pub target: Option<String>,

    /// Clean before building
    #[arg(long, overrides_with = "no_clean_first")]
    pub clean_first: bool,

    /// Do not clean before building, even if the config asks for it
    #[arg(long, overrides_with = "clean_first")]
    pub no_clean_first: bool,

    /// Build in parallel (the job count comes from the host, capped at 8)
    #[arg(short, long, value_name = "N", num_args = 0..=1, default_missing_value = "0")]
    pub jobs: Option<u32>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl BuildArgs {
    /// Command-line settings layered over the config files.
    pub fn overrides(&self, cwd: &Path) -> SettingsConfig {
        let build_clean = if self.clean_first {
            Some(true)
        } else if self.no_clean_first {
            Some(false)
        } else {
            None
        };

        SettingsConfig {
            build_config: self.build_config.clone(),
            build_target: self.target.clone(),
            build_clean,
            job_count: self.jobs,
            ..self.common.overrides(cwd)
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Task to run
    pub task: String,

    /// Print the command line instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

/// Parse a `KEY=VALUE` definition.
fn parse_define(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid definition '{}'; expected KEY=VALUE", s)),
    }
}
