//! cmake-tasks - configure and build CMake projects from declarative settings
//!
//! This crate turns task settings (generator, platform, toolset, options,
//! job count, WSL distribution) into cmake command lines and runs them,
//! streaming the tool's output as it arrives.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{ArgumentBuilder, CMakeTask, TaskError};
pub use core::{BuildSettings, HostOs, HostPlatform, SystemHost, TaskKind, TaskSpec};
pub use util::context::GlobalContext;
