//! Core data structures.
//!
//! - Build settings for a single task invocation
//! - Task identity (name and kind)
//! - The host platform capability used for guest dispatch and job counts

pub mod host;
pub mod settings;
pub mod task;

pub use host::{FixedHost, HostOs, HostPlatform, SystemHost, MAX_PARALLEL_JOBS};
pub use settings::{BuildSettings, ResetPolicy, CMAKE_CACHE_FILE, DEFAULT_EXECUTABLE};
pub use task::{
    targets_linux, TaskKind, TaskSpec, DEFAULT_BUILD_TASK, DEFAULT_CONFIGURE_TASK, LINUX_MARKER,
};
