//! Host platform capability.
//!
//! Guest dispatch and job-count detection both depend on the machine the
//! tasks run on. They go through [`HostPlatform`] so that callers (and tests)
//! can substitute a fixed host.

use std::fmt;
use std::num::NonZeroUsize;

/// Upper bound for the `-j` value handed to the native build.
pub const MAX_PARALLEL_JOBS: usize = 8;

/// Operating system families the dispatch rule distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl HostOs {
    /// Detect the operating system this process runs on.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "linux" => HostOs::Linux,
            "macos" => HostOs::MacOs,
            "windows" => HostOs::Windows,
            _ => HostOs::Other,
        }
    }

    /// Lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            HostOs::Linux => "linux",
            HostOs::MacOs => "macos",
            HostOs::Windows => "windows",
            HostOs::Other => "other",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, HostOs::Windows)
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the argument builder needs to know about the host.
pub trait HostPlatform {
    /// The controlling operating system.
    fn os(&self) -> HostOs;

    /// Number of processing units available to this process.
    fn available_parallelism(&self) -> usize;

    /// Job count for `-j`, capped at [`MAX_PARALLEL_JOBS`].
    fn job_count(&self) -> usize {
        self.available_parallelism().clamp(1, MAX_PARALLEL_JOBS)
    }
}

/// The machine this process is running on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostPlatform for SystemHost {
    fn os(&self) -> HostOs {
        HostOs::current()
    }

    fn available_parallelism(&self) -> usize {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}

/// A host with fixed answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHost {
    pub os: HostOs,
    pub parallelism: usize,
}

impl FixedHost {
    pub fn new(os: HostOs, parallelism: usize) -> Self {
        FixedHost { os, parallelism }
    }
}

impl HostPlatform for FixedHost {
    fn os(&self) -> HostOs {
        self.os
    }

    fn available_parallelism(&self) -> usize {
        self.parallelism
    }
}
