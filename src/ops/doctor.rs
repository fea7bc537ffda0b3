//! Environment health checks.
//!
//! The `doctor` command verifies that the configured cmake executable can be
//! found and started, and reports the optional tools tasks commonly rely on.
//!
//! ## Checks Performed
//!
//! - Project configuration (CMakeTasks.toml)
//! - cmake executable and version
//! - Native build tool (ninja or make)
//! - WSL, on Windows hosts only

use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::builder::GUEST_SHELL;
use crate::core::settings::DEFAULT_EXECUTABLE;
use crate::core::{HostOs, HostPlatform};
use crate::ops::cmake_task::Project;
use crate::util::process::{find_executable, ProcessBuilder};
use crate::util::GlobalContext;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            ..Self::pass(name, message)
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Host operating system
    pub os: Option<HostOs>,

    /// Job count a parallel build would use
    pub jobs: usize,
}

impl DoctorReport {
    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get the count of required failed checks.
    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Run the doctor checks.
///
/// An explicit `manifest_path` is checked instead of searching upward from
/// the working directory.
pub fn doctor(
    ctx: &GlobalContext,
    manifest_path: Option<&Path>,
    host: &dyn HostPlatform,
) -> Result<DoctorReport> {
    let start = Instant::now();
    let mut report = DoctorReport {
        os: Some(host.os()),
        jobs: host.job_count(),
        ..Default::default()
    };

    // The project file is optional here; without it cmake is looked up by name.
    let manifest = match manifest_path {
        Some(path) => Some(ctx.cwd().join(path)),
        None => ctx.find_project_config(),
    };

    let executable = match manifest {
        Some(path) => match Project::load(ctx, Some(path.as_path())) {
            Ok(project) => {
                report.add(
                    CheckResult::pass("Project", format!("Found {}", path.display()))
                        .with_path(path)
                        .optional(),
                );
                project.config.cmake.executable
            }
            Err(e) => {
                report.add(CheckResult::fail("Project", format!("{:#}", e)));
                None
            }
        },
        None => {
            report.add(CheckResult::fail("Project", "No CMakeTasks.toml found").optional());
            None
        }
    };

    report.add(check_cmake(
        executable.as_deref().unwrap_or(DEFAULT_EXECUTABLE),
    ));
    report.add(check_build_tool());

    if host.os().is_windows() {
        report.add(check_guest_shell());
    }

    report.total_duration = start.elapsed();
    Ok(report)
}

/// First line of `<tool> --version`, if the tool runs successfully.
fn tool_version(tool: &str) -> Option<String> {
    let output = ProcessBuilder::new(tool).arg("--version").exec().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Some(stdout.lines().next().unwrap_or("").trim().to_string())
}

/// Check for the configured cmake executable.
fn check_cmake(executable: &str) -> CheckResult {
    let start = Instant::now();

    let Some(path) = find_executable(executable) else {
        return CheckResult::fail("CMake", format!("`{}` not found", executable))
            .with_duration(start.elapsed());
    };

    match tool_version(executable) {
        Some(version) => CheckResult::pass("CMake", format!("Found {}", executable))
            .with_path(path)
            .with_version(version)
            .with_duration(start.elapsed()),
        None => CheckResult::fail("CMake", format!("`{}` did not run", executable))
            .with_path(path)
            .with_duration(start.elapsed()),
    }
}

/// Check for a native build tool (ninja or make).
fn check_build_tool() -> CheckResult {
    let start = Instant::now();

    let make = if cfg!(windows) { "nmake" } else { "make" };
    for tool in ["ninja", make] {
        if let Some(path) = find_executable(tool) {
            let mut check = CheckResult::pass("Build Tool", format!("{} is available", tool))
                .with_path(path)
                .optional();
            if let Some(version) = tool_version(tool) {
                check = check.with_version(version);
            }
            return check.with_duration(start.elapsed());
        }
    }

    CheckResult::fail("Build Tool", "No build tool found (ninja or make recommended)")
        .with_duration(start.elapsed())
        .optional()
}

/// Check for WSL, needed by tasks whose name contains `linux`.
fn check_guest_shell() -> CheckResult {
    let start = Instant::now();

    match find_executable(GUEST_SHELL) {
        Some(path) => CheckResult::pass("WSL", "wsl.exe is available")
            .with_path(path)
            .with_duration(start.elapsed())
            .optional(),
        None => CheckResult::fail("WSL", "wsl.exe not found (needed for linux tasks)")
            .with_duration(start.elapsed())
            .optional(),
    }
}

/// Format a doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    let mut output = String::new();

    if let Some(os) = report.os {
        writeln!(output, "Host: {} ({} parallel jobs)", os, report.jobs).unwrap();
    }
    writeln!(output).unwrap();

    for check in &report.checks {
        let status = if check.passed { "ok" } else { "FAIL" };
        let required = if check.required { "" } else { " (optional)" };
        writeln!(output, "  {:>4} {}{}", status, check.name, required).unwrap();

        if verbose || !check.passed {
            writeln!(output, "       {}", check.message).unwrap();
        }
        if verbose {
            if let Some(path) = &check.path {
                writeln!(output, "       Path: {}", path.display()).unwrap();
            }
            if let Some(version) = &check.version {
                writeln!(output, "       Version: {}", version).unwrap();
            }
        }
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Summary: {} passed, {} failed",
        report.passed_count(),
        report.failed_count()
    )
    .unwrap();

    if report.required_failed_count() > 0 {
        writeln!(
            output,
            "\nWarning: {} required check(s) failed.",
            report.required_failed_count()
        )
        .unwrap();
    }

    output
}
