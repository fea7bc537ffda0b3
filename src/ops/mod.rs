//! High-level operations.
//!
//! This module contains the implementation of the cmake-tasks commands.

pub mod cmake_task;
pub mod doctor;

pub use cmake_task::{format_command, run_task, Project, TaskOptions, TaskOutcome};
pub use doctor::{doctor, format_report, CheckResult, DoctorReport};
