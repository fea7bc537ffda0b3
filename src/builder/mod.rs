//! Command-line construction and execution for cmake tasks.

pub mod args;
pub mod cmake;
pub mod errors;

pub use args::{guest_path, ArgumentBuilder, DISTRIBUTION_FLAG, GUEST_SHELL};
pub use cmake::{run_tool, CMakeTask};
pub use errors::TaskError;
