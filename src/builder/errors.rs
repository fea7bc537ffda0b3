//! Task failure types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code reported when the child ended without one (killed by a signal).
pub const NO_EXIT_CODE: i32 = -1;

/// Error raised by a configure or build task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A required setting was not provided.
    #[error("[{task}] `{setting}` is not set")]
    MissingSetting {
        task: String,
        setting: &'static str,
    },

    /// The working directory could not be reset before configuring.
    #[error("[{task}] directory can not be cleaned: {}", path.display())]
    ConfigPreparation {
        task: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tool could not be started, or reading its output or waiting failed.
    #[error("[{task}] failed to run `{program}`")]
    Launch {
        task: String,
        program: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran and exited unsuccessfully.
    #[error("[{task}] cmake returned {code}")]
    BuildTool { task: String, code: i32 },
}

impl TaskError {
    /// Name of the task that failed.
    pub fn task(&self) -> &str {
        match self {
            TaskError::MissingSetting { task, .. }
            | TaskError::ConfigPreparation { task, .. }
            | TaskError::Launch { task, .. }
            | TaskError::BuildTool { task, .. } => task,
        }
    }

    /// Exit code of the tool, for [`TaskError::BuildTool`].
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TaskError::BuildTool { code, .. } => Some(*code),
            _ => None,
        }
    }
}
