use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// The directory a command should run in does not exist. Nothing was spawned.
    #[error("Could not find {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A command failed while the runner was told to stop on all errors.
    ///
    /// The closing output has already been written; the caller should exit.
    #[error("------ STOPPED ----- (command failed: {last_error})")]
    Stopped { last_error: String },

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// Process exit status a front end should use for this error.
    pub fn exit_status(&self) -> i32 {
        match self {
            RunnerError::Stopped { .. } => 1,
            _ => 2,
        }
    }
}
