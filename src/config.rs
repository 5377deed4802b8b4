//! Caller-visible knobs of a [`Runner`](crate::Runner).
//!
//! Values can be set in code through the `with_*` builders, or picked up from
//! `SCRIPT_RUNNER_*` variables with [`RunnerConfig::from_environment`].

use crate::env::{Environment, ExecutionContext};
use std::path::PathBuf;

pub const LOG_FILE_VAR: &str = "SCRIPT_RUNNER_LOG_FILE";
pub const KEY_NOTES_FILE_VAR: &str = "SCRIPT_RUNNER_KEY_NOTES_FILE";
pub const MAKE_KEY_NOTES_VAR: &str = "SCRIPT_RUNNER_MAKE_KEY_NOTES";
pub const RUN_IMMEDIATELY_VAR: &str = "SCRIPT_RUNNER_RUN_IMMEDIATELY";
pub const BREAK_ON_ALL_ERRORS_VAR: &str = "SCRIPT_RUNNER_BREAK_ON_ALL_ERRORS";
pub const ERROR_MESSAGE_VAR: &str = "SCRIPT_RUNNER_ERROR_MESSAGE";

/// Whether commands are executed or only rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Decided from the execution context on the first command.
    #[default]
    Unresolved,
    /// Execute every command.
    RunNow,
    /// Render commands only; a per-call override can still force execution.
    RenderOnly,
}

impl RunMode {
    /// Settle an unresolved mode for `context`. Resolved modes are returned unchanged.
    pub fn resolve(self, context: ExecutionContext) -> RunMode {
        match self {
            RunMode::Unresolved if context.is_interactive() => RunMode::RunNow,
            RunMode::Unresolved => RunMode::RenderOnly,
            resolved => resolved,
        }
    }

    pub fn from_bool(run_immediately: bool) -> Self {
        if run_immediately {
            RunMode::RunNow
        } else {
            RunMode::RenderOnly
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    pub log_file_location: Option<PathBuf>,
    pub key_notes_file_location: Option<PathBuf>,
    pub make_key_notes: bool,
    pub run_mode: RunMode,
    pub break_on_all_errors: bool,
    pub error_message: String,
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read defaults from `SCRIPT_RUNNER_*` variables.
    ///
    /// Empty paths count as unset. Booleans that cannot be parsed are ignored with a warning.
    pub fn from_environment(env: &Environment) -> Self {
        let path = |key: &str| {
            env.get_var(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };
        let flag = |key: &str| {
            let value = env.get_var(key)?;
            let parsed = parse_bool(&value);
            if parsed.is_none() {
                tracing::warn!("ignoring {key}={value:?}: not a boolean");
            }
            parsed
        };

        Self {
            log_file_location: path(LOG_FILE_VAR),
            key_notes_file_location: path(KEY_NOTES_FILE_VAR),
            make_key_notes: flag(MAKE_KEY_NOTES_VAR).unwrap_or(false),
            run_mode: flag(RUN_IMMEDIATELY_VAR)
                .map(RunMode::from_bool)
                .unwrap_or_default(),
            break_on_all_errors: flag(BREAK_ON_ALL_ERRORS_VAR).unwrap_or(false),
            error_message: env.get_var(ERROR_MESSAGE_VAR).unwrap_or_default(),
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file_location = Some(path.into());
        self
    }

    /// Also turns key notes on.
    pub fn with_key_notes(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_notes_file_location = Some(path.into());
        self.make_key_notes = true;
        self
    }

    pub fn with_run_immediately(mut self, run_immediately: bool) -> Self {
        self.run_mode = RunMode::from_bool(run_immediately);
        self
    }

    pub fn with_break_on_all_errors(mut self, break_on_all_errors: bool) -> Self {
        self.break_on_all_errors = break_on_all_errors;
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
