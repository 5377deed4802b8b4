use anyhow::Result;
use std::path::Path;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Children killed by a signal are reported as `128 + signal`, the way POSIX
/// shells report them.
pub type ExitCode = i32;

/// Everything a finished command left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Combined stdout and stderr, split into lines with trailing whitespace removed.
    pub lines: Vec<String>,
    pub exit_code: ExitCode,
}

impl CommandOutput {
    pub fn new(lines: Vec<String>, exit_code: ExitCode) -> Self {
        Self { lines, exit_code }
    }

    /// The last captured line, or an empty string when nothing was printed.
    pub fn last_line(&self) -> &str {
        self.lines.last().map(String::as_str).unwrap_or("")
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability to run one shell command to completion.
///
/// The runner only ever talks to the outside world through this trait, so tests
/// can swap in a recording implementation and prove that nothing was spawned.
pub trait CommandExecutor {
    /// Run `command` as a single shell unit inside `dir`, with stderr merged into stdout.
    ///
    /// A non-zero exit code is not an error here; `Err` means the shell itself
    /// could not be started or its output could not be collected.
    fn execute(&self, dir: &Path, command: &str) -> Result<CommandOutput>;
}
