use std::collections::HashMap;
use std::env as stdenv;
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

/// Variable that forces the execution context regardless of the terminal check.
pub const CONTEXT_VAR: &str = "SCRIPT_RUNNER_CONTEXT";

/// Where the rendered output ends up, which decides both styling and whether
/// commands run by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Attached to a terminal: ANSI colours, commands run immediately.
    Interactive,
    /// Not attached to a terminal: an HTML document meant to be read and copied.
    Document,
}

impl ExecutionContext {
    pub fn is_interactive(self) -> bool {
        self == ExecutionContext::Interactive
    }
}

impl FromStr for ExecutionContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interactive" | "terminal" | "cli" => Ok(ExecutionContext::Interactive),
            "document" | "html" => Ok(ExecutionContext::Document),
            other => Err(format!(
                "unknown context `{other}`, expected `interactive` or `document`"
            )),
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::Interactive => f.write_str("interactive"),
            ExecutionContext::Document => f.write_str("document"),
        }
    }
}

/// Snapshot of the process state the runner cares about.
///
/// The environment contains:
/// - `vars`: environment variables used for configuration lookups.
/// - `current_dir`: the directory commands run in when the caller names none.
/// - `stdout_is_terminal`: the raw input of context detection.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub stdout_is_terminal: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            stdout_is_terminal: std::io::stdout().is_terminal(),
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// `requested` if given, otherwise [`current_dir`](Environment::current_dir).
    pub fn command_dir(&self, requested: Option<PathBuf>) -> PathBuf {
        requested.unwrap_or_else(|| self.current_dir.clone())
    }

    /// Interactive when stdout is a terminal, document otherwise.
    ///
    /// A valid [`CONTEXT_VAR`] wins over the terminal check; an invalid one is ignored.
    pub fn context(&self) -> ExecutionContext {
        if let Some(forced) = self.get_var(CONTEXT_VAR) {
            match forced.parse() {
                Ok(context) => return context,
                Err(err) => tracing::warn!("ignoring {CONTEXT_VAR}: {err}"),
            }
        }
        if self.stdout_is_terminal {
            ExecutionContext::Interactive
        } else {
            ExecutionContext::Document
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(stdout_is_terminal: bool) -> Environment {
        Environment {
            vars: HashMap::new(),
            current_dir: PathBuf::from("/"),
            stdout_is_terminal,
        }
    }

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = bare(false);
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn commands_default_to_the_captured_directory() {
        let mut env = bare(false);
        env.current_dir = PathBuf::from("/srv/app");

        assert_eq!(env.command_dir(None), PathBuf::from("/srv/app"));
        assert_eq!(
            env.command_dir(Some(PathBuf::from("/opt"))),
            PathBuf::from("/opt")
        );
    }

    #[test]
    fn terminal_means_interactive() {
        assert_eq!(bare(true).context(), ExecutionContext::Interactive);
        assert_eq!(bare(false).context(), ExecutionContext::Document);
    }

    #[test]
    fn context_variable_overrides_terminal_check() {
        let mut env = bare(true);
        env.set_var(CONTEXT_VAR, "document");
        assert_eq!(env.context(), ExecutionContext::Document);

        let mut env = bare(false);
        env.set_var(CONTEXT_VAR, "Interactive");
        assert_eq!(env.context(), ExecutionContext::Interactive);
    }

    #[test]
    fn garbage_context_variable_falls_back_to_terminal_check() {
        let mut env = bare(true);
        env.set_var(CONTEXT_VAR, "browser");
        assert_eq!(env.context(), ExecutionContext::Interactive);
    }

    #[test]
    fn parse_rejects_unknown_context() {
        assert!("web".parse::<ExecutionContext>().is_err());
        assert_eq!(
            "html".parse::<ExecutionContext>(),
            Ok(ExecutionContext::Document)
        );
    }
}
