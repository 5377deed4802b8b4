use crate::command::{CommandExecutor, CommandOutput, ExitCode};
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Runs commands through the system shell.
///
/// The whole command string is handed to the shell as one script, so `&&`, `;`,
/// pipes and redirections behave exactly as they would when pasted into a terminal.
pub struct ShellExecutor {
    shell: OsString,
    flag: &'static str,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<OsString>, flag: &'static str) -> Self {
        Self {
            shell: shell.into(),
            flag,
        }
    }

    /// Wrap `command` so stderr of every part of it ends up on stdout.
    fn script(&self, command: &str) -> String {
        if cfg!(unix) {
            format!("exec 2>&1\n{command}")
        } else {
            format!("{command} 2>&1")
        }
    }
}

impl Default for ShellExecutor {
    #[cfg(unix)]
    fn default() -> Self {
        Self::new("sh", "-c")
    }

    #[cfg(not(unix))]
    fn default() -> Self {
        Self::new("cmd", "/C")
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, dir: &Path, command: &str) -> Result<CommandOutput> {
        let output = std::process::Command::new(&self.shell)
            .arg(self.flag)
            .arg(self.script(command))
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to start {:?} for `{}`", self.shell, command))?;
        let exit_code = match output.status.code() {
            Some(x) => x,
            None => terminated_by_signal(output.status),
        };
        Ok(CommandOutput::new(split_output(&output.stdout), exit_code))
    }
}

fn split_output(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

/// Whether `name` resolves to an existing program using the current `PATH`.
pub fn command_exists(name: &str) -> bool {
    let search_paths = std::env::var_os("PATH").unwrap_or_default();
    find_command_path(&search_paths, Path::new(name)).is_some()
}

/// Resolve a command path the way a typical shell would.
///
/// Only regular files with an execute bit count as found (any regular file
/// outside Unix); directories and plain data files never do.
///
/// Behavior:
/// - Absolute path: returns it if it is executable.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it is executable.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it is executable.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first executable match.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && is_executable(path) {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if is_executable(path) { Some(path) } else { None }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
