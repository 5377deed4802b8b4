use crate::command::CommandExecutor;
use crate::config::{RunMode, RunnerConfig};
use crate::env::{Environment, ExecutionContext};
use crate::error::RunnerError;
use crate::external::ShellExecutor;
use crate::log_file::LogMirror;
use crate::render::{self, Renderer};
use crate::style::Style;
use regex::Regex;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static COMMAND_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&&|;").expect("separator pattern is valid"));

/// Marker written after a successful command.
pub const SUCCESS_MARKER: &str = "✔✔✔";
/// Marker written when a failure stops the whole run.
pub const STOPPED_MARKER: &str = "------ STOPPED -----";

/// Values that can be handed to [`Runner::colour_print`].
///
/// Strings print as they are; sequences of lines print as an indexed dump.
pub trait Printable {
    fn to_printable(&self) -> String;
}

impl Printable for str {
    fn to_printable(&self) -> String {
        self.to_string()
    }
}

impl Printable for String {
    fn to_printable(&self) -> String {
        self.clone()
    }
}

impl<S: AsRef<str>> Printable for [S] {
    fn to_printable(&self) -> String {
        self.iter()
            .enumerate()
            .map(|(i, line)| format!("[{i}] => {}", line.as_ref()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<S: AsRef<str>> Printable for Vec<S> {
    fn to_printable(&self) -> String {
        self.as_slice().to_printable()
    }
}

/// Split a command line into the parts shown on separate lines: first on `&&`,
/// then on `;`, each part trimmed. Empty parts are kept.
pub fn split_commands(command: &str) -> Vec<&str> {
    COMMAND_SEPARATOR.split(command).map(str::trim).collect()
}

/// Runs shell commands one at a time and renders them, with their results, for
/// the terminal or as a copyable HTML script.
///
/// Creating a runner writes the document header (document context only);
/// [`finish`](Runner::finish) or dropping it writes the closing output. Both
/// happen exactly once.
///
/// Example
/// ```no_run
/// use script_runner::{Runner, RunnerConfig};
/// let mut runner = Runner::create(RunnerConfig::new().with_log_file("/tmp/deploy.log")).unwrap();
/// let lines = runner.exec_me("/tmp", "echo hi && echo bye", "greet", false, true).unwrap();
/// assert!(!runner.has_error());
/// runner.finish().unwrap();
/// ```
pub struct Runner {
    config: RunnerConfig,
    renderer: Box<dyn Renderer>,
    out: Box<dyn Write>,
    executor: Box<dyn CommandExecutor>,
    last_error: String,
    has_error: bool,
    verbose: bool,
    finished: bool,
}

impl Runner {
    /// Runner for the current process: context detected from the environment,
    /// output on stdout, commands run through the system shell.
    pub fn create(config: RunnerConfig) -> Result<Self, RunnerError> {
        Self::for_context(config, Environment::new().context())
    }

    /// Like [`create`](Runner::create), with the context chosen by the caller.
    pub fn for_context(config: RunnerConfig, context: ExecutionContext) -> Result<Self, RunnerError> {
        Self::new(
            config,
            context,
            Box::new(io::stdout()),
            Box::new(ShellExecutor::default()),
        )
    }

    pub fn new(
        config: RunnerConfig,
        context: ExecutionContext,
        out: Box<dyn Write>,
        executor: Box<dyn CommandExecutor>,
    ) -> Result<Self, RunnerError> {
        debug!(%context, "creating runner");
        let mut runner = Self {
            config,
            renderer: render::for_context(context),
            out,
            executor,
            last_error: String::new(),
            has_error: false,
            verbose: true,
            finished: false,
        };
        let header = runner.renderer.header();
        if !header.is_empty() {
            runner.emit(&header)?;
        }
        Ok(runner)
    }

    pub fn context(&self) -> ExecutionContext {
        self.renderer.context()
    }

    pub fn set_log_file_location(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.config.log_file_location = non_empty(path.into());
        self
    }

    pub fn log_file_location(&self) -> Option<&Path> {
        self.config.log_file_location.as_deref()
    }

    pub fn set_key_notes_file_location(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.config.key_notes_file_location = non_empty(path.into());
        self
    }

    pub fn key_notes_file_location(&self) -> Option<&Path> {
        self.config.key_notes_file_location.as_deref()
    }

    pub fn set_make_key_notes(&mut self, make_key_notes: bool) -> &mut Self {
        self.config.make_key_notes = make_key_notes;
        self
    }

    pub fn make_key_notes(&self) -> bool {
        self.config.make_key_notes
    }

    pub fn set_run_immediately(&mut self, run_immediately: bool) -> &mut Self {
        self.config.run_mode = RunMode::from_bool(run_immediately);
        self
    }

    pub fn run_mode(&self) -> RunMode {
        self.config.run_mode
    }

    pub fn set_break_on_all_errors(&mut self, break_on_all_errors: bool) -> &mut Self {
        self.config.break_on_all_errors = break_on_all_errors;
        self
    }

    pub fn break_on_all_errors(&self) -> bool {
        self.config.break_on_all_errors
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.config.error_message = message.into();
        self
    }

    pub fn error_message(&self) -> &str {
        &self.config.error_message
    }

    /// Only affects later [`colour_print`](Runner::colour_print) calls; `exec_me` sets it per call.
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the most recent command failed.
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Output of the most recent failed command, one line per captured line.
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Show `comment` and `command`, and run the command in `current_directory`
    /// if the run mode or `always_run` allows it.
    ///
    /// Returns the captured output lines; a command that ran but printed
    /// nothing yields a single empty line, a command that was only rendered
    /// yields no lines. A failing command is reported through
    /// [`has_error`](Runner::has_error) unless the runner breaks on all errors,
    /// in which case the closing output is written and [`RunnerError::Stopped`]
    /// is returned.
    pub fn exec_me(
        &mut self,
        current_directory: impl AsRef<Path>,
        command: &str,
        comment: &str,
        always_run: bool,
        verbose: bool,
    ) -> Result<Vec<String>, RunnerError> {
        let dir = current_directory.as_ref();
        self.verbose = verbose;
        self.has_error = false;
        if self.config.run_mode == RunMode::Unresolved {
            self.config.run_mode = self.config.run_mode.resolve(self.context());
            debug!(run_mode = ?self.config.run_mode, "resolved run mode");
        }
        let will_run = self.config.run_mode == RunMode::RunNow || always_run;

        let leading = self.renderer.line_breaks(1);
        self.emit(&leading)?;
        self.colour_print(format!("# {comment}").as_str(), Style::MUTED, 1)?;
        if !will_run {
            if let Some(hidden) = self.renderer.hidden_echo(comment) {
                self.emit(&hidden)?;
            }
        }

        self.colour_print(format!("cd {}", dir.display()).as_str(), Style::RUN, 1)?;
        for part in split_commands(command) {
            self.colour_print(part, Style::RUN, 1)?;
        }

        if !will_run {
            debug!(command, "rendered without running");
            return Ok(Vec::new());
        }
        if !dir.is_dir() {
            return Err(RunnerError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let output = self
            .executor
            .execute(dir, command)
            .map_err(|err| RunnerError::Spawn {
                command: command.to_string(),
                source: err.into(),
            })?;
        info!(command, dir = %dir.display(), exit_code = output.exit_code, "command finished");

        if output.success() {
            let outcome = output.last_line();
            if !outcome.is_empty() {
                self.colour_print(outcome, Style::Green, 1)?;
            }
            for line in &output.lines {
                self.colour_print(line.as_str(), Style::Blue, 1)?;
            }
            self.colour_print(SUCCESS_MARKER, Style::Green, 1)?;
            let trailing = self.renderer.line_breaks(2);
            self.emit(&trailing)?;
        } else {
            warn!(command, exit_code = output.exit_code, "command failed");
            self.last_error = output.lines.join("\n");
            self.has_error = true;
            self.colour_print(output.lines.as_slice(), Style::ERROR, 1)?;
            if !self.config.error_message.is_empty() {
                let message = self.config.error_message.clone();
                self.colour_print(message.as_str(), Style::ERROR, 1)?;
            }
            if self.config.break_on_all_errors {
                return Err(self.stop());
            }
        }

        let mut lines = output.lines;
        if lines.is_empty() {
            lines.push(String::new());
        }
        Ok(lines)
    }

    /// Print `value` in `style` after `blank_lines` line breaks, and copy it to
    /// the configured log files.
    ///
    /// The log copy is written whatever the verbosity; on screen, only error
    /// styles get through while the runner is not verbose.
    pub fn colour_print<P: Printable + ?Sized>(
        &mut self,
        value: &P,
        style: impl Into<Style>,
        blank_lines: usize,
    ) -> Result<(), RunnerError> {
        let style = style.into();
        let text = value.to_printable();
        self.write_to_logs(&text, blank_lines)?;
        if self.verbose || style.is_error() {
            let rendered = self.renderer.styled(&text, style, blank_lines);
            self.emit(&rendered)?;
        }
        Ok(())
    }

    /// [`colour_print`](Runner::colour_print) in the muted style on its own line.
    pub fn print<P: Printable + ?Sized>(&mut self, value: &P) -> Result<(), RunnerError> {
        self.colour_print(value, Style::MUTED, 1)
    }

    /// Write the closing output now instead of on drop.
    pub fn finish(mut self) -> Result<(), RunnerError> {
        self.teardown()?;
        Ok(())
    }

    fn write_to_logs(&self, text: &str, blank_lines: usize) -> io::Result<()> {
        if let Some(path) = &self.config.log_file_location {
            LogMirror::new(path).append(text, blank_lines)?;
        }
        if self.config.make_key_notes {
            if let Some(path) = &self.config.key_notes_file_location {
                LogMirror::new(path).append(text, blank_lines)?;
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> RunnerError {
        let closed = self.teardown().and_then(|()| {
            let breaks = self.renderer.line_breaks(10);
            self.emit(&breaks)?;
            self.emit(STOPPED_MARKER)
        });
        match closed {
            Ok(()) => RunnerError::Stopped {
                last_error: self.last_error.clone(),
            },
            Err(err) => err.into(),
        }
    }

    fn teardown(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let footer = self.renderer.footer();
        self.emit(&footer)
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            warn!("failed to write closing output: {err}");
        }
    }
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}
