//! Run shell commands one after another and show what happened.
//!
//! A [`Runner`] prints a comment, the command (split into its `&&`/`;` parts)
//! and, when the command actually runs, its captured output. On a terminal the
//! output is ANSI-coloured and commands run immediately. Anywhere else it is an
//! HTML page that reads as a bash script, meant to be reviewed and copied, and
//! commands only run when a call forces them to. Everything printed can also
//! be mirrored to a log file and to a separate key-notes file.
//!
//! The public modules [`command`] and [`env`] expose the process-execution
//! capability and context detection, so callers can plug in their own
//! executor or force a context.

pub mod command;
mod config;
pub mod env;
mod error;
mod external;
mod io_adapters;
mod log_file;
mod render;
mod repl;
mod runner;
mod style;

pub use config::{RunMode, RunnerConfig};
pub use error::RunnerError;
pub use external::{ShellExecutor, command_exists, find_command_path};
pub use io_adapters::SharedBuffer;
pub use log_file::LogMirror;
pub use render::{DocumentRenderer, Renderer, TerminalRenderer, html_escape};
pub use repl::{Flow, Session};
pub use runner::{Printable, Runner, STOPPED_MARKER, SUCCESS_MARKER, split_commands};
pub use style::Style;
