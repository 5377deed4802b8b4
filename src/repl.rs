use crate::error::RunnerError;
use crate::runner::Runner;
use crate::style::Style;
use regex::Regex;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::sync::LazyLock;

/// A lone `cd` with one plain path. Anything carrying shell syntax goes to the shell.
static CD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^cd\s+([^\s&;|<>$`'"()*?\\]+)$"#).expect("cd pattern is valid")
});

/// What the session should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Line-by-line front end over a [`Runner`].
///
/// - `# text` sets the comment shown above the next command,
/// - `cd DIR` moves later commands to `DIR` (relative to the current one),
/// - `exit` ends the session,
/// - anything else is handed to [`Runner::exec_me`].
pub struct Session<'a> {
    runner: &'a mut Runner,
    dir: PathBuf,
    comment: Option<String>,
    always_run: bool,
    verbose: bool,
}

impl<'a> Session<'a> {
    pub fn new(runner: &'a mut Runner, dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            dir: dir.into(),
            comment: None,
            always_run: false,
            verbose: true,
        }
    }

    pub fn with_always_run(mut self, always_run: bool) -> Self {
        self.always_run = always_run;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow, RunnerError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        if line == "exit" {
            return Ok(Flow::Exit);
        }
        if let Some(comment) = line.strip_prefix('#') {
            self.comment = Some(comment.trim().to_string());
            return Ok(Flow::Continue);
        }
        if let Some(captures) = CD_LINE.captures(line) {
            let target = self.dir.join(&captures[1]);
            if target.is_dir() {
                self.dir = target;
            } else {
                let warning = format!("no such directory: {}", target.display());
                self.runner.colour_print(warning.as_str(), Style::WARNING, 1)?;
            }
            return Ok(Flow::Continue);
        }

        let comment = self.comment.take().unwrap_or_else(|| line.to_string());
        self.runner
            .exec_me(&self.dir, line, &comment, self.always_run, self.verbose)?;
        Ok(Flow::Continue)
    }

    /// Read lines from the terminal until `exit`, Ctrl-C or Ctrl-D.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        loop {
            match rl.readline("$ ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    if self.handle_line(&line)? == Flow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
