use anyhow::Result;
use argh::FromArgs;
use script_runner::env::{Environment, ExecutionContext};
use script_runner::{Runner, RunnerConfig, RunnerError, Session};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(FromArgs)]
/// Run shell commands and show them as a coloured transcript, or as an HTML page
/// that can be copied as a bash script.
struct Args {
    /// directory to run commands in (default: the current directory)
    #[argh(option, short = 'd')]
    dir: Option<PathBuf>,

    /// comment shown above the command
    #[argh(option, short = 'c', default = "String::new()")]
    comment: String,

    /// file that receives a copy of everything printed
    #[argh(option)]
    log_file: Option<PathBuf>,

    /// file that receives key notes; setting it turns key notes on
    #[argh(option)]
    key_notes: Option<PathBuf>,

    /// only show commands, never run them (unless --run is given)
    #[argh(switch)]
    render_only: bool,

    /// run commands even when only showing them
    #[argh(switch)]
    run: bool,

    /// stop with a non-zero status as soon as a command fails
    #[argh(switch)]
    break_on_error: bool,

    /// extra text printed after the output of a failing command
    #[argh(option)]
    error_message: Option<String>,

    /// print nothing but errors
    #[argh(switch, short = 'q')]
    quiet: bool,

    /// force the output: interactive or document
    #[argh(option)]
    context: Option<ExecutionContext>,

    /// command to run; an interactive session starts when it is omitted
    #[argh(positional, greedy)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Args = argh::from_env();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<RunnerError>() {
            Some(stopped @ RunnerError::Stopped { .. }) => {
                tracing::debug!("{stopped}");
                ExitCode::from(stopped.exit_status() as u8)
            }
            Some(fatal) => {
                eprintln!("Error: {fatal}");
                ExitCode::from(fatal.exit_status() as u8)
            }
            None => {
                eprintln!("Error: {err:#}");
                ExitCode::from(2)
            }
        },
    }
}

fn run(args: Args) -> Result<()> {
    let env = Environment::new();
    let mut config = RunnerConfig::from_environment(&env);
    if let Some(path) = args.log_file {
        config = config.with_log_file(path);
    }
    if let Some(path) = args.key_notes {
        config = config.with_key_notes(path);
    }
    if args.render_only {
        config = config.with_run_immediately(false);
    }
    if args.break_on_error {
        config = config.with_break_on_all_errors(true);
    }
    if let Some(message) = args.error_message {
        config = config.with_error_message(message);
    }

    let dir = env.command_dir(args.dir);
    let context = args.context.unwrap_or_else(|| env.context());
    let mut runner = Runner::for_context(config, context)?;
    if args.command.is_empty() {
        Session::new(&mut runner, dir)
            .with_always_run(args.run)
            .with_verbose(!args.quiet)
            .run()?;
    } else {
        let command = args.command.join(" ");
        runner.exec_me(&dir, &command, &args.comment, args.run, !args.quiet)?;
    }
    runner.finish()?;
    Ok(())
}
