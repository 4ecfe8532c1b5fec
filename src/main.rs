use anyhow::{Context, Result};
use argh::FromArgs;
use mini_shell::{EditorSource, Interpreter, LineSource, LoopState, StreamSource};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A minimal interactive shell: runs `cd`, `exit` and external programs.
struct Args {
    #[argh(switch, short = 'v')]
    /// log debug events, including child process waits, to standard error.
    verbose: bool,

    #[argh(switch)]
    /// read standard input as a plain stream even when it is a terminal.
    plain: bool,
}

/// Send logs to standard error. `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn line_source(plain: bool) -> Result<Box<dyn LineSource>> {
    if !plain && io::stdin().is_terminal() {
        let editor = EditorSource::new().context("failed to initialise line editor")?;
        return Ok(Box::new(editor));
    }
    Ok(Box::new(StreamSource::new(io::stdin().lock(), io::stdout())))
}

fn main() -> Result<ExitCode> {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    let mut source = line_source(args.plain)?;
    let mut shell: Interpreter = Interpreter::default();
    if let Err(err) = shell.repl(source.as_mut()) {
        debug!(%err, "shell stopped on input failure");
    }

    Ok(match shell.state() {
        LoopState::Stopped(disposition) => ExitCode::from(disposition.exit_code()),
        LoopState::Running => ExitCode::FAILURE,
    })
}
