use crate::builtin;
use crate::command::{CommandOutcome, PROMPT, report};
use crate::external;
use crate::io_adapters::LineSource;
use crate::lexer::{TokenSequence, split_into_tokens};
use std::io::{self, Write};
use tracing::debug;

/// How a stopped shell ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// End of input or an explicit `exit`.
    Clean,
    /// The input source failed.
    Failed,
}

impl Disposition {
    /// Process exit code for this disposition.
    pub fn exit_code(self) -> u8 {
        match self {
            Disposition::Clean => 0,
            Disposition::Failed => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped(Disposition),
}

impl LoopState {
    pub fn is_running(self) -> bool {
        self == LoopState::Running
    }
}

/// Unrecoverable loop failure.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("readline: {0}")]
    Read(#[from] io::Error),
}

/// A minimal shell-like interpreter that runs builtins and external programs.
///
/// Diagnostics for recoverable failures (a bad `cd`, a program that cannot be
/// started, ...) are written one per line to `D`, standard error by default.
///
/// Example
/// ```
/// use mini_shell::{Disposition, Interpreter, LoopState, StreamSource};
/// use std::io::{Cursor, sink};
///
/// let mut source = StreamSource::new(Cursor::new("true\nexit\n"), sink());
/// let mut sh = Interpreter::new(Vec::new());
/// sh.repl(&mut source).unwrap();
/// assert_eq!(sh.state(), LoopState::Stopped(Disposition::Clean));
/// ```
pub struct Interpreter<D = io::Stderr> {
    diag: D,
    state: LoopState,
}

impl Default for Interpreter<io::Stderr> {
    fn default() -> Self {
        Self::new(io::stderr())
    }
}

impl<D: Write> Interpreter<D> {
    /// Create a running interpreter that reports diagnostics to `diag`.
    pub fn new(diag: D) -> Self {
        Self {
            diag,
            state: LoopState::Running,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Consume the interpreter and return its diagnostic sink.
    pub fn into_diagnostics(self) -> D {
        self.diag
    }

    /// Run one parsed command line.
    ///
    /// A blank line does nothing. Otherwise the command name is looked up among
    /// the builtins and, failing that, started as an external program.
    pub fn execute(&mut self, args: &TokenSequence) -> CommandOutcome {
        let Some(name) = args.command_name() else {
            return CommandOutcome::Continue;
        };

        match builtin::lookup(name) {
            Some(builtin) => {
                debug!(builtin = builtin.name(), "running builtin");
                builtin.invoke(args, &mut self.diag)
            }
            None => external::launch(args, &mut self.diag),
        }
    }

    /// Prompt, read, tokenize and dispatch a single line.
    ///
    /// Returns the state after the iteration. Calling `step` on a stopped
    /// interpreter reads nothing.
    pub fn step(&mut self, source: &mut dyn LineSource) -> Result<LoopState, ShellError> {
        if !self.state.is_running() {
            return Ok(self.state);
        }

        let line = match source.read_line(PROMPT) {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("end of input");
                self.state = LoopState::Stopped(Disposition::Clean);
                return Ok(self.state);
            }
            Err(err) => {
                debug!(%err, "failed to read input");
                self.state = LoopState::Stopped(Disposition::Failed);
                let err = ShellError::Read(err);
                report(&mut self.diag, &err);
                return Err(err);
            }
        };

        let tokens = match split_into_tokens(&line) {
            Ok(tokens) => tokens,
            Err(err) => {
                debug!(%err, "skipping line");
                report(&mut self.diag, format_args!("failed to split line: {err}"));
                return Ok(self.state);
            }
        };

        if !self.execute(&tokens).should_continue() {
            debug!(command = ?tokens.command_name(), "command requested termination");
            self.state = LoopState::Stopped(Disposition::Clean);
        }
        Ok(self.state)
    }

    /// Read–eval loop: run [`Interpreter::step`] until the shell stops.
    ///
    /// Returns `Ok` on end of input or `exit`, and the read error when the input
    /// source fails.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> Result<(), ShellError> {
        while self.state.is_running() {
            self.step(source)?;
        }
        Ok(())
    }
}
