use std::fmt::Display;
use std::io::Write;

/// Prompt marker written before every read.
pub const PROMPT: &str = "$ ";

/// Prefix of every one-line diagnostic written by the shell.
const DIAGNOSTIC_PREFIX: &str = "$";

/// Signal returned by every executed command, builtin or external.
///
/// The loop keeps reading lines while commands return [`CommandOutcome::Continue`]
/// and stops after the first [`CommandOutcome::Terminate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Terminate,
}

impl CommandOutcome {
    pub fn should_continue(self) -> bool {
        self == CommandOutcome::Continue
    }
}

/// Write a single diagnostic line to `diag`.
///
/// A broken diagnostic stream is logged and otherwise ignored: losing a message
/// must not take the shell down.
pub(crate) fn report(diag: &mut dyn Write, message: impl Display) {
    if let Err(err) = writeln!(diag, "{DIAGNOSTIC_PREFIX}: {message}") {
        tracing::warn!(%err, "failed to write diagnostic");
    }
}
