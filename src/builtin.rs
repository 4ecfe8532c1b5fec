use crate::command::{CommandOutcome, report};
use crate::lexer::TokenSequence;
use std::env;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are executed directly in-process without spawning a child process.
/// They receive the whole token sequence, so `args[0]` is the command's own name.
pub trait BuiltinCommand: Sync {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name(&self) -> &'static str;

    /// Executes the command.
    fn execute(&self, args: &TokenSequence) -> Result<CommandOutcome, BuiltinError>;

    /// Executes the command, reporting a failure to `diag` instead of returning it.
    ///
    /// A failed builtin never stops the shell.
    fn invoke(&self, args: &TokenSequence, diag: &mut dyn Write) -> CommandOutcome {
        match self.execute(args) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(builtin = self.name(), %err, "builtin failed");
                report(diag, &err);
                CommandOutcome::Continue
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    #[error("expected argument to \"{command}\"")]
    MissingArgument { command: &'static str },

    #[error("{command}: {}: {source}", .path.display())]
    ChangeDir {
        command: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

static BUILTINS: [&dyn BuiltinCommand; 2] = [&Cd, &Exit];

/// Find the builtin called exactly `name`.
pub fn lookup(name: impl AsRef<OsStr>) -> Option<&'static dyn BuiltinCommand> {
    let name = name.as_ref();
    BUILTINS.iter().copied().find(|builtin| name == builtin.name())
}

/// Change the working directory of the shell process to `args[1]`.
///
/// Further arguments are ignored. Children spawned afterwards inherit the new
/// directory.
pub struct Cd;

impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(&self, args: &TokenSequence) -> Result<CommandOutcome, BuiltinError> {
        let Some(target) = args.get(1) else {
            return Err(BuiltinError::MissingArgument {
                command: self.name(),
            });
        };

        env::set_current_dir(target).map_err(|source| BuiltinError::ChangeDir {
            command: self.name(),
            path: PathBuf::from(target),
            source,
        })?;
        debug!(?target, "changed working directory");
        Ok(CommandOutcome::Continue)
    }
}

/// Stop the shell. Arguments are ignored.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(&self, _args: &TokenSequence) -> Result<CommandOutcome, BuiltinError> {
        Ok(CommandOutcome::Terminate)
    }
}
