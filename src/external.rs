use crate::command::{CommandOutcome, report};
use crate::lexer::TokenSequence;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Child, Command};
use tracing::debug;

/// Command that is not a builtin.
///
/// The program name is resolved through `PATH` the way `execvp` does, and the
/// child inherits the shell's standard streams and working directory.
pub struct ExternalCommand {
    name: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(name: OsString, args: Vec<OsString>) -> Self {
        Self { name, args }
    }

    /// Build a command from a token sequence; `None` when it is empty.
    pub fn from_tokens(tokens: &TokenSequence) -> Option<Self> {
        let (name, args) = tokens.split_first()?;
        Some(Self::new(name.clone(), args.to_vec()))
    }

    /// Start the program and block until it has exited or been killed.
    pub fn run(self) -> Result<ChildStatus, LaunchError> {
        let child = Command::new(&self.name)
            .args(&self.args)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.name.clone(),
                source,
            })?;
        debug!(pid = child.id(), program = ?self.name, "spawned child");
        wait_for_exit(child)
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// Exited normally with the given status.
    Exited(i32),
    /// Killed by the given signal number.
    Signaled(i32),
}

impl ChildStatus {
    /// Shell-style exit code: the exit status itself, or 128 + signal number.
    pub fn code(self) -> i32 {
        match self {
            ChildStatus::Exited(code) => code,
            ChildStatus::Signaled(signal) => 128 + signal,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("{}: {source}", .program.to_string_lossy())]
    Spawn {
        program: OsString,
        #[source]
        source: io::Error,
    },

    #[error("waiting for process {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: io::Error,
    },
}

/// Run the external program named by `args[0]` and wait for it.
///
/// Always returns [`CommandOutcome::Continue`]: a program that cannot be started
/// is reported to `diag`, and the program's own exit never stops the shell.
pub fn launch(args: &TokenSequence, diag: &mut dyn Write) -> CommandOutcome {
    let Some(command) = ExternalCommand::from_tokens(args) else {
        return CommandOutcome::Continue;
    };

    match command.run() {
        Ok(status) => debug!(?status, code = status.code(), "child finished"),
        Err(err) => {
            debug!(%err, "launch failed");
            report(diag, &err);
        }
    }
    CommandOutcome::Continue
}

/// Wait for `child` to exit or be killed by a signal.
///
/// Stop and continue notifications are observed but do not end the wait, so a
/// stopped child keeps the shell blocked until it is resumed and finishes.
#[cfg(unix)]
fn wait_for_exit(child: Child) -> Result<ChildStatus, LaunchError> {
    use nix::errno::Errno;
    use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
    use nix::unistd::Pid;

    let id = child.id();
    let pid = Pid::from_raw(id as i32);
    loop {
        let status = match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => status,
            Err(Errno::EINTR) => continue,
            Err(errno) => {
                return Err(LaunchError::Wait {
                    pid: id,
                    source: io::Error::from(errno),
                });
            }
        };
        debug!(pid = id, ?status, "waiting for process");

        match status {
            WaitStatus::Exited(_, code) => return Ok(ChildStatus::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => return Ok(ChildStatus::Signaled(signal as i32)),
            _ => {}
        }
    }
}

#[cfg(not(unix))]
fn wait_for_exit(mut child: Child) -> Result<ChildStatus, LaunchError> {
    let pid = child.id();
    debug!(pid, "waiting for process");
    let exit_status = child
        .wait()
        .map_err(|source| LaunchError::Wait { pid, source })?;
    Ok(ChildStatus::Exited(exit_status.code().unwrap_or(-1)))
}
