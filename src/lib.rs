//! A tiny interactive command interpreter.
//!
//! The crate implements the classic read–tokenize–dispatch–execute loop of a
//! minimal Unix shell: a line is read from a [`LineSource`], split into a
//! [`TokenSequence`], and either handled in-process by a builtin (`cd`, `exit`)
//! or launched as an external program that the shell waits for synchronously.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`] and
//! [`lexer`] expose the outcome type and the tokenizer for reuse and testing.

mod builtin;
pub mod command;
mod external;
mod interpreter;
mod io_adapters;
pub mod lexer;

pub use builtin::{BuiltinCommand, BuiltinError, lookup};
pub use command::{CommandOutcome, PROMPT};
pub use external::{ChildStatus, LaunchError, launch};
pub use interpreter::{Disposition, Interpreter, LoopState, ShellError};
pub use io_adapters::{EditorSource, LineSource, StreamSource};
pub use lexer::{LexingError, TokenSequence, split_into_tokens};
