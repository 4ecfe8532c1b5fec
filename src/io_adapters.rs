use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// Where the shell gets its input lines from.
pub trait LineSource {
    /// Show `prompt` and read one line as raw bytes.
    ///
    /// Returns `Ok(None)` once the input is exhausted. Any error is treated by
    /// the shell as fatal.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Line source over a plain byte stream such as a pipe or redirected file.
///
/// The prompt is written and flushed to `prompt_out` before every read. A
/// prompt that cannot be written is logged and skipped; only input errors are
/// returned.
pub struct StreamSource<R, W> {
    input: R,
    prompt_out: W,
    prompt_failed: bool,
}

impl<R: BufRead, W: Write> StreamSource<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Self {
            input,
            prompt_out,
            prompt_failed: false,
        }
    }

    /// Give back the prompt writer, e.g. to inspect what a test wrote to it.
    pub fn into_prompt_out(self) -> W {
        self.prompt_out
    }
}

impl<R: BufRead, W: Write> LineSource for StreamSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<Vec<u8>>> {
        let shown = self
            .prompt_out
            .write_all(prompt.as_bytes())
            .and_then(|()| self.prompt_out.flush());
        if let Err(err) = shown {
            // Warn once per source.
            if !self.prompt_failed {
                warn!(%err, "failed to write prompt");
                self.prompt_failed = true;
            } else {
                debug!(%err, "failed to write prompt");
            }
        }

        let mut buf = Vec::new();
        match self.input.read_until(b'\n', &mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf)),
        }
    }
}

/// Interactive line source backed by a line editor with in-memory history.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<Vec<u8>>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor
                        .add_history_entry(line.as_str())
                        .map_err(io::Error::other)?;
                }
                Ok(Some(line.into_bytes()))
            }
            // Ctrl-C drops the line being edited and brings back the prompt.
            Err(ReadlineError::Interrupted) => {
                debug!("line discarded by interrupt");
                Ok(Some(Vec::new()))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(err) => Err(io::Error::other(err)),
        }
    }
}
