//! Lexical analysis of a single input line.
//!
//! The shell has no quoting, escaping or substitutions: a line is split on runs
//! of delimiter bytes and every non-empty piece becomes a token. Lines are raw
//! bytes, so names that are not valid UTF-8 reach `chdir` and `execvp` intact.

use std::collections::TryReserveError;
use std::ffi::{OsStr, OsString};
use std::ops::Deref;

/// Bytes that separate tokens. They never appear inside a token.
pub const DELIMITERS: [u8; 5] = *b" \t\r\n\x07";

/// Number of token slots reserved up front; the container doubles when full.
const INITIAL_CAPACITY: usize = 64;

/// Ordered tokens of one input line. Token 0, when present, is the command name.
///
/// Dereferences to `[OsString]`, so the usual slice API (`len`, `first`,
/// `split_first`, indexing, ...) is available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Vec<OsString>,
}

impl TokenSequence {
    /// Name of the command to run, `None` for a blank line.
    pub fn command_name(&self) -> Option<&OsStr> {
        self.tokens.first().map(OsString::as_os_str)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[OsString] {
        self.tokens.get(1..).unwrap_or_default()
    }
}

impl Deref for TokenSequence {
    type Target = [OsString];

    fn deref(&self) -> &[OsString] {
        &self.tokens
    }
}

/// Errors that can occur while tokenizing a line.
#[derive(Debug, thiserror::Error)]
pub enum LexingError {
    /// The token container could not grow.
    #[error("allocation error: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Whether `byte` separates tokens.
pub fn is_delimiter(byte: u8) -> bool {
    DELIMITERS.contains(&byte)
}

#[cfg(unix)]
fn to_os_string(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(bytes).to_owned()
}

#[cfg(not(unix))]
fn to_os_string(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Split `line` into tokens.
///
/// Runs of delimiters collapse into a single split point and leading or trailing
/// delimiters produce no empty tokens, so a blank line yields an empty sequence.
/// There is no upper bound on the number of tokens; the only failure is running
/// out of memory while growing the container.
pub fn split_into_tokens(line: impl AsRef<[u8]>) -> Result<TokenSequence, LexingError> {
    let mut tokens: Vec<OsString> = Vec::new();
    tokens.try_reserve_exact(INITIAL_CAPACITY)?;

    for token in line
        .as_ref()
        .split(|byte| is_delimiter(*byte))
        .filter(|t| !t.is_empty())
    {
        if tokens.len() == tokens.capacity() {
            let additional = tokens.capacity();
            tokens.try_reserve_exact(additional)?;
        }
        tokens.push(to_os_string(token));
    }

    Ok(TokenSequence { tokens })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn as_strs(tokens: &TokenSequence) -> Vec<&str> {
        tokens.iter().map(|t| t.to_str().unwrap()).collect()
    }

    #[test]
    fn test_simple_command() {
        let tokens = split_into_tokens("echo hello world\n").unwrap();
        assert_eq!(*tokens, ["echo", "hello", "world"]);
        assert_eq!(tokens.command_name(), Some(OsStr::new("echo")));
        assert_eq!(tokens.args(), ["hello", "world"]);
    }

    #[test]
    fn test_mixed_and_repeated_delimiters() {
        let tokens = split_into_tokens("ls\t\t-la  /tmp").unwrap();
        assert_eq!(*tokens, ["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_leading_and_trailing_delimiters() {
        let tokens = split_into_tokens(" \t\x07cd /\r\n").unwrap();
        assert_eq!(*tokens, ["cd", "/"]);
    }

    #[test]
    fn test_empty_line() {
        let tokens = split_into_tokens("").unwrap();
        assert!(tokens.is_empty());
        assert_eq!(tokens.command_name(), None);
        assert!(tokens.args().is_empty());
    }

    #[test]
    fn test_bell_is_a_delimiter_but_vertical_tab_is_not() {
        let tokens = split_into_tokens("a\x07b\x0bc").unwrap();
        assert_eq!(*tokens, ["a", "b\x0bc"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_bytes_are_kept() {
        use std::os::unix::ffi::OsStrExt;

        let tokens = split_into_tokens(b"mkdir caf\xe9\n").unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].as_bytes(), b"caf\xe9");
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let line = (0..1000).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let tokens = split_into_tokens(&line).unwrap();
        assert_eq!(tokens.len(), 1000);
        assert_eq!(tokens[0], "0");
        assert_eq!(tokens[INITIAL_CAPACITY], INITIAL_CAPACITY.to_string().as_str());
        assert_eq!(tokens[999], "999");
    }

    proptest! {
        #[test]
        fn delimiter_only_lines_are_empty(line in "[ \t\r\n\x07]*") {
            prop_assert!(split_into_tokens(&line).unwrap().is_empty());
        }

        #[test]
        fn matches_split_on_delimiter_runs(line in "[a-z/.\\- \t\r\n\x07]{0,80}") {
            let tokens = split_into_tokens(&line).unwrap();
            let expected: Vec<&str> = line
                .split([' ', '\t', '\r', '\n', '\x07'])
                .filter(|t| !t.is_empty())
                .collect();
            prop_assert_eq!(as_strs(&tokens), expected);
        }

        #[test]
        fn tokens_never_contain_delimiters(line in proptest::collection::vec(any::<u8>(), 0..80)) {
            for token in split_into_tokens(&line).unwrap().iter() {
                prop_assert!(!token.is_empty());
                prop_assert!(!token.as_encoded_bytes().iter().any(|b| is_delimiter(*b)));
            }
        }
    }
}
