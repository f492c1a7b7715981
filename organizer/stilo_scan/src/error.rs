//! Scan errors: malformed input detected during the forward pass.
//!
//! Every variant carries the approximate cursor state (byte offset and
//! 1-based line number) so callers can point at the problem without
//! re-scanning. These are fatal for the whole buffer: classification
//! never starts on a buffer that failed to scan.

use thiserror::Error;

/// Malformed-input error raised by [`crate::scan`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("unterminated {quote} string opened at offset {open_offset} (line {line})")]
    UnterminatedString {
        quote: &'static str,
        open_offset: u32,
        line: usize,
    },

    #[error("unterminated block comment opened at offset {open_offset} (line {line})")]
    UnterminatedComment { open_offset: u32, line: usize },

    #[error("unmatched `*/` at offset {offset} (line {line})")]
    UnmatchedCommentClose { offset: u32, line: usize },

    #[error("unmatched `}}` at offset {offset} (line {line})")]
    UnmatchedCloseBrace { offset: u32, line: usize },

    #[error("unmatched `)` at offset {offset} (line {line})")]
    UnmatchedCloseParen { offset: u32, line: usize },

    #[error("`${{` outside of any string at offset {offset} (line {line})")]
    InterpolationOutsideString { offset: u32, line: usize },

    #[error("`(` opened at offset {open_offset} (line {line}) is still open when its enclosing interpolation closes")]
    UnclosedParenInInterpolation { open_offset: u32, line: usize },

    #[error("unclosed `{token}` at end of input, opened at offset {open_offset} (line {line}); open nesting: {nesting}")]
    UnclosedAtEof {
        token: &'static str,
        open_offset: u32,
        line: usize,
        nesting: String,
    },
}
