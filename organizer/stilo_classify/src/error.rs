//! Classification errors.
//!
//! These indicate that a body uses a construct the classifier's heuristics
//! do not recognize. Unlike scan errors they abort only the declaration
//! being classified, not the whole buffer: the caller skips that
//! declaration and leaves its text untouched.

use stilo_scan::LineTag;
use thiserror::Error;

/// Per-declaration classification failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// An offset that must be a pair opener has no pair table record.
    #[error("no pair record for `{token}` at offset {offset} (line {line})")]
    MissingPair {
        token: &'static str,
        offset: u32,
        line: usize,
    },

    /// A later pass tried to claim a line already owned by an earlier one.
    /// Absorbable tags (blank, comments) are folded silently; anything else
    /// has no repair rule and fails loudly here.
    #[error("line {line} is already classified as {prior:?}, refusing to retag as {new:?}: {text}")]
    ConflictingTags {
        prior: LineTag,
        new: LineTag,
        line: usize,
        text: String,
    },

    /// A member's terminator was never found before the body ended.
    #[error("reached the end of the body at line {line} while looking for {looking_for}")]
    UnexpectedEndOfBody {
        looking_for: &'static str,
        line: usize,
    },
}
