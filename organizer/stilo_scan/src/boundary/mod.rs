//! Body-start location: where does a declaration's body begin?
//!
//! After a declaration header (or a constructor's parameter list) there may
//! be arbitrary code before the body opens: superclass clauses, mixin
//! applications, initializer lists, strings containing `{`. Rather than
//! re-tokenizing, the locator walks forward from a given offset and uses the
//! pair table to jump over every nested construct in O(1) per construct.

use crate::pair::PairTable;

/// How a declaration's body begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyStart {
    /// Offset of the `{` opening a braced body.
    Brace(u32),
    /// Offset of a terminating `;` (a body-less declaration, e.g. a
    /// redirecting constructor or an alias).
    Semicolon(u32),
}

/// Walk forward from `from` and return the first `{` or `;` that is not
/// nested inside any construct recorded in the pair table.
///
/// A `{` that the scanner recorded as a pair opener is still returned as
/// [`BodyStart::Brace`]: the check for an interesting character precedes the
/// jump, so the body's own brace is found rather than skipped. Returns
/// `None` when the end of the buffer is reached first.
pub fn find_body_start(source: &str, pairs: &PairTable, from: u32) -> Option<BodyStart> {
    let bytes = source.as_bytes();
    let mut offset = from;
    while (offset as usize) < bytes.len() {
        match bytes[offset as usize] {
            b'{' => return Some(BodyStart::Brace(offset)),
            b';' => return Some(BodyStart::Semicolon(offset)),
            _ => {}
        }
        if let Some(rec) = pairs.by_open_offset(offset) {
            offset = rec.close_offset + 1;
        } else {
            offset += 1;
        }
    }
    None
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
