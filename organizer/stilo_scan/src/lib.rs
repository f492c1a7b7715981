//! Line-level scanner for Dart-style source.
//!
//! This crate is the lexical half of `stilo`: a single forward pass over a
//! raw buffer that produces, for every physical line, the *class-level view*
//! of its text (the subsequence of characters that are live code at the
//! exact brace depth of a class body), together with an exact mapping from
//! each such character back to its absolute byte offset in the buffer.
//!
//! It is deliberately not a tokenizer for the full language. It tracks just
//! enough lexical context (quotes, string interpolation, nested block
//! comments, parens, braces) to know *where* code is, not *what* it says:
//!
//! - [`scan`] walks the buffer once and fills the [`Line`] store, the
//!   [`PairTable`] of matching open/close tokens, and the list of candidate
//!   declaration header lines.
//! - [`find_body_start`] locates a declaration's body-opening `{` (or the
//!   terminating `;` of an alias declaration) by jumping over nested
//!   constructs via the pair table.
//!
//! Input is tolerated as long as brace/paren/quote nesting is well-formed;
//! anything unbalanced at end of input is a fatal [`ScanError`].

mod boundary;
mod error;
mod line;
mod pair;
mod scanner;

pub use boundary::{find_body_start, BodyStart};
pub use error::ScanError;
pub use line::{split_lines, Line, LineTag};
pub use pair::{PairIdx, PairRecord, PairTable, PairToken};
pub use scanner::{scan, ScanResult};
