//! The pair table: an arena of matching open/close token records.
//!
//! Built once by the scanner and queried read-only afterward. Records are
//! appended when an opening token is accepted and finalized when its closer
//! is seen; parent links are plain indices into the arena, so the table can
//! be shared across analyses of independent declarations without any
//! interior mutability.

use rustc_hash::FxHashMap;

/// Index of a [`PairRecord`] in the arena.
pub type PairIdx = usize;

/// Kind of opening token a pair record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairToken {
    Brace,
    Paren,
    /// A `${` string interpolation marker; its closer is the matching `}`.
    Interpolation,
    SingleQuote,
    DoubleQuote,
    TripleSingleQuote,
    TripleDoubleQuote,
}

impl PairToken {
    /// Source spelling of the opening token.
    pub fn open_label(self) -> &'static str {
        match self {
            PairToken::Brace => "{",
            PairToken::Paren => "(",
            PairToken::Interpolation => "${",
            PairToken::SingleQuote => "'",
            PairToken::DoubleQuote => "\"",
            PairToken::TripleSingleQuote => "'''",
            PairToken::TripleDoubleQuote => "\"\"\"",
        }
    }
}

/// One matched open/close token pair.
///
/// `close_offset`/`close_line` are placeholders (equal to the open fields)
/// until the scanner sees the matching closer; a successful scan finalizes
/// every record, so consumers of a [`crate::ScanResult`] never observe a
/// half-built one.
#[derive(Clone, Debug)]
pub struct PairRecord {
    pub token: PairToken,
    pub open_offset: u32,
    pub close_offset: u32,
    pub open_line: usize,
    pub close_line: usize,
    /// Number of enclosing open pairs at the time this one opened.
    pub depth: u32,
    /// Innermost enclosing pair, if any.
    pub parent: Option<PairIdx>,
}

/// Append-only arena of [`PairRecord`]s, indexable by open offset.
#[derive(Clone, Debug, Default)]
pub struct PairTable {
    records: Vec<PairRecord>,
    by_open_offset: FxHashMap<u32, PairIdx>,
}

impl PairTable {
    pub(crate) fn open(
        &mut self,
        token: PairToken,
        open_offset: u32,
        open_line: usize,
        depth: u32,
        parent: Option<PairIdx>,
    ) -> PairIdx {
        let idx = self.records.len();
        self.records.push(PairRecord {
            token,
            open_offset,
            close_offset: open_offset,
            open_line,
            close_line: open_line,
            depth,
            parent,
        });
        self.by_open_offset.insert(open_offset, idx);
        idx
    }

    pub(crate) fn close(&mut self, idx: PairIdx, close_offset: u32, close_line: usize) {
        let rec = &mut self.records[idx];
        rec.close_offset = close_offset;
        rec.close_line = close_line;
    }

    /// The record at `idx`.
    pub fn get(&self, idx: PairIdx) -> &PairRecord {
        &self.records[idx]
    }

    /// The record whose opening token starts at `open_offset`, if any.
    pub fn by_open_offset(&self, open_offset: u32) -> Option<&PairRecord> {
        self.by_open_offset
            .get(&open_offset)
            .map(|&idx| &self.records[idx])
    }

    /// All records in open order.
    pub fn records(&self) -> &[PairRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_then_close_finalizes_the_record() {
        let mut table = PairTable::default();
        let outer = table.open(PairToken::Brace, 0, 0, 0, None);
        let inner = table.open(PairToken::Paren, 4, 0, 1, Some(outer));
        table.close(inner, 7, 0);
        table.close(outer, 9, 1);

        let rec = table.by_open_offset(4).unwrap();
        assert_eq!(rec.token, PairToken::Paren);
        assert_eq!(rec.close_offset, 7);
        assert_eq!(rec.parent, Some(outer));
        assert_eq!(table.get(outer).close_offset, 9);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn missing_offset_returns_none() {
        let table = PairTable::default();
        assert!(table.by_open_offset(3).is_none());
        assert!(table.is_empty());
    }
}
