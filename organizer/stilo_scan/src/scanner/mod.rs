//! Single-pass scanner producing the line store and pair table.
//!
//! The scanner walks the buffer once, left to right, with bounded lookahead
//! (at most two bytes, for `//` vs `/`, `/*` vs `/`, `'''` vs `'` and
//! `${` vs `$`). It carries the full lexical context across lines:
//!
//! - a stack of *brace contexts*, each either an ordinary code block or a
//!   resumed string interpolation (the `}` that closes a `${` re-enters the
//!   interrupted string);
//! - at most one active string mode out of four (single/double quoted,
//!   triple-single/triple-double quoted), plus a raw-string latch set when
//!   the opening quote was immediately preceded by `r`;
//! - a nestable block-comment depth.
//!
//! A character is appended to its line's class-level view exactly when the
//! paren depth is zero and the brace stack holds exactly one `Normal` frame,
//! i.e. the character sits directly inside a class body. The newline between
//! physical lines acts as a single space, so no token ever spans lines.

use smallvec::SmallVec;

use crate::error::ScanError;
use crate::line::{split_lines, Line, LineTag};
use crate::pair::{PairIdx, PairTable, PairToken};

/// Everything the scanner produces for one buffer.
#[derive(Clone, Debug)]
pub struct ScanResult {
    /// One record per physical line, class-level views populated.
    pub lines: Vec<Line>,
    /// All matched open/close token pairs.
    pub pairs: PairTable,
    /// Indices of lines where a `class`/`mixin`/`enum` header begins at the
    /// top brace level.
    pub declaration_lines: Vec<usize>,
}

/// Scan a buffer in a single forward pass.
///
/// Returns the populated line store, the pair table, and the candidate
/// declaration header lines. Fails fast with a [`ScanError`] on malformed
/// input (unterminated strings/comments, unmatched closers, `${` outside a
/// string, anything still open at end of input).
pub fn scan(source: &str) -> Result<ScanResult, ScanError> {
    Scanner::new(source).run()
}

/// Active string mode. At most one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QuoteMode {
    Single,
    Double,
    TripleSingle,
    TripleDouble,
}

impl QuoteMode {
    fn quote_byte(self) -> u8 {
        match self {
            QuoteMode::Single | QuoteMode::TripleSingle => b'\'',
            QuoteMode::Double | QuoteMode::TripleDouble => b'"',
        }
    }

    fn is_triple(self) -> bool {
        matches!(self, QuoteMode::TripleSingle | QuoteMode::TripleDouble)
    }

    fn token(self) -> PairToken {
        match self {
            QuoteMode::Single => PairToken::SingleQuote,
            QuoteMode::Double => PairToken::DoubleQuote,
            QuoteMode::TripleSingle => PairToken::TripleSingleQuote,
            QuoteMode::TripleDouble => PairToken::TripleDoubleQuote,
        }
    }
}

/// One entry of the brace-context stack.
struct BraceFrame {
    pair: PairIdx,
    kind: FrameKind,
}

enum FrameKind {
    /// Ordinary `{ ... }` code block.
    Normal,
    /// `${ ... }`; closing this frame resumes the interrupted string.
    Interpolation {
        resume: QuoteMode,
        raw: bool,
        string_pair: Option<PairIdx>,
        saved_paren_depth: u32,
        saved_paren_count: usize,
    },
}

struct Scanner<'a> {
    source: &'a str,
    src: &'a [u8],
    /// Index of the line currently being scanned.
    line: usize,
    lines: Vec<Line>,
    pairs: PairTable,
    declaration_lines: Vec<usize>,
    /// All currently open pairs, innermost last.
    context: Vec<PairIdx>,
    braces: SmallVec<[BraceFrame; 8]>,
    open_parens: Vec<PairIdx>,
    paren_depth: u32,
    quote: Option<QuoteMode>,
    string_pair: Option<PairIdx>,
    raw_string: bool,
    comment_depth: u32,
    /// Offset and line of the outermost open block comment.
    comment_open: Option<(u32, usize)>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            src: source.as_bytes(),
            line: 0,
            lines: split_lines(source),
            pairs: PairTable::default(),
            declaration_lines: Vec::new(),
            context: Vec::new(),
            braces: SmallVec::new(),
            open_parens: Vec::new(),
            paren_depth: 0,
            quote: None,
            string_pair: None,
            raw_string: false,
            comment_depth: 0,
            comment_open: None,
        }
    }

    fn run(mut self) -> Result<ScanResult, ScanError> {
        for li in 0..self.lines.len() {
            self.line = li;
            self.start_line(li);
            self.scan_line(li)?;
        }
        self.finish()
    }

    /// Per-line bookkeeping before any character is consumed: comment
    /// tagging for lines that begin inside a block comment, the
    /// string/comment marker, and declaration header detection at the top
    /// brace level.
    fn start_line(&mut self, li: usize) {
        let line = &mut self.lines[li];
        if self.comment_depth > 0 {
            line.in_string_or_comment = true;
            if line.tag == LineTag::Unclassified {
                line.tag = LineTag::BlockComment;
            }
            return;
        }
        if self.quote.is_some() {
            line.in_string_or_comment = true;
            return;
        }
        if self.braces.is_empty()
            && self.paren_depth == 0
            && is_declaration_header(line.stripped())
        {
            self.declaration_lines.push(li);
        }
    }

    fn scan_line(&mut self, li: usize) -> Result<(), ScanError> {
        let start = self.lines[li].start_offset as usize;
        let end = self.lines[li].end_offset as usize;
        let mut j = start;
        while j < end {
            if self.comment_depth > 0 {
                j = self.scan_comment_byte(j, end);
                continue;
            }
            if let Some(mode) = self.quote {
                j = self.scan_string_byte(mode, j, end);
                continue;
            }
            match self.src[j] {
                b'/' if self.peek(j + 1, end) == Some(b'/') => {
                    self.line_comment(li);
                    break;
                }
                b'/' if self.peek(j + 1, end) == Some(b'*') => {
                    self.open_block_comment(li, j);
                    j += 2;
                }
                b'*' if self.peek(j + 1, end) == Some(b'/') => {
                    return Err(ScanError::UnmatchedCommentClose {
                        offset: off32(j),
                        line: li + 1,
                    });
                }
                b'\'' | b'"' => {
                    j = self.open_string(j, end);
                }
                b'$' if self.peek(j + 1, end) == Some(b'{') => {
                    return Err(ScanError::InterpolationOutsideString {
                        offset: off32(j),
                        line: li + 1,
                    });
                }
                b'(' => {
                    self.open_paren(li, j);
                    j += 1;
                }
                b')' => {
                    self.close_paren(li, j)?;
                    j += 1;
                }
                b'{' => {
                    self.open_brace(li, j);
                    j += 1;
                }
                b'}' => {
                    self.close_brace(li, j)?;
                    j += 1;
                }
                b => {
                    let len = utf8_len(b);
                    if self.at_class_level() {
                        self.append_live(li, j, (j + len).min(end));
                    }
                    j += len;
                }
            }
        }
        Ok(())
    }

    // === Comments ===

    fn scan_comment_byte(&mut self, j: usize, end: usize) -> usize {
        match (self.src[j], self.peek(j + 1, end)) {
            (b'*', Some(b'/')) => {
                self.comment_depth -= 1;
                if self.comment_depth == 0 {
                    self.comment_open = None;
                }
                j + 2
            }
            (b'/', Some(b'*')) => {
                self.comment_depth += 1;
                j + 2
            }
            _ => j + 1,
        }
    }

    fn line_comment(&mut self, li: usize) {
        let line = &mut self.lines[li];
        if line.tag == LineTag::Unclassified && line.class_level_text.trim().is_empty() {
            line.tag = LineTag::LineComment;
        }
    }

    fn open_block_comment(&mut self, li: usize, j: usize) {
        self.comment_depth = 1;
        self.comment_open = Some((off32(j), li));
        let line = &mut self.lines[li];
        if line.tag == LineTag::Unclassified && off32(j) == line.stripped_offset {
            line.tag = LineTag::BlockComment;
        }
    }

    // === Strings & Interpolation ===

    fn open_string(&mut self, j: usize, end: usize) -> usize {
        let q = self.src[j];
        let triple = self.peek(j + 1, end) == Some(q) && self.peek(j + 2, end) == Some(q);
        let mode = match (q, triple) {
            (b'\'', false) => QuoteMode::Single,
            (b'\'', true) => QuoteMode::TripleSingle,
            (b'"', false) => QuoteMode::Double,
            (_, true) => QuoteMode::TripleDouble,
            (_, false) => QuoteMode::Double,
        };
        self.raw_string = j > 0 && self.src[j - 1] == b'r';
        let pair = self.open_pair(mode.token(), j);
        self.string_pair = Some(pair);
        self.quote = Some(mode);
        if triple {
            j + 3
        } else {
            j + 1
        }
    }

    fn scan_string_byte(&mut self, mode: QuoteMode, j: usize, end: usize) -> usize {
        let b = self.src[j];
        // an escape consumes the next byte, so `\'` and `\$` stay content;
        // raw strings have no escapes. A trailing `\` never reaches past the
        // line: the caller's bound stops at the newline.
        if !self.raw_string && b == b'\\' {
            return j + 2;
        }
        if !self.raw_string && b == b'$' && self.peek(j + 1, end) == Some(b'{') {
            self.suspend_for_interpolation(mode, j);
            return j + 2;
        }
        if b == mode.quote_byte() {
            if mode.is_triple() {
                if self.peek(j + 1, end) == Some(b) && self.peek(j + 2, end) == Some(b) {
                    self.close_string(j, 3);
                    return j + 3;
                }
            } else {
                self.close_string(j, 1);
                return j + 1;
            }
        }
        j + 1
    }

    fn close_string(&mut self, j: usize, token_len: usize) {
        if let Some(idx) = self.string_pair.take() {
            self.close_pair(idx, j + token_len - 1);
        }
        self.quote = None;
        self.raw_string = false;
    }

    fn suspend_for_interpolation(&mut self, mode: QuoteMode, j: usize) {
        let pair = self.open_pair(PairToken::Interpolation, j);
        self.braces.push(BraceFrame {
            pair,
            kind: FrameKind::Interpolation {
                resume: mode,
                raw: self.raw_string,
                string_pair: self.string_pair.take(),
                saved_paren_depth: self.paren_depth,
                saved_paren_count: self.open_parens.len(),
            },
        });
        self.quote = None;
        self.raw_string = false;
        self.paren_depth = 0;
    }

    // === Parens & Braces ===

    fn open_paren(&mut self, li: usize, j: usize) {
        if self.at_class_level() {
            self.append_live(li, j, j + 1);
        }
        let pair = self.open_pair(PairToken::Paren, j);
        self.open_parens.push(pair);
        self.paren_depth += 1;
    }

    fn close_paren(&mut self, li: usize, j: usize) -> Result<(), ScanError> {
        let Some(idx) = self.open_parens.pop() else {
            return Err(ScanError::UnmatchedCloseParen {
                offset: off32(j),
                line: li + 1,
            });
        };
        if self.paren_depth == 0 {
            return Err(ScanError::UnmatchedCloseParen {
                offset: off32(j),
                line: li + 1,
            });
        }
        self.paren_depth -= 1;
        self.close_pair(idx, j);
        if self.at_class_level() {
            self.append_live(li, j, j + 1);
        }
        Ok(())
    }

    fn open_brace(&mut self, li: usize, j: usize) {
        if self.at_class_level() {
            self.append_live(li, j, j + 1);
        }
        let pair = self.open_pair(PairToken::Brace, j);
        self.braces.push(BraceFrame {
            pair,
            kind: FrameKind::Normal,
        });
    }

    fn close_brace(&mut self, li: usize, j: usize) -> Result<(), ScanError> {
        let Some(frame) = self.braces.pop() else {
            return Err(ScanError::UnmatchedCloseBrace {
                offset: off32(j),
                line: li + 1,
            });
        };
        self.close_pair(frame.pair, j);
        match frame.kind {
            FrameKind::Normal => {
                if self.at_class_level() {
                    self.append_live(li, j, j + 1);
                }
            }
            FrameKind::Interpolation {
                resume,
                raw,
                string_pair,
                saved_paren_depth,
                saved_paren_count,
            } => {
                if self.open_parens.len() > saved_paren_count {
                    if let Some(&inner) = self.open_parens.last() {
                        let rec = self.pairs.get(inner);
                        return Err(ScanError::UnclosedParenInInterpolation {
                            open_offset: rec.open_offset,
                            line: rec.open_line + 1,
                        });
                    }
                }
                self.quote = Some(resume);
                self.raw_string = raw;
                self.string_pair = string_pair;
                self.paren_depth = saved_paren_depth;
            }
        }
        Ok(())
    }

    // === Shared Helpers ===

    fn peek(&self, j: usize, end: usize) -> Option<u8> {
        if j < end {
            Some(self.src[j])
        } else {
            None
        }
    }

    /// `true` exactly when characters at the cursor are directly inside a
    /// class body: paren depth zero, one brace frame, and that frame Normal.
    fn at_class_level(&self) -> bool {
        self.paren_depth == 0
            && self.braces.len() == 1
            && matches!(self.braces[0].kind, FrameKind::Normal)
    }

    fn append_live(&mut self, li: usize, from: usize, to: usize) {
        let source = self.source;
        let line = &mut self.lines[li];
        line.class_level_text.push_str(&source[from..to]);
        line.class_level_offsets.extend((from..to).map(off32));
    }

    fn open_pair(&mut self, token: PairToken, offset: usize) -> PairIdx {
        let depth = u32::try_from(self.context.len()).unwrap_or(u32::MAX);
        let parent = self.context.last().copied();
        let idx = self
            .pairs
            .open(token, off32(offset), self.line, depth, parent);
        self.context.push(idx);
        idx
    }

    /// Finalize a pair. `last_byte` is the offset of the final byte of the
    /// closing token, so `close_offset + 1` is always one past the construct
    /// (relevant for triple quotes, whose closer spans three bytes).
    fn close_pair(&mut self, idx: PairIdx, last_byte: usize) {
        self.pairs.close(idx, off32(last_byte), self.line);
        if let Some(pos) = self.context.iter().rposition(|&i| i == idx) {
            self.context.remove(pos);
        }
    }

    // === End of Input ===

    fn finish(mut self) -> Result<ScanResult, ScanError> {
        if let Some((open_offset, line)) = self.comment_open {
            return Err(ScanError::UnterminatedComment {
                open_offset,
                line: line + 1,
            });
        }
        if self.quote.is_some() {
            if let Some(idx) = self.string_pair {
                let rec = self.pairs.get(idx);
                return Err(ScanError::UnterminatedString {
                    quote: rec.token.open_label(),
                    open_offset: rec.open_offset,
                    line: rec.open_line + 1,
                });
            }
        }
        if let Some(&idx) = self.context.last() {
            let rec = self.pairs.get(idx);
            return Err(ScanError::UnclosedAtEof {
                token: rec.token.open_label(),
                open_offset: rec.open_offset,
                line: rec.open_line + 1,
                nesting: self.nesting_description(),
            });
        }
        for line in &mut self.lines {
            trim_class_view(line);
        }
        Ok(ScanResult {
            lines: self.lines,
            pairs: self.pairs,
            declaration_lines: self.declaration_lines,
        })
    }

    fn nesting_description(&self) -> String {
        let parts: Vec<String> = self
            .context
            .iter()
            .map(|&idx| {
                let rec = self.pairs.get(idx);
                format!(
                    "`{}` at {} (line {})",
                    rec.token.open_label(),
                    rec.open_offset,
                    rec.open_line + 1
                )
            })
            .collect();
        parts.join(" > ")
    }
}

/// Trim whitespace from both ends of the class-level view, keeping the
/// offset array in lock-step.
fn trim_class_view(line: &mut Line) {
    let bytes = line.class_level_text.as_bytes();
    let Some(first) = bytes.iter().position(|b| !b.is_ascii_whitespace()) else {
        line.class_level_text.clear();
        line.class_level_offsets.clear();
        return;
    };
    let last = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .unwrap_or(first);
    line.class_level_text.truncate(last + 1);
    line.class_level_text.drain(..first);
    line.class_level_offsets.truncate(last + 1);
    line.class_level_offsets.drain(..first);
}

/// `true` when a trimmed line begins a `class`/`mixin`/`enum` declaration,
/// optionally prefixed with `abstract`.
fn is_declaration_header(stripped: &str) -> bool {
    let rest = match stripped.strip_prefix("abstract") {
        Some(tail) if tail.starts_with(char::is_whitespace) => tail.trim_start(),
        Some(_) => return false,
        None => stripped,
    };
    for kw in ["class", "mixin", "enum"] {
        if let Some(tail) = rest.strip_prefix(kw) {
            if tail.starts_with(char::is_whitespace) && !tail.trim_start().is_empty() {
                return true;
            }
        }
    }
    false
}

/// Byte length of the UTF-8 character beginning with `b`.
fn utf8_len(b: u8) -> usize {
    match b {
        0x00..=0xBF => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xFF => 4,
    }
}

fn off32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
