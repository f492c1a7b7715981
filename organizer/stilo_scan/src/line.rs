//! The line store: one record per physical line of the buffer.
//!
//! Records are created once at scanner start and mutated in place: the
//! scanner fills the class-level view and tags comment/blank lines, the
//! classifier refines the remaining tags. They are never destroyed; their
//! lifetime is the whole analysis pass.

/// Classification tag of a single physical line.
///
/// Starts as [`LineTag::Unclassified`] and is monotonically refined: the
/// scanner tags blanks and comments, the classifier tags everything else.
/// After classification completes, no non-blank line may remain
/// `Unclassified`; leftovers become [`LineTag::LeaveUnmodified`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineTag {
    Unclassified,
    Blank,
    LineComment,
    BlockComment,
    MainConstructor,
    NamedConstructor,
    StaticVariable,
    StaticPrivateVariable,
    InstanceVariable,
    PrivateInstanceVariable,
    OverrideVariable,
    OverrideMethod,
    BuildMethod,
    GetterMethod,
    OtherMethod,
    LeaveUnmodified,
}

impl LineTag {
    /// Returns `true` for the two comment tags.
    pub fn is_comment(self) -> bool {
        matches!(self, LineTag::LineComment | LineTag::BlockComment)
    }

    /// Returns `true` when a line carrying this tag may be folded into an
    /// entity's line range without a classification conflict.
    pub fn is_absorbable(self) -> bool {
        matches!(
            self,
            LineTag::Unclassified | LineTag::Blank | LineTag::LineComment | LineTag::BlockComment
        )
    }
}

/// One physical line of the buffer.
///
/// `class_level_text` accumulates the characters of this line that are live
/// code at brace depth 1 (directly inside a class body), and
/// `class_level_offsets` carries the absolute buffer offset of each such
/// byte. The two stay in lock-step at all times:
/// `class_level_text.len() == class_level_offsets.len()`.
#[derive(Clone, Debug)]
pub struct Line {
    /// Raw line text, without the trailing newline.
    pub raw: String,
    /// Absolute byte offset of the first character of the line.
    pub start_offset: u32,
    /// Absolute byte offset one past the last character (the newline, or EOF).
    pub end_offset: u32,
    /// Absolute byte offset of the first non-whitespace character.
    pub stripped_offset: u32,
    /// Class-level view of the line (trimmed at end of scan).
    pub class_level_text: String,
    /// Absolute offset of each byte of `class_level_text`.
    pub class_level_offsets: Vec<u32>,
    /// Evolving classification tag.
    pub tag: LineTag,
    /// `true` when the line starts inside a string or block comment.
    pub in_string_or_comment: bool,
}

impl Line {
    fn new(raw: &str, start_offset: u32) -> Self {
        let stripped = raw.trim_start();
        let lead = raw.len() - stripped.len();
        let tag = if stripped.trim_end().is_empty() {
            LineTag::Blank
        } else {
            LineTag::Unclassified
        };
        Self {
            raw: raw.to_string(),
            start_offset,
            end_offset: start_offset + u32::try_from(raw.len()).unwrap_or(u32::MAX),
            stripped_offset: start_offset + u32::try_from(lead).unwrap_or(u32::MAX),
            class_level_text: String::new(),
            class_level_offsets: Vec::new(),
            tag,
            in_string_or_comment: false,
        }
    }

    /// The line text with leading and trailing whitespace removed.
    pub fn stripped(&self) -> &str {
        self.raw.trim()
    }

    /// Returns `true` when the line is blank.
    pub fn is_blank(&self) -> bool {
        self.tag == LineTag::Blank
    }
}

/// Split a buffer into [`Line`] records.
///
/// Follows `str::split('\n')` semantics: a trailing newline yields a final
/// empty line, so rejoining all raw lines with `\n` reproduces the buffer
/// byte for byte. A `\r` before the newline stays in the raw text.
pub fn split_lines(source: &str) -> Vec<Line> {
    let bytes = source.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    for nl in memchr::memchr_iter(b'\n', bytes) {
        lines.push(Line::new(&source[start..nl], offset_u32(start)));
        start = nl + 1;
    }
    lines.push(Line::new(&source[start..], offset_u32(start)));
    lines
}

fn offset_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_round_trips_through_join() {
        for source in ["", "a", "a\n", "a\nb", "a\r\nb\r\n", "\n\n"] {
            let lines = split_lines(source);
            let raws: Vec<&str> = lines.iter().map(|l| l.raw.as_str()).collect();
            assert_eq!(raws.join("\n"), source, "round trip failed for {source:?}");
        }
    }

    #[test]
    fn offsets_cover_the_buffer() {
        let source = "class A {\n  int x;\n}\n";
        let lines = split_lines(source);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].start_offset, 0);
        assert_eq!(lines[1].start_offset, 10);
        assert_eq!(lines[1].stripped_offset, 12);
        assert_eq!(lines[1].end_offset, 18);
        assert_eq!(lines[3].raw, "");
    }

    #[test]
    fn blank_lines_are_tagged_at_construction() {
        let lines = split_lines("code\n\n   \t\nmore");
        assert_eq!(lines[0].tag, LineTag::Unclassified);
        assert_eq!(lines[1].tag, LineTag::Blank);
        assert_eq!(lines[2].tag, LineTag::Blank);
        assert_eq!(lines[3].tag, LineTag::Unclassified);
    }

    #[test]
    fn carriage_return_only_line_is_blank() {
        let lines = split_lines("a\r\n\r\nb");
        assert_eq!(lines[1].raw, "\r");
        assert!(lines[1].is_blank());
    }
}
