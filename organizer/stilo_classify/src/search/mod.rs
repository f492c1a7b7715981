//! Feature search: the classifier's core primitive.
//!
//! A pure forward scan over class-level views that finds the next
//! occurrence of one of several candidate marker substrings. Views of
//! consecutive lines are concatenated with a single space standing in for
//! the line break, so no marker ever spans lines. The function returns a
//! result record instead of advancing any shared cursor; callers decide
//! where the next search starts.

use std::ops::Range;

use stilo_scan::Line;

/// A successful feature search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureFind<'m> {
    /// The marker that matched (one of the candidates supplied).
    pub marker: &'m str,
    /// Accumulated class-level text from the start of the range up to and
    /// including the matched marker.
    pub text: String,
    /// Line index where the marker starts.
    pub line: usize,
    /// Absolute offset of the marker's first byte.
    pub offset: u32,
}

/// Scan `lines[range]` for the earliest occurrence of any candidate marker.
///
/// Position wins; on an index tie the marker supplied first wins. A `}`
/// candidate is skipped while the accumulated text contains an unanswered
/// ternary true-branch (`?` followed by `{` with no `:` followed by `{`
/// yet), so a ternary's inner closing brace is never mistaken for a member
/// terminator. Returns `None` when no marker occurs in the range, the
/// normal end-of-body signal.
pub fn find_next<'m>(
    lines: &[Line],
    range: Range<usize>,
    markers: &[&'m str],
) -> Option<FeatureFind<'m>> {
    let mut text = String::new();
    let mut meta: Vec<Option<(usize, u32)>> = Vec::new();
    for li in range {
        let line = &lines[li];
        if line.class_level_text.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
            meta.push(None);
        }
        text.push_str(&line.class_level_text);
        meta.extend(line.class_level_offsets.iter().map(|&off| Some((li, off))));
    }

    let mut from = 0;
    loop {
        let (pos, marker) = earliest(&text, from, markers)?;
        if marker == "}" && ternary_branch_open(&text[..pos]) {
            from = pos + 1;
            continue;
        }
        let Some((line, offset)) = meta[pos] else {
            // markers never begin on a separator space
            from = pos + 1;
            continue;
        };
        return Some(FeatureFind {
            marker,
            text: text[..pos + marker.len()].to_string(),
            line,
            offset,
        });
    }
}

/// Earliest match among the candidates, first-supplied wins ties.
fn earliest<'m>(text: &str, from: usize, markers: &[&'m str]) -> Option<(usize, &'m str)> {
    let mut best: Option<(usize, &'m str)> = None;
    for &marker in markers {
        if let Some(pos) = text[from..].find(marker) {
            let pos = from + pos;
            match best {
                Some((b, _)) if b <= pos => {}
                _ => best = Some((pos, marker)),
            }
        }
    }
    best
}

/// A ternary's true branch opened a block that has not seen its `:` branch
/// yet: some `?` has `{` as its next non-space character, and no `:` does.
fn ternary_branch_open(prefix: &str) -> bool {
    next_nonspace_is_brace(prefix, b'?') && !next_nonspace_is_brace(prefix, b':')
}

fn next_nonspace_is_brace(prefix: &str, intro: u8) -> bool {
    let bytes = prefix.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == intro {
            let next = bytes[i + 1..].iter().find(|&&c| c != b' ');
            if next == Some(&b'{') {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests;
