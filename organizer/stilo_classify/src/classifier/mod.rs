//! Member classification: six fixed passes over one declaration's body.
//!
//! Each pass only touches lines still unclassified and skips blank/comment
//! lines. Passes run in a fixed order (decorators, main constructor, named
//! constructors, override members, generic scan, leftovers) and communicate
//! only through line tags and the claimed-line set, so classification is
//! deterministic for a given buffer.

use std::ops::Range;

use stilo_scan::{find_body_start, BodyStart, Line, LineTag, PairTable};
use tracing::debug;

use crate::entity::{DeclKind, Declaration, Entity};
use crate::error::ClassifyError;
use crate::search::{find_next, FeatureFind};

/// The classified members of one declaration, one collection per category.
#[derive(Clone, Debug, Default)]
pub struct Classification {
    pub main_constructor: Option<Entity>,
    pub named_constructors: Vec<Entity>,
    pub static_variables: Vec<Entity>,
    pub static_private_variables: Vec<Entity>,
    pub instance_variables: Vec<Entity>,
    pub private_instance_variables: Vec<Entity>,
    pub override_variables: Vec<Entity>,
    pub override_methods: Vec<Entity>,
    pub getter_methods: Vec<Entity>,
    pub other_methods: Vec<Entity>,
    pub build_method: Option<Entity>,
}

impl Classification {
    /// Total number of classified entities.
    pub fn entity_count(&self) -> usize {
        usize::from(self.main_constructor.is_some())
            + usize::from(self.build_method.is_some())
            + self.named_constructors.len()
            + self.static_variables.len()
            + self.static_private_variables.len()
            + self.instance_variables.len()
            + self.private_instance_variables.len()
            + self.override_variables.len()
            + self.override_methods.len()
            + self.getter_methods.len()
            + self.other_methods.len()
    }
}

/// Classify one declaration's body lines into typed entities.
///
/// `lines` is the whole buffer's line store; only `decl.body_lines` are
/// read or retagged. When getter grouping is disabled, getters classify as
/// plain other-methods instead of the distinguished getter category.
pub fn classify(
    source: &str,
    lines: &mut [Line],
    pairs: &PairTable,
    decl: &Declaration,
    group_getters: bool,
) -> Result<Classification, ClassifyError> {
    let claimed = vec![false; lines.len()];
    let mut cx = Classifier {
        source,
        lines,
        pairs,
        decl,
        claimed,
        group_getters,
        out: Classification::default(),
    };
    cx.fold_decorators()?;
    cx.find_main_constructor()?;
    cx.find_named_constructors()?;
    cx.find_overrides()?;
    cx.find_remaining()?;
    cx.mark_leftovers();
    debug!(
        name = %decl.name,
        entities = cx.out.entity_count(),
        "classified declaration"
    );
    Ok(cx.out)
}

struct Classifier<'a> {
    source: &'a str,
    lines: &'a mut [Line],
    pairs: &'a PairTable,
    decl: &'a Declaration,
    /// Lines owned by some entity, including absorbed blanks and comments.
    claimed: Vec<bool>,
    group_getters: bool,
    out: Classification,
}

impl Classifier<'_> {
    fn body(&self) -> Range<usize> {
        self.decl.body_lines.clone()
    }

    fn is_member_start(&self, li: usize) -> bool {
        let line = &self.lines[li];
        line.tag == LineTag::Unclassified && !line.class_level_text.is_empty()
    }

    /// Pass 1: a decorator other than `@override` is folded, together with
    /// any lines up through its argument list's closing paren, into a run
    /// of comment-like lines. The following member's comment pull then
    /// carries the decorator along with it.
    fn fold_decorators(&mut self) -> Result<(), ClassifyError> {
        for li in self.body() {
            if self.lines[li].tag != LineTag::Unclassified {
                continue;
            }
            let view = &self.lines[li].class_level_text;
            if !view.starts_with('@') || view.starts_with("@override") {
                continue;
            }
            let paren = view
                .find('(')
                .map(|pos| self.lines[li].class_level_offsets[pos]);
            let end = match paren {
                Some(offset) => {
                    let Some(rec) = self.pairs.by_open_offset(offset) else {
                        return Err(ClassifyError::MissingPair {
                            token: "(",
                            offset,
                            line: li + 1,
                        });
                    };
                    self.clamp_end(rec.close_line, li)?
                }
                None => li,
            };
            for l in li..=end {
                if self.lines[l].tag == LineTag::Unclassified {
                    self.lines[l].tag = LineTag::LineComment;
                }
            }
        }
        Ok(())
    }

    /// Pass 2: the main constructor is the member whose first structural
    /// feature is a `(` directly preceded by the declaration's own name.
    /// At most one is accepted.
    fn find_main_constructor(&mut self) -> Result<(), ClassifyError> {
        let body = self.body();
        let mut li = body.start;
        while li < body.end {
            if !self.is_member_start(li) {
                li += 1;
                continue;
            }
            let Some(found) = find_next(&*self.lines, li..body.end, &["=", "{", ";", "("]) else {
                break;
            };
            let is_ctor =
                found.marker == "(" && ends_with_name_call(&found.text, &self.decl.name);
            let Some(end) = self.member_end(&found, body.end)? else {
                break;
            };
            if is_ctor {
                let range = self.pull_leading_comments(li)..end + 1;
                self.mark_entity(LineTag::MainConstructor, range.clone())?;
                debug!(name = %self.decl.name, lines = ?range, "main constructor");
                self.out.main_constructor = Some(Entity {
                    kind: LineTag::MainConstructor,
                    name: format!("{}(", self.decl.name),
                    lines: range,
                });
                return Ok(());
            }
            li = end + 1;
        }
        Ok(())
    }

    /// Pass 3: named constructors, `<Name>.something(`. All matches are
    /// collected in source order.
    fn find_named_constructors(&mut self) -> Result<(), ClassifyError> {
        let body = self.body();
        let mut li = body.start;
        while li < body.end {
            if !self.is_member_start(li) {
                li += 1;
                continue;
            }
            let Some(found) = find_next(&*self.lines, li..body.end, &["=", "{", ";", "("]) else {
                break;
            };
            let name = if found.marker == "(" {
                named_ctor_name(&found.text, &self.decl.name)
            } else {
                None
            };
            let Some(end) = self.member_end(&found, body.end)? else {
                break;
            };
            if let Some(name) = name {
                let range = self.pull_leading_comments(li)..end + 1;
                self.mark_entity(LineTag::NamedConstructor, range.clone())?;
                self.out.named_constructors.push(Entity {
                    kind: LineTag::NamedConstructor,
                    name,
                    lines: range,
                });
            }
            li = end + 1;
        }
        Ok(())
    }

    /// Pass 4: members introduced by `@override`. Operator forms redo the
    /// search without `=` as a candidate, since `operator ==` and
    /// `operator []=` are always method declarations.
    fn find_overrides(&mut self) -> Result<(), ClassifyError> {
        let body = self.body();
        let mut li = body.start;
        while li < body.end {
            if self.lines[li].tag != LineTag::Unclassified
                || !self.lines[li].class_level_text.starts_with("@override")
            {
                li += 1;
                continue;
            }
            let Some(mut found) =
                find_next(&*self.lines, li..body.end, &["=>", "=", "{", ";", "("])
            else {
                break;
            };
            if found.marker == "=" && found.text.contains(" operator ") {
                let Some(redone) = find_next(&*self.lines, li..body.end, &["=>", "{", ";", "("])
                else {
                    break;
                };
                found = redone;
            }

            let head = found.text[..found.text.len() - found.marker.len()].trim_end();
            let bare = head.split_whitespace().last().unwrap_or("").to_string();
            let (kind, end) = match found.marker {
                "(" => {
                    let end = self.after_params_end(&found)?;
                    if bare == "build" && self.out.build_method.is_none() {
                        (LineTag::BuildMethod, end)
                    } else {
                        (LineTag::OverrideMethod, end)
                    }
                }
                "{" => {
                    let Some(rec) = self.pairs.by_open_offset(found.offset) else {
                        return Err(ClassifyError::MissingPair {
                            token: "{",
                            offset: found.offset,
                            line: found.line + 1,
                        });
                    };
                    (
                        LineTag::OverrideMethod,
                        self.clamp_end(rec.close_line, found.line)?,
                    )
                }
                "=>" => (LineTag::OverrideMethod, self.semicolon_end(found.line)?),
                ";" => (LineTag::OverrideVariable, found.line),
                _ => (LineTag::OverrideVariable, self.semicolon_end(found.line)?),
            };

            let range = self.pull_leading_comments(li)..end + 1;
            self.mark_entity(kind, range.clone())?;
            let entity = Entity {
                kind,
                name: bare,
                lines: range,
            };
            match kind {
                LineTag::BuildMethod => self.out.build_method = Some(entity),
                LineTag::OverrideVariable => self.out.override_variables.push(entity),
                _ => self.out.override_methods.push(entity),
            }
            li = end + 1;
        }
        Ok(())
    }

    /// Pass 5: everything else. One statement-or-block unit is captured per
    /// member and classified by its reduced structural marker sequence.
    fn find_remaining(&mut self) -> Result<(), ClassifyError> {
        let body = self.body();
        let mut li = body.start;
        while li < body.end {
            if !self.is_member_start(li) {
                li += 1;
                continue;
            }
            let Some(found) = find_next(&*self.lines, li..body.end, &[";", "}"]) else {
                break;
            };
            let end = found.line;
            let elided = elide_function_types(&found.text);
            let (seq, leading) = marker_sequence(&elided);
            let name = leading
                .split_whitespace()
                .last()
                .unwrap_or("")
                .to_string();

            let kind = if is_getter_heading(leading) {
                if self.group_getters {
                    LineTag::GetterMethod
                } else {
                    LineTag::OtherMethod
                }
            } else if is_method_sequence(&seq, leading, self.decl.kind) {
                LineTag::OtherMethod
            } else {
                let is_static = leading.split_whitespace().next() == Some("static");
                match (is_static, name.starts_with('_')) {
                    (true, true) => LineTag::StaticPrivateVariable,
                    (true, false) => LineTag::StaticVariable,
                    (false, true) => LineTag::PrivateInstanceVariable,
                    (false, false) => LineTag::InstanceVariable,
                }
            };

            let range = self.pull_leading_comments(li)..end + 1;
            self.mark_entity(kind, range.clone())?;
            let entity = Entity {
                kind,
                name,
                lines: range,
            };
            match kind {
                LineTag::GetterMethod => self.out.getter_methods.push(entity),
                LineTag::OtherMethod => self.out.other_methods.push(entity),
                LineTag::StaticVariable => self.out.static_variables.push(entity),
                LineTag::StaticPrivateVariable => {
                    self.out.static_private_variables.push(entity);
                }
                LineTag::PrivateInstanceVariable => {
                    self.out.private_instance_variables.push(entity);
                }
                _ => self.out.instance_variables.push(entity),
            }
            li = end + 1;
        }
        Ok(())
    }

    /// Pass 6: whatever is still unclassified stays verbatim and unmoved.
    fn mark_leftovers(&mut self) {
        for li in self.body() {
            if self.lines[li].tag == LineTag::Unclassified {
                self.lines[li].tag = LineTag::LeaveUnmodified;
            }
        }
    }

    /// Last line of the member whose first structural feature is `found`.
    /// `None` means the body ended first (caller stops the pass).
    fn member_end(
        &self,
        found: &FeatureFind,
        body_end: usize,
    ) -> Result<Option<usize>, ClassifyError> {
        match found.marker {
            ";" => Ok(Some(found.line)),
            "{" => {
                let Some(rec) = self.pairs.by_open_offset(found.offset) else {
                    return Err(ClassifyError::MissingPair {
                        token: "{",
                        offset: found.offset,
                        line: found.line + 1,
                    });
                };
                self.clamp_end(rec.close_line, found.line).map(Some)
            }
            "(" => self.after_params_end(found).map(Some),
            _ => Ok(find_next(&*self.lines, found.line..body_end, &[";"]).map(|f| f.line)),
        }
    }

    /// A member may never end outside its declaration's body. Pair-table
    /// lookups can escape it when the member is malformed (a parameter list
    /// with no body resolves against whatever brace follows the class).
    fn clamp_end(&self, end: usize, line: usize) -> Result<usize, ClassifyError> {
        if end >= self.decl.body_lines.end {
            return Err(ClassifyError::UnexpectedEndOfBody {
                looking_for: "a member end inside the declaration body",
                line: line + 1,
            });
        }
        Ok(end)
    }

    /// Resolve a member's end past its parameter list: jump the `(...)`
    /// via the pair table, walk any initializer-list segment, then resolve
    /// the body brace (or a terminating `;` for bodyless forms).
    fn after_params_end(&self, found: &FeatureFind) -> Result<usize, ClassifyError> {
        let Some(params) = self.pairs.by_open_offset(found.offset) else {
            return Err(ClassifyError::MissingPair {
                token: "(",
                offset: found.offset,
                line: found.line + 1,
            });
        };
        match find_body_start(self.source, self.pairs, params.close_offset + 1) {
            Some(BodyStart::Brace(offset)) => {
                let Some(rec) = self.pairs.by_open_offset(offset) else {
                    return Err(ClassifyError::MissingPair {
                        token: "{",
                        offset,
                        line: found.line + 1,
                    });
                };
                self.clamp_end(rec.close_line, found.line)
            }
            Some(BodyStart::Semicolon(offset)) => {
                self.clamp_end(self.line_of_offset(offset), found.line)
            }
            None => Err(ClassifyError::UnexpectedEndOfBody {
                looking_for: "`{` or `;` after a parameter list",
                line: found.line + 1,
            }),
        }
    }

    fn semicolon_end(&self, from: usize) -> Result<usize, ClassifyError> {
        let body = self.body();
        find_next(&*self.lines, from..body.end, &[";"])
            .map(|f| f.line)
            .ok_or(ClassifyError::UnexpectedEndOfBody {
                looking_for: "a terminating `;`",
                line: from + 1,
            })
    }

    fn line_of_offset(&self, offset: u32) -> usize {
        self.lines
            .partition_point(|l| l.start_offset <= offset)
            .saturating_sub(1)
    }

    /// Extend an entity's start upward over contiguous comment lines, so
    /// comments travel with their member. A blank line or a line already
    /// claimed by another entity stops the pull.
    fn pull_leading_comments(&self, start: usize) -> usize {
        let floor = self.decl.body_lines.start;
        let mut s = start;
        while s > floor {
            let prev = s - 1;
            if self.claimed[prev] || !self.lines[prev].tag.is_comment() {
                break;
            }
            s -= 1;
        }
        s
    }

    /// Tag every line of a new entity's range and claim it. Absorbable tags
    /// (blank, comments) keep their tag; any other prior tag has no repair
    /// rule and is a hard conflict.
    fn mark_entity(&mut self, kind: LineTag, range: Range<usize>) -> Result<(), ClassifyError> {
        for li in range {
            self.claimed[li] = true;
            let line = &mut self.lines[li];
            match line.tag {
                LineTag::Unclassified => line.tag = kind,
                t if t.is_absorbable() => {}
                prior => {
                    return Err(ClassifyError::ConflictingTags {
                        prior,
                        new: kind,
                        line: li + 1,
                        text: line.stripped().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// `text` (ending in `(`) is a call of `name`: it ends with `name(` and the
/// character before the name, if any, is whitespace.
fn ends_with_name_call(text: &str, name: &str) -> bool {
    let Some(head) = text.strip_suffix('(') else {
        return false;
    };
    let Some(before) = head.strip_suffix(name) else {
        return false;
    };
    before.is_empty() || before.ends_with(|c: char| c.is_whitespace())
}

/// Member name of a named-constructor match (`A.named(`), or `None` when
/// `text` is not one. The text before `<name>.` must not contain a bare `?`
/// or `:` (that would be a ternary or a conditional default, not a
/// constructor).
fn named_ctor_name(text: &str, name: &str) -> Option<String> {
    let needle = format!("{name}.");
    let idx = text.find(&needle)?;
    if idx > 0 && !text.as_bytes()[idx - 1].is_ascii_whitespace() {
        return None;
    }
    let head = &text[..idx];
    if head.contains('?') || head.contains(':') {
        return None;
    }
    Some(text[idx..].to_string())
}

/// Drop ` Function(...)` type spellings before marker reduction, so an
/// anonymous-function-typed member does not read as a method declaration.
fn elide_function_types(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find(" Function(") {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx + " Function".len()..];
        let mut depth = 0usize;
        let mut cut = tail.len();
        for (i, b) in tail.bytes().enumerate() {
            match b {
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        cut = i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        rest = &tail[cut..];
    }
    out.push_str(rest);
    out
}

/// Reduce text to its structural marker sequence plus the leading text
/// before the first marker. `=` immediately followed by `>` collapses into
/// the single marker `=>`.
fn marker_sequence(text: &str) -> (String, &str) {
    let bytes = text.as_bytes();
    let mut seq = String::new();
    let mut first = text.len();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if matches!(b, b'(' | b')' | b'{' | b'}' | b'[' | b']' | b'=' | b';') {
            if first == text.len() {
                first = i;
            }
            if b == b'=' && bytes.get(i + 1) == Some(&b'>') {
                seq.push_str("=>");
                i += 2;
                continue;
            }
            seq.push(b as char);
        }
        i += 1;
    }
    (seq, text[..first].trim())
}

/// The member heading declares a getter: its second-to-last token is `get`.
fn is_getter_heading(leading: &str) -> bool {
    let tokens: Vec<&str> = leading.split_whitespace().collect();
    tokens.len() >= 2 && tokens[tokens.len() - 2] == "get"
}

fn is_method_sequence(seq: &str, leading: &str, kind: DeclKind) -> bool {
    if seq.contains("=>") {
        return true;
    }
    match seq {
        "(){}" | "=(){}" => true,
        // an abstract/external method, except enum value lists and
        // function-typed members that slipped past elision
        "();" => {
            let head = leading.trim_end();
            kind != DeclKind::Enum
                && !head.ends_with("Function")
                && !head.ends_with("Function?")
        }
        _ => false,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
