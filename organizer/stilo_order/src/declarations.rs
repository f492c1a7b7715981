//! Declaration finding: headers to body line ranges.
//!
//! The scanner records candidate header lines; this module parses each
//! header into a kind and name, then resolves the body extent through the
//! boundary locator and the pair table. Alias-style declarations ending in
//! `;` have no body and are skipped. A header whose body brace cannot be
//! resolved against the pair table (a comment between the name and the
//! body can hide a stray `{` from the locator) skips just that
//! declaration, recording the reason.

use stilo_classify::{ClassifyError, DeclKind, Declaration};
use stilo_scan::{find_body_start, BodyStart, Line, ScanResult};
use tracing::warn;

pub(crate) fn find_declarations(
    source: &str,
    scanned: &ScanResult,
    skipped: &mut Vec<(String, ClassifyError)>,
) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for &li in &scanned.declaration_lines {
        let Some((kind, name, after_name)) = parse_header(&scanned.lines[li]) else {
            continue;
        };
        match find_body_start(source, &scanned.pairs, after_name) {
            Some(BodyStart::Brace(offset)) => {
                let Some(rec) = scanned.pairs.by_open_offset(offset) else {
                    let reason = ClassifyError::MissingPair {
                        token: "{",
                        offset,
                        line: li + 1,
                    };
                    warn!(declaration = %name, error = %reason, "skipping declaration");
                    skipped.push((name, reason));
                    continue;
                };
                let start = rec.open_line + 1;
                declarations.push(Declaration {
                    kind,
                    name,
                    header_line: li,
                    open_offset: offset,
                    close_offset: rec.close_offset,
                    // single-line bodies collapse to an empty range
                    body_lines: start..rec.close_line.max(start),
                });
            }
            Some(BodyStart::Semicolon(_)) | None => {}
        }
    }
    declarations
}

/// Parse a header line into its kind, name, and the offset just past the
/// name (where the boundary locator starts walking).
fn parse_header(line: &Line) -> Option<(DeclKind, String, u32)> {
    let stripped = line.stripped();
    let mut rest = stripped;
    if let Some(tail) = rest.strip_prefix("abstract") {
        if tail.starts_with(char::is_whitespace) {
            rest = tail.trim_start();
        }
    }
    let kind = if rest.starts_with("class") {
        DeclKind::Class
    } else if rest.starts_with("mixin") {
        DeclKind::Mixin
    } else if rest.starts_with("enum") {
        DeclKind::Enum
    } else {
        return None;
    };
    let tail = &rest[kind.keyword().len()..];
    if !tail.starts_with(char::is_whitespace) {
        return None;
    }
    let after_keyword = tail.trim_start();
    let name: String = after_keyword
        .chars()
        .take_while(|&c| c.is_alphanumeric() || c == '_' || c == '$')
        .collect();
    if name.is_empty() {
        return None;
    }
    let consumed = stripped.len() - after_keyword.len() + name.len();
    let after_name = line.stripped_offset + u32::try_from(consumed).unwrap_or(u32::MAX);
    Some((kind, name, after_name))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stilo_scan::scan;

    fn declarations(source: &str) -> Vec<Declaration> {
        let scanned = scan(source).unwrap();
        find_declarations(source, &scanned, &mut Vec::new())
    }

    #[test]
    fn kinds_names_and_body_ranges() {
        let source = "abstract class Foo<T> extends Bar {\n  int x;\n}\n\nmixin M on Foo {\n  void m() {}\n}\n\nenum Color {\n  red,\n  green;\n}\n";
        let decls = declarations(source);
        assert_eq!(decls.len(), 3);

        assert_eq!(decls[0].kind, DeclKind::Class);
        assert_eq!(decls[0].name, "Foo");
        assert_eq!(decls[0].body_lines, 1..2);

        assert_eq!(decls[1].kind, DeclKind::Mixin);
        assert_eq!(decls[1].name, "M");
        assert_eq!(decls[1].body_lines, 5..6);

        assert_eq!(decls[2].kind, DeclKind::Enum);
        assert_eq!(decls[2].name, "Color");
        assert_eq!(decls[2].body_lines, 9..11);
    }

    #[test]
    fn alias_declarations_have_no_body() {
        assert!(declarations("mixin M = A with B;\n").is_empty());
    }

    #[test]
    fn single_line_bodies_collapse_to_an_empty_range() {
        let decls = declarations("class A { int x; }\n");
        assert_eq!(decls[0].body_lines, 1..1);
    }

    #[test]
    fn an_unresolvable_body_brace_skips_the_declaration() {
        let source = "class A /* { */ {\n  int x;\n}\n";
        let scanned = scan(source).unwrap();
        let mut skipped = Vec::new();
        let decls = find_declarations(source, &scanned, &mut skipped);
        assert!(decls.is_empty());
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "A");
        assert!(matches!(
            skipped[0].1,
            ClassifyError::MissingPair { token: "{", .. }
        ));
    }
}
