use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Helper: scan a source string, panicking on scan errors.
fn scan_ok(source: &str) -> ScanResult {
    scan(source).unwrap_or_else(|e| panic!("scan failed for {source:?}: {e}"))
}

/// Helper: trimmed class-level views, one per line.
fn views(result: &ScanResult) -> Vec<&str> {
    result
        .lines
        .iter()
        .map(|l| l.class_level_text.as_str())
        .collect()
}

/// Helper: assert the text/offset lock-step invariant and that every pair
/// record was finalized with a closer strictly after its opener.
fn check_invariants(source: &str) {
    let result = scan_ok(source);
    let raws: Vec<&str> = result.lines.iter().map(|l| l.raw.as_str()).collect();
    assert_eq!(raws.join("\n"), source, "line split must round trip");
    for line in &result.lines {
        assert_eq!(
            line.class_level_text.len(),
            line.class_level_offsets.len(),
            "view and offsets out of lock-step on {:?}",
            line.raw
        );
        for (i, &off) in line.class_level_offsets.iter().enumerate() {
            assert_eq!(
                source.as_bytes()[off as usize],
                line.class_level_text.as_bytes()[i],
                "offset {off} does not map back to the view byte in {:?}",
                line.raw
            );
        }
    }
    for rec in result.pairs.records() {
        assert!(
            rec.close_offset > rec.open_offset,
            "pair {:?} at {} was never closed",
            rec.token,
            rec.open_offset
        );
    }
}

// ─── Class-Level Views ─────────────────────────────────────────

#[test]
fn members_inside_a_class_body_are_visible() {
    let source = "class A {\n  int x = 0;\n\n  void m() {\n    var s = 'a ${b ? '{' : '}'} c';\n  }\n}\n";
    let result = scan_ok(source);
    assert_eq!(
        views(&result),
        vec!["", "int x = 0;", "", "void m() {", "", "}", "", ""]
    );
    assert_eq!(result.declaration_lines, vec![0]);
    check_invariants(source);
}

#[test]
fn view_offsets_start_at_the_first_stripped_byte() {
    let result = scan_ok("class A {\n  int x = 0;\n}\n");
    let line = &result.lines[1];
    assert_eq!(line.class_level_text, "int x = 0;");
    assert_eq!(line.class_level_offsets[0], line.stripped_offset);
}

#[test]
fn method_bodies_are_invisible_at_class_level() {
    let result = scan_ok("class A {\n  void m() {\n    int hidden = 1;\n  }\n}\n");
    assert_eq!(views(&result), vec!["", "void m() {", "", "}", "", ""]);
}

#[test]
fn multibyte_characters_stay_intact_in_the_view() {
    let source = "class A {\n  var name = 'héllo';\n  int π = 3;\n}\n";
    let result = scan_ok(source);
    assert_eq!(result.lines[2].class_level_text, "int π = 3;");
    check_invariants(source);
}

// ─── Strings & Interpolation ───────────────────────────────────

#[test]
fn interpolation_suspends_string_mode() {
    let source = "class A {\n  var s = 'a ${b ? '{' : '}'} c';\n}\n";
    let result = scan_ok(source);
    let dollar = u32::try_from(source.find("${").unwrap()).unwrap();
    let rec = result.pairs.by_open_offset(dollar).unwrap();
    assert_eq!(rec.token, PairToken::Interpolation);
    assert!(rec.close_offset > rec.open_offset);
    // the braces quoted inside the interpolation never touch the brace stack
    assert_eq!(result.lines[1].class_level_text, "var s = ;");
}

#[test]
fn raw_strings_never_interpolate() {
    let source = "class A {\n  var p = r'c:\\${x}';\n}\n";
    let result = scan_ok(source);
    assert!(result
        .pairs
        .records()
        .iter()
        .all(|r| r.token != PairToken::Interpolation));
    assert_eq!(result.lines[1].class_level_text, "var p = r;");
}

#[test]
fn triple_quoted_strings_span_lines() {
    let source = "class A {\n  var s = '''\nhello }{ not code\n''';\n}\n";
    let result = scan_ok(source);
    assert!(result.lines[2].in_string_or_comment);
    assert_eq!(result.lines[2].class_level_text, "");
    assert_eq!(result.lines[3].class_level_text, ";");

    let open = u32::try_from(source.find("'''").unwrap()).unwrap();
    let rec = result.pairs.by_open_offset(open).unwrap();
    assert_eq!(rec.token, PairToken::TripleSingleQuote);
    assert_eq!(rec.close_line, 3);
}

#[test]
fn quotes_inside_strings_of_the_other_kind_are_content() {
    let source = "class A {\n  var s = \"it's fine\";\n}\n";
    let result = scan_ok(source);
    assert_eq!(result.lines[1].class_level_text, "var s = ;");
    check_invariants(source);
}

#[test]
fn escaped_quotes_stay_inside_the_string() {
    let source = "class A {\n  var s = 'it\\'s';\n  int x;\n}\n";
    let result = scan_ok(source);
    assert_eq!(result.lines[1].class_level_text, "var s = ;");
    assert_eq!(result.lines[2].class_level_text, "int x;");
    check_invariants(source);
}

#[test]
fn an_escaped_dollar_never_interpolates() {
    let source = "class A {\n  var s = 'cost \\${x}';\n}\n";
    let result = scan_ok(source);
    assert!(result
        .pairs
        .records()
        .iter()
        .all(|r| r.token != PairToken::Interpolation));
    assert_eq!(result.lines[1].class_level_text, "var s = ;");
}

#[test]
fn backslashes_in_raw_strings_are_content() {
    let source = "class A {\n  var p = r'ends with \\';\n  int x;\n}\n";
    let result = scan_ok(source);
    assert_eq!(result.lines[2].class_level_text, "int x;");
    check_invariants(source);
}

// ─── Comments ──────────────────────────────────────────────────

#[test]
fn line_comment_lines_are_tagged_and_trailing_comments_truncate() {
    let result = scan_ok("class A {\n  // note\n  int x; // trailing\n}\n");
    assert_eq!(result.lines[1].tag, LineTag::LineComment);
    assert_eq!(result.lines[2].tag, LineTag::Unclassified);
    assert_eq!(result.lines[2].class_level_text, "int x;");
}

#[test]
fn block_comments_nest() {
    let source = "class A {\n  /* a /* b */ still comment */\n  int x;\n}\n";
    let result = scan_ok(source);
    assert_eq!(result.lines[1].tag, LineTag::BlockComment);
    assert_eq!(result.lines[1].class_level_text, "");
    assert_eq!(result.lines[2].class_level_text, "int x;");
}

#[test]
fn lines_fully_inside_a_block_comment_are_tagged() {
    let result = scan_ok("class A {\n  /*\n  int not_code;\n  */\n  int x;\n}\n");
    assert_eq!(result.lines[2].tag, LineTag::BlockComment);
    assert!(result.lines[2].in_string_or_comment);
    assert_eq!(result.lines[4].class_level_text, "int x;");
}

#[test]
fn comment_content_never_opens_pairs() {
    let result = scan_ok("class A {\n  /* '{' ( */\n}\n");
    assert_eq!(result.pairs.len(), 1);
}

// ─── Declaration Headers ───────────────────────────────────────

#[test]
fn headers_are_detected_only_at_the_top_level() {
    let source = "class A {}\n\nabstract class B {}\nmixin M on A {}\nenum E { a }\nvoid top() {}\n";
    let result = scan_ok(source);
    assert_eq!(result.declaration_lines, vec![0, 2, 3, 4]);

    let nested = scan_ok("class A {\n  class B {}\n}\n");
    assert_eq!(nested.declaration_lines, vec![0]);
}

#[test]
fn header_keyword_requires_a_following_name() {
    assert!(is_declaration_header("class A {"));
    assert!(is_declaration_header("abstract class A {"));
    assert!(is_declaration_header("enum Color {"));
    assert!(!is_declaration_header("classy thing"));
    assert!(!is_declaration_header("abstracted = 3;"));
    assert!(!is_declaration_header("class"));
    assert!(!is_declaration_header("enum{"));
}

// ─── Errors ────────────────────────────────────────────────────

#[test]
fn unterminated_string_is_fatal() {
    let err = scan("class A {\n  var s = 'oops;\n").unwrap_err();
    assert_eq!(
        err,
        ScanError::UnterminatedString {
            quote: "'",
            open_offset: 20,
            line: 2,
        }
    );
}

#[test]
fn unterminated_comment_is_fatal() {
    let err = scan("class A {\n  /* oops\n}\n").unwrap_err();
    assert!(matches!(
        err,
        ScanError::UnterminatedComment { line: 2, .. }
    ));
}

#[test]
fn unmatched_closers_are_fatal() {
    assert!(matches!(
        scan("}\n").unwrap_err(),
        ScanError::UnmatchedCloseBrace { line: 1, .. }
    ));
    assert!(matches!(
        scan("class A {\n  )\n}\n").unwrap_err(),
        ScanError::UnmatchedCloseParen { line: 2, .. }
    ));
    assert!(matches!(
        scan("class A { */ }\n").unwrap_err(),
        ScanError::UnmatchedCommentClose { line: 1, .. }
    ));
}

#[test]
fn interpolation_outside_a_string_is_fatal() {
    assert!(matches!(
        scan("class A {\n  ${x}\n}\n").unwrap_err(),
        ScanError::InterpolationOutsideString { line: 2, .. }
    ));
}

#[test]
fn paren_left_open_inside_an_interpolation_is_fatal() {
    assert!(matches!(
        scan("class A {\n  var s = '${f(}';\n}\n").unwrap_err(),
        ScanError::UnclosedParenInInterpolation { line: 2, .. }
    ));
}

#[test]
fn anything_still_open_at_eof_is_fatal() {
    let err = scan("class A {\n  void m() {\n").unwrap_err();
    match err {
        ScanError::UnclosedAtEof {
            token,
            line,
            nesting,
            ..
        } => {
            assert_eq!(token, "{");
            assert_eq!(line, 2);
            assert!(nesting.contains(" > "), "nesting was {nesting:?}");
        }
        other => panic!("expected UnclosedAtEof, got {other:?}"),
    }
}

// ─── Property Tests ────────────────────────────────────────────

fn member_line() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "  int x = 0;".to_string(),
        "  final String name = 'anon';".to_string(),
        "  static const _cache = <String, int>{};".to_string(),
        "  void m() { var s = 'a ${b ? '{' : '}'} c'; }".to_string(),
        "  String get label => _label;".to_string(),
        "  var raw = r'${not_interpolated}';".to_string(),
        "  // a note".to_string(),
        "  /* a block note */".to_string(),
        String::new(),
        "  @override".to_string(),
        "  String toString() => 'A';".to_string(),
    ])
}

proptest! {
    #[test]
    fn well_formed_class_bodies_scan_clean(
        members in prop::collection::vec(member_line(), 0..8)
    ) {
        let mut source = String::from("class A {\n");
        for member in &members {
            source.push_str(member);
            source.push('\n');
        }
        source.push_str("}\n");
        check_invariants(&source);
    }
}
