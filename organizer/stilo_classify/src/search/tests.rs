use super::*;
use pretty_assertions::assert_eq;
use stilo_scan::scan;

fn lines_of(source: &str) -> Vec<Line> {
    scan(source).unwrap().lines
}

#[test]
fn earliest_position_wins() {
    let lines = lines_of("class A {\n  int x = f();\n}\n");
    let found = find_next(&lines, 1..2, &["(", "=", ";"]).unwrap();
    assert_eq!(found.marker, "=");
    assert_eq!(found.text, "int x =");
    assert_eq!(found.line, 1);
}

#[test]
fn supply_order_breaks_index_ties() {
    let lines = lines_of("class A {\n  int x => 0;\n}\n");
    // both "=>" and "=" match at the same index
    let found = find_next(&lines, 1..2, &["=>", "=", ";"]).unwrap();
    assert_eq!(found.marker, "=>");
    let found = find_next(&lines, 1..2, &["=", "=>", ";"]).unwrap();
    assert_eq!(found.marker, "=");
}

#[test]
fn views_concatenate_across_lines_with_a_space() {
    let lines = lines_of("class A {\n  int x\n      = 0;\n}\n");
    let found = find_next(&lines, 1..3, &[";"]).unwrap();
    assert_eq!(found.text, "int x = 0;");
    assert_eq!(found.line, 2);
}

#[test]
fn markers_never_span_a_line_break() {
    let lines = lines_of("class A {\n  int x =\n> 0;\n}\n");
    assert_eq!(find_next(&lines, 1..3, &["=>"]), None);
}

#[test]
fn the_offset_points_at_the_marker() {
    let source = "class A {\n  void m() {\n  }\n}\n";
    let lines = lines_of(source);
    let found = find_next(&lines, 1..4, &["("]).unwrap();
    assert_eq!(
        found.offset,
        u32::try_from(source.find('(').unwrap()).unwrap()
    );
}

#[test]
fn a_ternary_true_branch_brace_is_not_a_closer() {
    // the first `}` closes `? {`, only the second answers the search
    let lines = lines_of("class A {\n  var x = c ? {\n    1,\n  } : {\n    2,\n  };\n}\n");
    let found = find_next(&lines, 1..7, &[";", "}"]).unwrap();
    assert_eq!(found.marker, "}");
    assert_eq!(found.line, 5);
}

#[test]
fn exhausting_the_range_returns_none() {
    let lines = lines_of("class A {\n  int x = 0;\n}\n");
    assert_eq!(find_next(&lines, 1..2, &["@"]), None);
    assert_eq!(find_next(&lines, 2..2, &[";"]), None);
}
