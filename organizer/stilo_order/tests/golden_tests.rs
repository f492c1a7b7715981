//! End-to-end fixtures: exact output for small buffers.

#![allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]

use pretty_assertions::assert_eq;
use stilo_order::{organize_source, Options};

fn organize(source: &str) -> String {
    let organized = organize_source(source, &Options::default()).unwrap();
    assert!(organized.skipped.is_empty(), "skipped: {:?}", organized.skipped);
    organized.text
}

fn organize_with(source: &str, options: &Options) -> String {
    organize_source(source, options).unwrap().text
}

#[test]
fn constructor_then_variables_then_methods() {
    let source = "class A {\n  void m() {\n    body();\n  }\n\n  int x = 0;\n\n  A();\n}\n";
    let expected = "class A {\n  A();\n\n  int x = 0;\n\n  void m() {\n    body();\n  }\n}\n";
    assert_eq!(organize(source), expected);
}

#[test]
fn full_category_ordering() {
    let source = "class A {\n  int x = 0;\n\n  @override\n  Widget build(BuildContext context) {\n    return child;\n  }\n\n  static const _k = 1;\n\n  @override\n  String toString() => 'A';\n\n  final _hidden = true;\n\n  static int count = 0;\n\n  A(this.x);\n}\n";
    let expected = "class A {\n  A(this.x);\n\n  static int count = 0;\n\n  int x = 0;\n\n  static const _k = 1;\n\n  final _hidden = true;\n\n  @override\n  String toString() => 'A';\n\n  @override\n  Widget build(BuildContext context) {\n    return child;\n  }\n}\n";
    assert_eq!(organize(source), expected);
}

#[test]
fn grouped_getters_lead_the_other_methods() {
    let source =
        "class A {\n  void zebra() {}\n  String get b => _b;\n  String get a => _a;\n}\n";

    let grouped = Options {
        group_and_sort_getter_methods: true,
        ..Options::default()
    };
    assert_eq!(
        organize_with(source, &grouped),
        "class A {\n  String get a => _a;\n\n  String get b => _b;\n\n  void zebra() {}\n}\n"
    );

    // without grouping, getters are plain methods in source order
    assert_eq!(
        organize(source),
        "class A {\n  void zebra() {}\n\n  String get b => _b;\n\n  String get a => _a;\n}\n"
    );
}

#[test]
fn sorting_other_methods_is_opt_in() {
    let source = "class A {\n  void zebra() {}\n  void alpha() {}\n}\n";
    let sorted = Options {
        sort_other_methods: true,
        ..Options::default()
    };
    assert_eq!(
        organize_with(source, &sorted),
        "class A {\n  void alpha() {}\n\n  void zebra() {}\n}\n"
    );
    assert_eq!(
        organize(source),
        "class A {\n  void zebra() {}\n\n  void alpha() {}\n}\n"
    );
}

#[test]
fn named_constructors_sort_by_name() {
    let source = "class A {\n  A.zeta() {}\n  A.alpha() {}\n}\n";
    assert_eq!(
        organize(source),
        "class A {\n  A.alpha() {}\n\n  A.zeta() {}\n}\n"
    );
}

#[test]
fn comments_travel_and_pass_through_text_trails() {
    let source = "class A {\n  // doc for x\n  int x;\n\n  some stray text\n}\n";
    assert_eq!(organize(source), source);
}

#[test]
fn interpolated_braces_never_break_the_body() {
    let source =
        "class A {\n  void m() {\n    var s = 'text ${a ? '{' : '}'}';\n  }\n\n  A();\n}\n";
    let expected =
        "class A {\n  A();\n\n  void m() {\n    var s = 'text ${a ? '{' : '}'}';\n  }\n}\n";
    assert_eq!(organize(source), expected);
}

#[test]
fn every_declaration_is_organized_independently() {
    let source = "class B {\n  void m() {}\n  B();\n}\n\nclass C {\n  int y;\n  C();\n}\n";
    let expected =
        "class B {\n  B();\n\n  void m() {}\n}\n\nclass C {\n  C();\n\n  int y;\n}\n";
    assert_eq!(organize(source), expected);
}

#[test]
fn a_custom_ordering_is_honored() {
    let json = r#"{
        "memberOrdering": [
            "public-other-methods",
            "build-method",
            "public-override-methods",
            "private-instance-variables",
            "private-static-variables",
            "public-override-variables",
            "public-instance-variables",
            "public-static-variables",
            "named-constructors",
            "public-constructor"
        ]
    }"#;
    let options = Options::from_json(json).unwrap();
    let source = "class A {\n  A();\n  void m() {}\n}\n";
    assert_eq!(
        organize_with(source, &options),
        "class A {\n  void m() {}\n\n  A();\n}\n"
    );
}

#[test]
fn unrecognized_constructs_skip_only_that_declaration() {
    let source = "class A {\n  void m()\n}\n\nclass B {\n  B();\n  int x;\n}\n";
    let organized = organize_source(source, &Options::default()).unwrap();
    assert_eq!(organized.skipped.len(), 1);
    assert_eq!(organized.skipped[0].0, "A");
    assert!(organized.text.starts_with("class A {\n  void m()\n}\n"));
    assert!(organized
        .text
        .contains("class B {\n  B();\n\n  int x;\n}"));
}

#[test]
fn a_commented_brace_in_a_header_skips_only_that_declaration() {
    let source =
        "class A /* { */ {\n  int x;\n  A();\n}\n\nclass B {\n  void m() {}\n  B();\n}\n";
    let organized = organize_source(source, &Options::default()).unwrap();
    assert_eq!(organized.skipped.len(), 1);
    assert_eq!(organized.skipped[0].0, "A");
    assert_eq!(
        organized.text,
        "class A /* { */ {\n  int x;\n  A();\n}\n\nclass B {\n  B();\n\n  void m() {}\n}\n"
    );
}

#[test]
fn scan_failures_abort_the_whole_buffer() {
    let err = organize_source("class A {\n  var s = '''\n", &Options::default()).unwrap_err();
    assert!(matches!(err, stilo_order::OrganizeError::Scan(_)));
}
