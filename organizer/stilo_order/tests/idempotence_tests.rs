//! Organizing already-organized output must be a fixed point, and the
//! whole pipeline must be deterministic.

#![allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]

use pretty_assertions::assert_eq;
use stilo_order::{organize_source, Options};

const FIXTURES: &[&str] = &[
    "class A {\n  void m() {\n    body();\n  }\n\n  int x = 0;\n\n  A();\n}\n",
    "class A {\n  int x = 0;\n\n  @override\n  Widget build(BuildContext context) {\n    return child;\n  }\n\n  static const _k = 1;\n\n  @override\n  String toString() => 'A';\n\n  final _hidden = true;\n\n  static int count = 0;\n\n  A(this.x);\n}\n",
    "class A {\n  // doc for x\n  int x;\n\n  some stray text\n}\n",
    "class A {\n  void m() {\n    var s = 'text ${a ? '{' : '}'}';\n  }\n\n  A();\n}\n",
    "class B {\n  void m() {}\n  B();\n}\n\nclass C {\n  int y;\n  C();\n}\n",
    "class A {\n  A.zeta() {}\n  A.alpha() {}\n\n  @JsonKey(\n    name: 'x',\n  )\n  final String x;\n}\n",
    "enum Color {\n  red,\n  green;\n\n  String get label => name;\n}\n",
];

fn variants() -> Vec<Options> {
    vec![
        Options::default(),
        Options {
            group_and_sort_getter_methods: true,
            ..Options::default()
        },
        Options {
            sort_other_methods: true,
            group_and_sort_getter_methods: true,
            ..Options::default()
        },
    ]
}

#[test]
fn organizing_twice_changes_nothing() {
    for options in variants() {
        for source in FIXTURES {
            let once = organize_source(source, &options).unwrap().text;
            let twice = organize_source(&once, &options).unwrap().text;
            assert_eq!(twice, once, "not a fixed point for {source:?}");
        }
    }
}

#[test]
fn organizing_is_deterministic() {
    for options in variants() {
        for source in FIXTURES {
            let a = organize_source(source, &options).unwrap().text;
            let b = organize_source(source, &options).unwrap().text;
            assert_eq!(a, b);
        }
    }
}

#[test]
fn organized_output_keeps_every_nonblank_line() {
    for source in FIXTURES {
        let organized = organize_source(source, &Options::default()).unwrap().text;
        let mut expected: Vec<&str> = source
            .split('\n')
            .filter(|l| !l.trim().is_empty())
            .collect();
        let mut actual: Vec<&str> = organized
            .split('\n')
            .filter(|l| !l.trim().is_empty())
            .collect();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(actual, expected, "line content changed for {source:?}");
    }
}
