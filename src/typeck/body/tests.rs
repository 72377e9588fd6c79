use super::*;
use crate::diagnostics::Diagnostic;
use crate::frontend::parser::parse_unit;

fn check(source: &str, parallel: bool) -> (Vec<Diagnostic>, TyperOutput) {
    let parsed = parse_unit(source)
        .unwrap_or_else(|err| panic!("parse failed: {:?}", err.diagnostics()));
    let (table, declaration_problems) = TypeTable::build(&parsed.unit);
    let output = check_unit(&parsed.unit, &table, parallel);
    (declaration_problems, output)
}

fn rendered(output: &TyperOutput) -> Vec<String> {
    output
        .diagnostics
        .iter()
        .map(|diagnostic| {
            format!(
                "{} {}",
                diagnostic.code_str().unwrap_or("-"),
                diagnostic.message
            )
        })
        .collect()
}

#[test]
fn parallel_checking_keeps_declaration_order() {
    let source = r#"
        class A { int X() => "a"; }
        class B { string Y() => 1; }
        class C { bool Z() => missing; }
        class D { Customer W() => null; }
    "#;
    let (_, sequential) = check(source, false);
    let (_, parallel) = check(source, true);
    assert_eq!(rendered(&sequential), rendered(&parallel));
    assert_eq!(
        rendered(&parallel),
        [
            "TCK200 expected `int`, found `string`",
            "TCK200 expected `string`, found `int`",
            "TCK100 cannot find `missing` in this scope",
        ]
    );
}

#[test]
fn duplicate_declarations_are_only_checked_once() {
    let source = r#"
        class A { int X() => "first"; }
        class A { int X() => "second"; }
    "#;
    let (declaration_problems, output) = check(source, false);
    assert_eq!(declaration_problems.len(), 1);
    assert_eq!(rendered(&output), ["TCK200 expected `int`, found `string`"]);
}

#[test]
fn accessors_and_indexers_see_their_parameters() {
    let source = r#"
        class Store {
            List<string> items;
            string label;
            string Label {
                get { return label; }
                set { label = value; }
            }
            string this[int index] {
                get => items[index];
                set { items[index] = value; }
            }
            int Broken {
                set { return value; }
            }
        }
    "#;
    let (declaration_problems, output) = check(source, false);
    assert!(declaration_problems.is_empty(), "{declaration_problems:?}");
    assert_eq!(
        rendered(&output),
        ["TCK200 a `void` member cannot return a value"]
    );
}

#[test]
fn locals_are_scoped_to_their_block() {
    let source = r#"
        class Scopes {
            int Run(bool flag) {
                if (flag) { var inner = 1; }
                if (flag) var other = 2;
                { int nested = 3; }
                return inner + other + nested;
            }
        }
    "#;
    let (_, output) = check(source, false);
    let codes: Vec<_> = output
        .diagnostics
        .iter()
        .filter_map(Diagnostic::code_str)
        .collect();
    assert_eq!(codes, ["TCK100", "TCK100", "TCK100"]);
}

#[test]
fn written_local_types_are_resolved() {
    let source = r#"
        class Locals {
            void Run() {
                Widget missing = null;
                int? maybe = null;
                string text = maybe;
            }
        }
    "#;
    let (_, output) = check(source, false);
    assert_eq!(
        rendered(&output),
        [
            "TCK001 unknown type `Widget`",
            "TCK200 expected `string`, found `int?`",
        ]
    );
}
