use crate::diagnostics::Diagnostic;
use crate::frontend::parser::parse_unit;
use crate::typeck::{TypeTable, TyperOutput, check_unit};

fn check(source: &str) -> TyperOutput {
    let parsed = parse_unit(source)
        .unwrap_or_else(|err| panic!("parse failed: {:?}", err.diagnostics()));
    let (table, declaration_problems) = TypeTable::build(&parsed.unit);
    assert!(
        declaration_problems.is_empty(),
        "unexpected declaration diagnostics: {declaration_problems:?}"
    );
    check_unit(&parsed.unit, &table, false)
}

fn codes(source: &str) -> Vec<String> {
    check(source)
        .diagnostics
        .iter()
        .filter_map(Diagnostic::code_str)
        .map(str::to_string)
        .collect()
}

fn messages(source: &str) -> Vec<String> {
    check(source)
        .diagnostics
        .into_iter()
        .map(|diagnostic| diagnostic.message)
        .collect()
}

#[test]
fn well_typed_bodies_are_silent() {
    let source = r#"
        class Counter(int start) {
            int count = start;
            long total;
            List<string> names = new List<string>();
            int? last;

            int Next() { count = count + 1; return count; }
            long Sum(int extra = 2) => total + extra;
            string Describe() => "count: " + count;
            bool Ready => count > 0 && !(last == null);
            int LastOrZero() => last ?? 0;
            int? Maybe(bool flag) => flag ? 1 : null;
            int Apply() {
                var twice = (int x) => x * 2;
                return twice(count);
            }
            void Record(string name) {
                names.Add(name);
                names[0] = name.ToUpper();
                if (names.Count > 3) { var first = names[0]; }
            }
        }
    "#;
    assert!(codes(source).is_empty(), "{:?}", messages(source));
}

#[test]
fn operators_reject_mismatched_operands() {
    let source = r#"
        class C {
            int Negate() => !5;
            bool Compare() => "a" < "b";
            int Combine() => true + 1;
            bool Equal() => 1 == null;
        }
    "#;
    assert_eq!(codes(source), ["TCK201", "TCK201", "TCK201", "TCK201"]);
}

#[test]
fn coalesce_requires_a_nullable_left_operand() {
    let source = r#"
        class C {
            int? maybe;
            string text;
            int Fallback() => maybe ?? 0;
            string Label() => text ?? "none";
            int Broken() => 5 ?? 1;
        }
    "#;
    assert_eq!(
        messages(source),
        ["left operand of `??` has non-nullable type `int`"]
    );
    assert_eq!(codes(source), ["TCK203"]);
}

#[test]
fn reports_unknown_names_members_and_arity() {
    let source = r#"
        class C {
            int Add(int x) => x;
            void Run() {
                missing;
                this.Nope;
                Add(1, 2);
                Add();
            }
        }
    "#;
    assert_eq!(codes(source), ["TCK100", "TCK101", "TCK104", "TCK104"]);
    assert_eq!(
        messages(source)[2],
        "`Add` takes 1 argument(s) but 2 were supplied"
    );
}

#[test]
fn methods_must_be_invoked() {
    let source = r#"
        class C {
            int Helper() => 1;
            int Value() => Helper;
            int Call() => Value()(1);
        }
    "#;
    assert_eq!(codes(source), ["TCK105", "TCK103"]);
}

#[test]
fn static_members_cannot_reach_instance_state() {
    let source = r#"
        class C {
            int count;
            static int shared = 1;
            static int Total() => count + this.count + shared;
        }
    "#;
    assert_eq!(codes(source), ["TCK107", "TCK106"]);
}

#[test]
fn assignment_targets_must_be_settable() {
    let source = r#"
        class C {
            readonly int fixedValue = 1;
            string Name => "x";
            string text;
            void Update(C other) {
                Name = "y";
                fixedValue = 2;
                text = "ok";
                other?.text = "no";
            }
        }
    "#;
    assert_eq!(codes(source), ["TCK202", "TCK202", "TCK202"]);
    assert_eq!(
        messages(source)[2],
        "a null-conditional access cannot be assigned to"
    );
}

#[test]
fn lambdas_need_parameter_types_when_inferred_into_locals() {
    let source = r#"
        class C {
            void Run() {
                var ok = (int x) => x + 1;
                var unknown = x => x;
                var nothing = null;
                int y = ok("s");
            }
        }
    "#;
    assert_eq!(
        messages(source),
        [
            "cannot infer the parameter types of the lambda assigned to `unknown`",
            "cannot infer the type of `nothing` from `null`",
            "expected `int`, found `string`",
        ]
    );
}

#[test]
fn returns_match_the_member_type() {
    let source = r#"
        class C {
            int Missing() { return; }
            void Extra() { return 1; }
            string Wrong() { return 1; }
        }
    "#;
    assert_eq!(
        messages(source),
        [
            "missing return value of type `int`",
            "a `void` member cannot return a value",
            "expected `string`, found `int`",
        ]
    );
}

#[test]
fn object_creation_checks_constructor_and_initializers() {
    let source = r#"
        class Point(int x, int y = 0) {
            public int X;
            public readonly int Tag;
        }
        class Factory {
            Point Origin() => new Point(0);
            Point TooMany() => new Point(1, 2, 3);
            Point Init() => new Point(1) { X = 2, Missing = 3, Tag = 4 };
            Dictionary<string, int> Totals() =>
                new Dictionary<string, int>() { $count = 1, ["sum"] = 2 };
        }
    "#;
    assert_eq!(codes(source), ["TCK104", "TCK101", "TCK202"]);
}

#[test]
fn conditional_branches_unify() {
    let source = r#"
        class C {
            int? Lifted(bool flag) => flag ? 1 : null;
            object Mixed(bool flag) => flag ? 1 : "s";
        }
    "#;
    assert_eq!(
        messages(source),
        ["conditional branches have incompatible types `int` and `string`"]
    );
}

#[test]
fn base_arguments_are_checked_against_the_base_constructor() {
    let source = r#"
        class Animal(string name) { }
        class Dog(string name) : Animal(name) { }
        class Cat : Animal(1) { }
        class Fish : Animal() { }
    "#;
    assert_eq!(codes(source), ["TCK200", "TCK104"]);
}
