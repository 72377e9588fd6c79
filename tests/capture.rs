mod common;

use chic_resolve::capture::CaptureDecision;
use chic_resolve::frontend::ast::Visibility;
use common::check;

#[test]
fn captured_and_plain_parameters_resolve_in_one_pass() {
    let report = check(
        r#"
        class Person(private readonly string first, string last) {
            public string Full => this.first + " " + last;
        }
        "#,
    );
    assert_eq!(report.codes(), ["CAP001"]);
    let diagnostic = &report.diagnostics[0];
    assert!(diagnostic.message.contains("`last`"), "{}", diagnostic.message);

    let person = &report.declarations[0];
    let fields: Vec<_> = person
        .synthesized_fields()
        .map(|field| (field.name.as_str(), field.visibility, field.readonly))
        .collect();
    assert_eq!(fields, [("first", Visibility::Private, true)]);
    assert!(matches!(
        person.decisions.as_slice(),
        [(_, CaptureDecision::Captured(_)), (_, CaptureDecision::InitializerOnly)]
    ));
}

#[test]
fn initializer_positions_may_read_parameters() {
    let report = check(
        r#"
        class Person(string name) {
            public string Name => "person";
        }
        class Employee(string name, int id, int level = id) : Person(name) {
            int badge = id * 100;
            public int Level { get; } = level;
            string Describe() => Name;
        }
        "#,
    );
    assert!(!report.has_errors(), "{:?}", report.diagnostics);
    let scope = report.scope("Employee").expect("employee scope");
    for name in ["name", "id", "level"] {
        let references = scope.references(name).expect("parameter recorded");
        assert!(!references.legal.is_empty(), "{name}");
        assert!(references.illegal.is_empty(), "{name}");
    }
}

#[test]
fn every_body_reference_is_reported_even_with_a_mirroring_property() {
    let report = check(
        r#"
        class Counter(int start, int step) {
            public int Start { get; } = start;
            int Next() => start + step;
            int Twice() => step * 2;
            int Shadowed(int step) => step;
        }
        "#,
    );
    assert_eq!(report.codes(), ["CAP001", "CAP001", "CAP001"]);
    let scope = report.scope("Counter").expect("counter scope");
    let illegal: Vec<_> = scope
        .illegal_references()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(illegal, ["start", "step", "step"]);
}

#[test]
fn qualifier_problems_do_not_stop_resolution() {
    let report = check(
        r#"
        class Ledger(
            readonly int opening,
            public static int total,
            private private int fee,
            int plain
        ) {
            int Sum() => plain;
        }
        "#,
    );
    assert_eq!(report.codes(), ["CAP002", "CAP002", "CAP002", "CAP001"]);
    let captured: Vec<_> = report.declarations[0]
        .synthesized_fields()
        .map(|field| field.name.as_str())
        .collect();
    assert!(!captured.contains(&"opening"), "{captured:?}");
    assert!(!captured.contains(&"plain"), "{captured:?}");
}

#[test]
fn parallel_resolution_matches_sequential() {
    use chic_resolve::driver::{CheckOptions, CompilerDriver};
    use std::path::Path;

    let mut source = String::new();
    for index in 0..24 {
        source.push_str(&format!(
            "class T{index}(public int kept, int dropped) {{ int Get() => dropped + this.kept; }}\n"
        ));
    }
    let run = |parallel| {
        CompilerDriver::new()
            .check_source(
                Path::new("many.cl"),
                &source,
                &CheckOptions {
                    parallel,
                    trace_pipeline: false,
                },
            )
            .unwrap_or_else(|err| panic!("check failed: {err}"))
    };
    let sequential = run(false);
    let parallel = run(true);
    let spans = |report: &chic_resolve::CheckReport| {
        report
            .diagnostics
            .iter()
            .map(|diagnostic| diagnostic.primary_label.as_ref().map(|label| label.span))
            .collect::<Vec<_>>()
    };
    assert_eq!(sequential.codes().len(), 24);
    assert_eq!(spans(&sequential), spans(&parallel));
    let names = |report: &chic_resolve::CheckReport| {
        report
            .declarations
            .iter()
            .map(|declaration| declaration.name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&sequential), names(&parallel));
}
