mod common;

use chic_resolve::lowering::Lowered;
use chic_resolve::typeck::InferredResultType;
use common::{Evaluator, Object, Value, check};

const NODES: &str = r#"
class Node {
    public int n;
    public int? bonus;
    public Node m(int a, int b) => this;
}
"#;

fn single_root(body: &str) -> Lowered {
    let report = check(&format!("{NODES}\n{body}"));
    assert!(!report.has_errors(), "{:?}", report.diagnostics);
    assert_eq!(report.lowered.len(), 1, "{:?}", report.lowered);
    report.lowered[0].lowered.clone()
}

fn node(n: i64, m: Value) -> Value {
    Value::object(
        Object::default()
            .with_field("n", Value::Int(n))
            .with_method("m", m),
    )
}

fn evaluator(e: Value) -> Evaluator {
    Evaluator::default()
        .with_global("e", e)
        .with_global("a", Value::Int(1))
        .with_global("b", Value::Int(2))
}

#[test]
fn nested_chain_evaluates_its_operand_once() {
    let lowered = single_root(
        r#"
        class Walker {
            Node e;
            int? Run(int a, int b) => e?.m(a, b)?.n;
        }
        "#,
    );
    assert_eq!(
        lowered.to_string(),
        "let $t1 = (let $t0 = e in ($t0 == null ? null : $t0.m(a, b))) in ($t1 == null ? null : (int?)($t1.n))"
    );

    let inner = node(7, Value::Null);
    let mut eval = evaluator(node(1, inner));
    assert_eq!(eval.eval(&lowered), Value::Int(7));
    assert_eq!(eval.reads_of("e"), 1);
    assert_eq!(eval.calls_of("m"), 1);
    assert_eq!((eval.reads_of("a"), eval.reads_of("b")), (1, 1));
}

#[test]
fn null_operand_short_circuits_every_link() {
    let lowered = single_root(
        r#"
        class Walker {
            Node e;
            int? Run(int a, int b) => e?.m(a, b)?.n;
        }
        "#,
    );
    let mut eval = evaluator(Value::Null);
    assert_eq!(eval.eval(&lowered), Value::Null);
    assert_eq!(eval.reads_of("e"), 1);
    assert_eq!(eval.calls_of("m"), 0);
    assert_eq!(eval.reads_of("a"), 0);

    // A null from the middle of the chain stops the rest of it.
    let mut eval = evaluator(node(1, Value::Null));
    assert_eq!(eval.eval(&lowered), Value::Null);
    assert_eq!(eval.reads_of("e"), 1);
    assert_eq!(eval.calls_of("m"), 1);
}

#[test]
fn deeper_chains_still_read_the_operand_once() {
    let lowered = single_root(
        r#"
        class Walker {
            Node e;
            int? Run(int a, int b) => e?.m(a, b)?.m(a, b).m(b, a)?.n;
        }
        "#,
    );
    let leaf = node(41, Value::Null);
    let middle = node(0, node(0, leaf));
    let mut eval = evaluator(node(0, middle));
    assert_eq!(eval.eval(&lowered), Value::Int(41));
    assert_eq!(eval.reads_of("e"), 1);
    assert_eq!(eval.calls_of("m"), 3);
    assert_eq!(lowered.bound_temps().len(), 3);
}

#[test]
fn nullable_members_are_not_wrapped_twice() {
    let report = check(&format!(
        "{NODES}\n{}",
        r#"
        class Walker {
            Node e;
            int? Bonus() => e?.bonus;
            int? Count() => e?.n;
        }
        "#
    ));
    assert!(!report.has_errors(), "{:?}", report.diagnostics);
    let results: Vec<_> = report
        .navigation
        .iter()
        .map(|record| record.result.clone())
        .collect();
    assert!(matches!(
        &results[..],
        [
            InferredResultType::KnownNullableUnwrapped(_),
            InferredResultType::NullableValue(_)
        ]
    ));
    assert_eq!(results[0].ty(), results[1].ty());

    let bonus = report.navigation[0].lowered.as_ref().expect("lowered");
    assert_eq!(
        bonus.to_string(),
        "let $t0 = e in ($t0 == null ? null : $t0.bonus)"
    );
    let mut eval = evaluator(Value::object(
        Object::default().with_field("bonus", Value::Int(3)),
    ));
    assert_eq!(eval.eval(bonus), Value::Int(3));
}

#[test]
fn unknown_categories_and_guarded_calls_are_errors() {
    let report = check(
        r#"
        class Box<T> {
            public T Item;
        }
        class User<T> {
            Box<T> box;
            T Read() => box?.Item;
            int Fire() {
                var callback = (int x) => x;
                callback?(1);
                return 0;
            }
        }
        "#,
    );
    assert_eq!(report.codes(), ["NAV002", "NAV001"]);
    assert_eq!(report.navigation.len(), 1);
    assert_eq!(report.navigation[0].text, "box?.Item");
    assert_eq!(report.navigation[0].result, InferredResultType::TypeError);
    assert!(report.lowered.iter().all(|root| !root.to_string().contains("$t0")));
}
