use super::*;
use crate::frontend::parser::parse_unit;

fn table_for(source: &str) -> (TypeTable, Vec<Diagnostic>) {
    let parsed = parse_unit(source)
        .unwrap_or_else(|err| panic!("parse failed: {:?}", err.diagnostics()));
    TypeTable::build(&parsed.unit)
}

fn codes_of(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().filter_map(Diagnostic::code_str).collect()
}

#[test]
fn classifies_builtins_generics_and_nullables() {
    let table = TypeTable::with_builtins();
    assert_eq!(table.classify(&Ty::int()), TypeCategory::Value);
    assert_eq!(table.classify(&Ty::string()), TypeCategory::Reference);
    assert_eq!(
        table.classify(&Ty::nullable(Ty::int())),
        TypeCategory::NullableValue
    );
    let unconstrained = Ty::Param {
        name: "T".into(),
        constraint: ParamConstraint::None,
    };
    assert_eq!(table.classify(&unconstrained), TypeCategory::Unknown);
    let class_bound = Ty::Param {
        name: "T".into(),
        constraint: ParamConstraint::Class,
    };
    assert_eq!(table.classify(&class_bound), TypeCategory::Reference);
    assert_eq!(table.classify(&Ty::Void), TypeCategory::Void);
}

#[test]
fn substitutes_generic_arguments_through_base_chain() {
    let (table, diagnostics) = table_for(
        "class Holder<T> { public T Item; } class Named : Holder<string> { }",
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let member = table
        .resolve_member(&Ty::named("Named"), &MemberName::Static("Item".into()))
        .expect("inherited member");
    assert_eq!(member.ty, Ty::string());
    assert_eq!(member.owner, "Holder");
}

#[test]
fn indexed_names_use_the_string_indexer() {
    let table = TypeTable::with_builtins();
    let dictionary = Ty::generic("Dictionary", vec![Ty::string(), Ty::int()]);
    let member = table
        .resolve_member(&dictionary, &MemberName::Indexed("total".into()))
        .expect("string indexer");
    assert_eq!(member.ty, Ty::int());
    assert!(member.is_settable());

    let list = Ty::generic("List", vec![Ty::int()]);
    assert!(table
        .resolve_member(&list, &MemberName::Indexed("total".into()))
        .is_none());
    assert_eq!(table.resolve_indexer(&list, 1).map(|sig| sig.ty), Some(Ty::int()));
}

#[test]
fn falls_back_to_object_members() {
    let table = TypeTable::with_builtins();
    let member = table
        .resolve_member(&Ty::nullable(Ty::int()), &MemberName::Static("ToString".into()))
        .expect("object member");
    assert!(member.is_method());
    assert_eq!(
        table
            .resolve_member(&Ty::nullable(Ty::int()), &MemberName::Static("Value".into()))
            .map(|sig| sig.ty),
        Some(Ty::int())
    );
}

#[test]
fn assignability_covers_null_widening_and_inheritance() {
    let (table, _) = table_for("class Animal { } class Dog : Animal { } struct Point { }");
    assert!(is_assignable(&table, &Ty::Null, &Ty::string()));
    assert!(is_assignable(&table, &Ty::Null, &Ty::nullable(Ty::int())));
    assert!(!is_assignable(&table, &Ty::Null, &Ty::named("Point")));
    assert!(is_assignable(&table, &Ty::int(), &Ty::named("long")));
    assert!(!is_assignable(&table, &Ty::named("double"), &Ty::int()));
    assert!(is_assignable(&table, &Ty::int(), &Ty::nullable(Ty::int())));
    assert!(is_assignable(&table, &Ty::named("Dog"), &Ty::named("Animal")));
    assert!(!is_assignable(&table, &Ty::named("Animal"), &Ty::named("Dog")));
    assert!(is_assignable(&table, &Ty::named("Point"), &Ty::object()));
}

#[test]
fn erases_nullable_annotation_on_references() {
    let table = TypeTable::with_builtins();
    let written = TypeExpr::simple("string", Span::new(0, 6)).with_suffix(TypeSuffix::Nullable);
    assert_eq!(table.resolve_type_expr(&written, &[]).ok(), Some(Ty::string()));
    let written = TypeExpr::simple("int", Span::new(0, 3)).with_suffix(TypeSuffix::Nullable);
    assert_eq!(table.resolve_type_expr(&written, &[]).ok(), Some(Ty::nullable(Ty::int())));
}

#[test]
fn reports_declaration_problems() {
    let (_, diagnostics) = table_for(
        r#"
class Widget { int size; string size; public private int other; }
class Widget { }
struct Pair : Widget { }
class Loop : Missing { }
class string { }
"#,
    );
    assert_eq!(
        codes_of(&diagnostics),
        ["TCK002", "TCK002", "TCK003", "TCK010", "TCK020", "TCK001"],
        "{diagnostics:?}"
    );
}

#[test]
fn detects_base_cycles() {
    let (_, diagnostics) = table_for("class A : B { } class B : A { }");
    assert_eq!(codes_of(&diagnostics), ["TCK020", "TCK020"]);
}
