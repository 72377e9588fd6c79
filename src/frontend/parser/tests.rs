use super::*;
use crate::diagnostics::Severity;
use crate::frontend::ast::TypeSuffix;
use crate::syntax::expr::{ExprKind, format_expression};

fn parse_ok(source: &str) -> ParseResult {
    parse_unit(source).unwrap_or_else(|err| panic!("parse failed: {:?}", err.diagnostics()))
}

fn parse_fail(source: &str) -> Vec<Diagnostic> {
    match parse_unit(source) {
        Ok(result) => panic!("expected parse to fail, but succeeded: {result:?}"),
        Err(err) => err.diagnostics().to_vec(),
    }
}

fn only_type(result: &ParseResult) -> &TypeDecl {
    let [decl] = result.unit.types.as_slice() else {
        panic!("expected exactly one type, found {}", result.unit.types.len());
    };
    decl
}

#[test]
fn parses_primary_constructor_parameters() {
    let result = parse_ok(
        "public class Person([field: Required] private readonly string first, \
         string last = \"?\") { }",
    );
    let decl = only_type(&result);
    assert_eq!(decl.kind, TypeKind::Class);
    assert_eq!(decl.name, "Person");

    let params = decl.primary_parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "first");
    assert!(params[0].is_captured());
    assert!(params[0].is_readonly());
    assert_eq!(params[0].attributes.len(), 1);
    assert_eq!(params[0].attributes[0].target.as_deref(), Some("field"));
    assert_eq!(params[0].attributes[0].name, "Required");

    assert_eq!(params[1].name, "last");
    assert!(!params[1].is_captured());
    assert!(params[1].default.is_some());
}

#[test]
fn distinguishes_missing_and_empty_primary_parameter_lists() {
    let result = parse_ok("class Plain { } struct Empty() { }");
    assert!(result.unit.types[0].primary_parameters.is_none());
    assert_eq!(
        result.unit.types[1].primary_parameters.as_ref().map(Vec::len),
        Some(0)
    );
    assert_eq!(result.unit.types[1].kind, TypeKind::Struct);
}

#[test]
fn parses_generics_constraints_and_base_arguments() {
    let result = parse_ok(
        "class Box<T, U>(T item) : Holder<T>(item) where T : class where U : struct { }",
    );
    let decl = only_type(&result);
    assert_eq!(decl.generics.len(), 2);
    assert!(matches!(decl.generics[0].constraint, Some(GenericConstraint::Class)));
    assert!(matches!(decl.generics[1].constraint, Some(GenericConstraint::Struct)));

    let base = decl.base.as_ref().expect("base spec");
    assert_eq!(base.ty.to_string(), "Holder<T>");
    assert_eq!(base.args.as_ref().map(Vec::len), Some(1));
}

#[test]
fn parses_every_member_shape() {
    let source = r#"
class Sample(int seed) {
    private int count = seed;
    public string Name { get; set; } = "x";
    public int Twice => count * 2;
    public int Total {
        get { return count; }
        set => count = value;
    }
    public int Add(int amount, int step = 1) => count + amount * step;
    public void Reset() { count = 0; }
    public char this[int index] => Name[index];
}
"#;
    let result = parse_ok(source);
    let decl = only_type(&result);
    let names: Vec<_> = decl
        .members
        .iter()
        .map(|member| member.name().unwrap_or("this[]"))
        .collect();
    assert_eq!(names, ["count", "Name", "Twice", "Total", "Add", "Reset", "this[]"]);

    match &decl.members[1] {
        Member::Property(property) => {
            assert!(property.is_auto());
            assert!(property.has_setter());
            assert!(property.initializer.is_some());
        }
        other => panic!("expected auto property, found {other:?}"),
    }
    match &decl.members[4] {
        Member::Method(method) => {
            assert_eq!(method.parameters.len(), 2);
            assert!(method.parameters[1].default.is_some());
            assert!(matches!(method.body, FunctionBody::Expression(_)));
        }
        other => panic!("expected method, found {other:?}"),
    }
    match &decl.members[6] {
        Member::Indexer(indexer) => assert_eq!(indexer.parameters.len(), 1),
        other => panic!("expected indexer, found {other:?}"),
    }
}

#[test]
fn indexers_and_base_call_arguments_land_in_the_declaration() {
    let source = r#"
class Grid(int width, string label) : Named(label, width * 2) {
    public int this[int row, int column] {
        get { return row * width + column; }
    }
}
"#;
    let result = parse_ok(source);
    let decl = only_type(&result);

    let base = decl.base.as_ref().expect("base spec");
    let args = base.args.as_ref().expect("base arguments");
    let rendered: Vec<_> = args.iter().map(format_expression).collect();
    assert_eq!(rendered, ["label", "width * 2"]);

    let [Member::Indexer(indexer)] = decl.members.as_slice() else {
        panic!("expected a single indexer, found {:?}", decl.members);
    };
    assert_eq!(indexer.ty.to_string(), "int");
    assert_eq!(indexer.parameters.len(), 2);
    assert!(matches!(&indexer.body, PropertyBody::Accessors(accessors) if accessors.len() == 1));
}

#[test]
fn parses_statements_and_locals() {
    let source = r#"
class Runner {
    public int Run(string? text) {
        var length = text?.Length ?? 0;
        int[] buffer;
        List<string> names = new List<string>();
        if (length > 3) return length; else { buffer = null; }
        length = length ? 1 : 2;
        return 0;
    }
}
"#;
    let result = parse_ok(source);
    let Member::Method(method) = &only_type(&result).members[0] else {
        panic!("expected method");
    };
    assert_eq!(method.parameters[0].ty.suffixes, [TypeSuffix::Nullable]);
    let FunctionBody::Block(block) = &method.body else {
        panic!("expected block body");
    };
    assert_eq!(block.statements.len(), 6);
    assert!(matches!(
        &block.statements[0],
        Statement::Local { ty: None, name, .. } if name == "length"
    ));
    match &block.statements[1] {
        Statement::Local {
            ty: Some(ty),
            initializer: None,
            ..
        } => assert_eq!(ty.to_string(), "int[]"),
        other => panic!("expected typed local, found {other:?}"),
    }
    assert!(matches!(&block.statements[3], Statement::If { else_branch: Some(_), .. }));
    match &block.statements[4] {
        Statement::Expression(expr) => {
            assert!(matches!(expr.kind, ExprKind::Assign { .. }));
            assert_eq!(format_expression(expr), "length = length ? 1 : 2");
        }
        other => panic!("expected expression statement, found {other:?}"),
    }
}

#[test]
fn keeps_unknown_modifiers_for_semantic_validation() {
    let result = parse_ok("class C(static public int value, virtual string label) { }");
    let params = only_type(&result).primary_parameters();
    let words: Vec<_> = params[0].modifiers.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(words, ["static", "public"]);
    let words: Vec<_> = params[1].modifiers.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(words, ["virtual"]);
}

#[test]
fn reports_missing_member_name_and_recovers() {
    let diagnostics = parse_fail("class C { int = 4; int ok; } class D { }");
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert!(matches!(diagnostics[0].severity, Severity::Error));
    assert!(diagnostics[0].message.contains("expected member name"));
}

#[test]
fn reports_bare_indexed_member_in_body() {
    let diagnostics = parse_fail("class C { int Get() => $name; }");
    assert!(
        diagnostics
            .iter()
            .any(|diag| diag.message.contains("requires a receiver")),
        "{diagnostics:?}"
    );
}

#[test]
fn rejects_where_clause_for_unknown_parameter() {
    let diagnostics = parse_fail("class C<T> where U : class { }");
    assert!(diagnostics[0].message.contains("`U` is not a generic parameter"));
}

#[test]
fn reports_non_type_tokens_at_top_level() {
    let diagnostics = parse_fail("return 4; class C { }");
    assert!(diagnostics[0].message.contains("expected `class` or `struct`"));
}

#[test]
fn parse_error_attaches_file_for_rendering() {
    let source = "class C { int }";
    let err = parse_unit(source).expect_err("should fail");
    let err = err.with_file("broken.chic", source);
    assert_eq!(
        err.files().path(FileId(0)).map(|p| p.display().to_string()),
        Some("broken.chic".into())
    );
    assert!(!err.diagnostics().is_empty());
}
