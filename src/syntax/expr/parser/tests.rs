use super::*;
use crate::syntax::expr::builders::{BinOp, ExprKind, InitializerTarget, Literal};
use crate::syntax::expr::format_expression;

#[test]
fn parses_lambda_with_expression_body() {
    let expr =
        parse_expression("(int value) => value + delta").expect("lambda expression should parse");
    match expr.kind {
        ExprKind::Lambda(lambda) => {
            assert_eq!(lambda.params.len(), 1, "expected single parameter");
            let param = &lambda.params[0];
            assert_eq!(param.name, "value");
            assert_eq!(param.ty.as_ref().map(ToString::to_string).as_deref(), Some("int"));
            match lambda.body.kind {
                ExprKind::Binary { op, .. } => assert_eq!(op, BinOp::Add),
                other => panic!("unexpected lambda body node: {other:?}"),
            }
        }
        other => panic!("expected lambda expression, found {other:?}"),
    }
}

#[test]
fn parses_implicitly_typed_lambdas() {
    let expr = parse_expression("x => x?.Length").expect("lambda should parse");
    let ExprKind::Lambda(lambda) = expr.kind else {
        panic!("expected lambda");
    };
    assert!(lambda.params[0].ty.is_none());

    let expr = parse_expression("(a, b) => a ?? b").expect("lambda should parse");
    let ExprKind::Lambda(lambda) = expr.kind else {
        panic!("expected lambda");
    };
    assert_eq!(lambda.params.len(), 2);
}

#[test]
fn lambda_block_bodies_are_rejected() {
    let err = parse_expression("() => { return 1; }").expect_err("block body should fail");
    assert!(err.message.contains("lambda bodies must be expressions"));
}

#[test]
fn safe_member_access_marks_null_conditional() {
    let expr = parse_expression("person?.Name").expect("safe access should parse");
    match expr.kind {
        ExprKind::Member {
            member,
            null_conditional,
            ..
        } => {
            assert_eq!(member, "Name");
            assert!(null_conditional);
        }
        other => panic!("expected member access, found {other:?}"),
    }
}

#[test]
fn indexed_member_is_distinct_from_member_access() {
    let expr = parse_expression("bag.$color").expect("indexed member should parse");
    match expr.kind {
        ExprKind::IndexedMember {
            name,
            null_conditional,
            name_span,
            ..
        } => {
            assert_eq!(name, "color");
            assert!(!null_conditional);
            assert_eq!((name_span.start, name_span.end), (4, 10));
        }
        other => panic!("expected indexed member, found {other:?}"),
    }

    let expr = parse_expression("bag?.$color").expect("safe indexed member should parse");
    assert!(matches!(
        expr.kind,
        ExprKind::IndexedMember {
            null_conditional: true,
            ..
        }
    ));
}

#[test]
fn dollar_requires_adjacent_identifier_and_receiver() {
    let err = parse_expression("bag.$ color").expect_err("space after `$` should fail");
    assert!(err.message.contains("immediately followed"), "{}", err.message);

    let err = parse_expression("$color").expect_err("receiver-less `$name` should fail");
    assert!(err.message.contains("requires a receiver"), "{}", err.message);
}

#[test]
fn safe_element_access_parses_index_list() {
    let expr = parse_expression("grid?[1, 2]").expect("safe element access should parse");
    match expr.kind {
        ExprKind::Index {
            indices,
            null_conditional,
            ..
        } => {
            assert_eq!(indices.len(), 2);
            assert!(null_conditional);
        }
        other => panic!("expected element access, found {other:?}"),
    }
}

#[test]
fn question_paren_is_invocation_without_matching_colon() {
    let expr = parse_expression("handler?(1)").expect("guarded invocation should parse");
    assert!(matches!(
        expr.kind,
        ExprKind::Call {
            null_conditional: true,
            ..
        }
    ));
}

#[test]
fn question_paren_with_colon_is_conditional() {
    let expr = parse_expression("flag ? (a) : b").expect("conditional should parse");
    assert!(matches!(expr.kind, ExprKind::Conditional { .. }));

    let expr = parse_expression("flag ? (x ? (y) : z) : w").expect("nested conditional");
    assert_eq!(format_expression(&expr), "flag ? (x ? (y) : z) : w");

    let expr = parse_expression("flag ? x ? (y) : z : w").expect("unparenthesized nesting");
    let ExprKind::Conditional { then_branch, .. } = expr.kind else {
        panic!("expected outer conditional");
    };
    assert!(matches!(then_branch.kind, ExprKind::Conditional { .. }));
}

#[test]
fn colon_of_an_enclosing_conditional_does_not_claim_question_paren() {
    let expr = parse_expression("flag ? handler?(1) : null").expect("conditional should parse");
    let ExprKind::Conditional {
        then_branch,
        else_branch,
        ..
    } = expr.kind
    else {
        panic!("expected conditional");
    };
    assert!(matches!(
        then_branch.kind,
        ExprKind::Call {
            null_conditional: true,
            ..
        }
    ));
    assert!(matches!(else_branch.kind, ExprKind::Literal(Literal::Null)));

    // Brackets start a fresh level, so the inner `?(` pairs with its own `:`.
    let expr = parse_expression("flag ? (y ? (1) : 2) : 3").expect("bracketed conditional");
    let ExprKind::Conditional { then_branch, .. } = expr.kind else {
        panic!("expected conditional");
    };
    let ExprKind::Parenthesized(inner) = then_branch.kind else {
        panic!("expected parenthesized then-branch");
    };
    assert!(matches!(inner.kind, ExprKind::Conditional { .. }));
}

#[test]
fn chained_navigation_nests_left_to_right() {
    let expr = parse_expression("e?.m(a, b)?.n").expect("chain should parse");
    let ExprKind::Member {
        base,
        null_conditional: true,
        ..
    } = expr.kind
    else {
        panic!("expected outer safe member access");
    };
    let ExprKind::Call {
        callee,
        args,
        null_conditional: false,
    } = base.kind
    else {
        panic!("expected plain call under outer access");
    };
    assert_eq!(args.len(), 2);
    assert!(callee.is_null_conditional());
}

#[test]
fn parentheses_end_a_chain() {
    let expr = parse_expression("(e?.a).b").expect("parenthesized chain should parse");
    let ExprKind::Member { base, .. } = expr.kind else {
        panic!("expected member access");
    };
    assert!(matches!(base.kind, ExprKind::Parenthesized(_)));
    assert!(!base.starts_navigation_chain());
}

#[test]
fn object_creation_accepts_all_initializer_targets() {
    let expr = parse_expression(r#"new Bag() { Label = "x", $color = "red", ["size"] = 3 }"#)
        .expect("object creation should parse");
    let ExprKind::New(new_expr) = expr.kind else {
        panic!("expected object creation");
    };
    assert_eq!(new_expr.ty.name, "Bag");
    assert!(new_expr.args.is_empty());
    assert!(matches!(
        new_expr.initializers[0].target,
        InitializerTarget::Member { ref name, .. } if name == "Label"
    ));
    assert!(matches!(
        new_expr.initializers[1].target,
        InitializerTarget::IndexedMember { ref name, .. } if name == "color"
    ));
    match &new_expr.initializers[2].target {
        InitializerTarget::Index { indices, .. } => {
            assert!(matches!(
                indices[0].kind,
                ExprKind::Literal(Literal::Str(ref key)) if key == "size"
            ));
        }
        other => panic!("expected index initializer, found {other:?}"),
    }
}

#[test]
fn coalesce_is_right_associative_and_loosest_binary() {
    let expr = parse_expression("a ?? b ?? c || d").expect("coalesce should parse");
    let ExprKind::Binary { op, right, .. } = expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinOp::NullCoalesce);
    let ExprKind::Binary { op, right, .. } = right.kind else {
        panic!("expected nested coalesce");
    };
    assert_eq!(op, BinOp::NullCoalesce);
    assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Or, .. }));
}

#[test]
fn assignment_is_right_associative() {
    let expr = parse_expression("a = b = 1").expect("assignment should parse");
    let ExprKind::Assign { value, .. } = expr.kind else {
        panic!("expected assignment");
    };
    assert!(matches!(value.kind, ExprKind::Assign { .. }));
}

#[test]
fn trailing_tokens_are_reported() {
    let err = parse_expression("a b").expect_err("juxtaposed names should fail");
    assert_eq!(err.message, "unexpected token `b` after expression");
}

#[test]
fn spans_cover_whole_postfix_expression() {
    let expr = parse_expression("left?.Right").expect("should parse");
    assert_eq!((expr.span.start, expr.span.end), (0, 11));
}
