//! Expression pretty-printing utilities.

use crate::syntax::expr::builders::{
    BinOp, ExprKind, ExprNode, InitializerTarget, LambdaParam, Literal,
};
use crate::syntax::expr::precedence::{is_right_associative, precedence_of};

const PREC_LAMBDA: u8 = 0;
const PREC_ASSIGN: u8 = 1;
const PREC_CONDITIONAL: u8 = 2;
const PREC_BINARY_BASE: u8 = 10;
const PREC_UNARY: u8 = 30;
const PREC_POSTFIX: u8 = 40;
const PREC_PRIMARY: u8 = 50;

/// Render an expression tree into a canonical textual form.
#[must_use]
pub fn format_expression(expr: &ExprNode) -> String {
    render(expr).text
}

/// Render a literal the way it is spelled in source.
#[must_use]
pub fn format_literal(literal: &Literal) -> String {
    match literal {
        Literal::Int(value) => value.to_string(),
        Literal::Str(text) => quote_string(text),
        Literal::Bool(value) => value.to_string(),
        Literal::Null => "null".to_string(),
    }
}

#[must_use]
pub fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

struct Rendered {
    text: String,
    precedence: u8,
}

impl Rendered {
    fn new(text: String, precedence: u8) -> Self {
        Self { text, precedence }
    }

    fn at_least(self, precedence: u8) -> String {
        if self.precedence < precedence {
            format!("({})", self.text)
        } else {
            self.text
        }
    }
}

fn render(expr: &ExprNode) -> Rendered {
    match &expr.kind {
        ExprKind::Literal(literal) => Rendered::new(format_literal(literal), PREC_PRIMARY),
        ExprKind::Identifier(name) => Rendered::new(name.clone(), PREC_PRIMARY),
        ExprKind::This => Rendered::new("this".into(), PREC_PRIMARY),
        ExprKind::Parenthesized(inner) => {
            Rendered::new(format!("({})", render(inner).text), PREC_PRIMARY)
        }
        ExprKind::Unary { op, expr } => Rendered::new(
            format!("{}{}", op.symbol(), render(expr).at_least(PREC_UNARY)),
            PREC_UNARY,
        ),
        ExprKind::Binary { op, left, right } => render_binary(*op, left, right),
        ExprKind::Conditional {
            condition,
            then_branch,
            else_branch,
        } => Rendered::new(
            format!(
                "{} ? {} : {}",
                render(condition).at_least(PREC_CONDITIONAL + 1),
                render(then_branch).at_least(PREC_CONDITIONAL),
                render(else_branch).at_least(PREC_CONDITIONAL),
            ),
            PREC_CONDITIONAL,
        ),
        ExprKind::Assign { target, value } => Rendered::new(
            format!(
                "{} = {}",
                render(target).at_least(PREC_ASSIGN + 1),
                render(value).at_least(PREC_ASSIGN)
            ),
            PREC_ASSIGN,
        ),
        ExprKind::Lambda(lambda) => Rendered::new(
            format!(
                "{} => {}",
                render_lambda_params(&lambda.params),
                render(&lambda.body).at_least(PREC_ASSIGN)
            ),
            PREC_LAMBDA,
        ),
        ExprKind::Member {
            base,
            member,
            null_conditional,
            ..
        } => Rendered::new(
            format!(
                "{}{}{member}",
                render(base).at_least(PREC_POSTFIX),
                access_operator(*null_conditional)
            ),
            PREC_POSTFIX,
        ),
        ExprKind::IndexedMember {
            base,
            name,
            null_conditional,
            ..
        } => Rendered::new(
            format!(
                "{}{}${name}",
                render(base).at_least(PREC_POSTFIX),
                access_operator(*null_conditional)
            ),
            PREC_POSTFIX,
        ),
        ExprKind::Index {
            base,
            indices,
            null_conditional,
        } => Rendered::new(
            format!(
                "{}{}[{}]",
                render(base).at_least(PREC_POSTFIX),
                if *null_conditional { "?" } else { "" },
                render_list(indices)
            ),
            PREC_POSTFIX,
        ),
        ExprKind::Call {
            callee,
            args,
            null_conditional,
        } => Rendered::new(
            format!(
                "{}{}({})",
                render(callee).at_least(PREC_POSTFIX),
                if *null_conditional { "?" } else { "" },
                render_list(args)
            ),
            PREC_POSTFIX,
        ),
        ExprKind::New(new_expr) => {
            let mut text = format!("new {}({})", new_expr.ty, render_list(&new_expr.args));
            if !new_expr.initializers.is_empty() {
                let entries: Vec<String> = new_expr
                    .initializers
                    .iter()
                    .map(|entry| {
                        let target = match &entry.target {
                            InitializerTarget::Member { name, .. } => name.clone(),
                            InitializerTarget::IndexedMember { name, .. } => format!("${name}"),
                            InitializerTarget::Index { indices, .. } => {
                                format!("[{}]", render_list(indices))
                            }
                        };
                        format!("{target} = {}", render(&entry.value).at_least(PREC_ASSIGN))
                    })
                    .collect();
                text.push_str(&format!(" {{ {} }}", entries.join(", ")));
            }
            Rendered::new(text, PREC_PRIMARY)
        }
    }
}

fn render_binary(op: BinOp, left: &ExprNode, right: &ExprNode) -> Rendered {
    let precedence = PREC_BINARY_BASE + precedence_of(op);
    let (left_min, right_min) = if is_right_associative(op) {
        (precedence + 1, precedence)
    } else {
        (precedence, precedence + 1)
    };
    Rendered::new(
        format!(
            "{} {} {}",
            render(left).at_least(left_min),
            op.symbol(),
            render(right).at_least(right_min)
        ),
        precedence,
    )
}

fn render_lambda_params(params: &[LambdaParam]) -> String {
    if let [param] = params
        && param.ty.is_none()
    {
        return param.name.clone();
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|param| match &param.ty {
            Some(ty) => format!("{ty} {}", param.name),
            None => param.name.clone(),
        })
        .collect();
    format!("({})", rendered.join(", "))
}

fn render_list(items: &[ExprNode]) -> String {
    items
        .iter()
        .map(format_expression)
        .collect::<Vec<_>>()
        .join(", ")
}

fn access_operator(null_conditional: bool) -> &'static str {
    if null_conditional { "?." } else { "." }
}
