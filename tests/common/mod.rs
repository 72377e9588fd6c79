#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use chic_resolve::driver::{CheckOptions, CheckReport, CompilerDriver};
use chic_resolve::lowering::{Lowered, TempId};
use chic_resolve::syntax::expr::{BinOp, ExprKind, ExprNode, Literal, UnOp};

pub fn check(source: &str) -> CheckReport {
    CompilerDriver::new()
        .check_source(Path::new("test.cl"), source, &CheckOptions::default())
        .unwrap_or_else(|err| panic!("check failed: {err}"))
}

/// Runtime value seen by the evaluation double.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Bool(bool),
    Str(String),
    Object(Rc<Object>),
}

impl Value {
    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(object))
    }
}

/// An object with fixed field values; each method returns a canned value.
#[derive(Debug, Default, PartialEq)]
pub struct Object {
    pub fields: HashMap<String, Value>,
    pub methods: HashMap<String, Value>,
}

impl Object {
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn with_method(mut self, name: &str, result: Value) -> Self {
        self.methods.insert(name.into(), result);
        self
    }
}

/// Interprets lowered trees over a fixed environment, counting how often each
/// variable is read and each method is called.
#[derive(Debug, Default)]
pub struct Evaluator {
    globals: HashMap<String, Value>,
    temps: HashMap<TempId, Value>,
    pub reads: HashMap<String, usize>,
    pub calls: HashMap<String, usize>,
}

impl Evaluator {
    pub fn with_global(mut self, name: &str, value: Value) -> Self {
        self.globals.insert(name.into(), value);
        self
    }

    pub fn reads_of(&self, name: &str) -> usize {
        self.reads.get(name).copied().unwrap_or(0)
    }

    pub fn calls_of(&self, name: &str) -> usize {
        self.calls.get(name).copied().unwrap_or(0)
    }

    pub fn eval(&mut self, lowered: &Lowered) -> Value {
        match lowered {
            Lowered::Source(expr) => self.eval_source(expr),
            Lowered::Temp(temp) => self
                .temps
                .get(temp)
                .cloned()
                .unwrap_or_else(|| panic!("{temp} read before it was bound")),
            Lowered::Bind { temp, value, body } => {
                let value = self.eval(value);
                assert!(
                    self.temps.insert(*temp, value).is_none(),
                    "{temp} bound twice"
                );
                self.eval(body)
            }
            Lowered::Conditional {
                condition,
                then_branch,
                else_branch,
            } => match self.eval(condition) {
                Value::Bool(true) => self.eval(then_branch),
                Value::Bool(false) => self.eval(else_branch),
                other => panic!("condition evaluated to {other:?}"),
            },
            Lowered::IsNull(inner) => Value::Bool(self.eval(inner) == Value::Null),
            Lowered::Null(_) => Value::Null,
            Lowered::Unwrap(inner) => {
                let value = self.eval(inner);
                assert_ne!(value, Value::Null, "unwrapped a null value");
                value
            }
            Lowered::Wrap { value, .. } => self.eval(value),
            Lowered::Member { base, name } => {
                let base = self.eval(base);
                self.field(&base, name)
            }
            Lowered::Invoke { callee, args } => {
                let Lowered::Member { base, name } = callee.as_ref() else {
                    panic!("only method calls are supported, found {callee}");
                };
                let receiver = self.eval(base);
                for arg in args {
                    self.eval(arg);
                }
                self.call(&receiver, name)
            }
            Lowered::Binary { op, left, right } => {
                let left = self.eval(left);
                let right = self.eval(right);
                binary(*op, left, right)
            }
            Lowered::Unary { op, operand } => match (op, self.eval(operand)) {
                (UnOp::Not, Value::Bool(value)) => Value::Bool(!value),
                (UnOp::Neg, Value::Int(value)) => Value::Int(-value),
                (op, value) => panic!("cannot apply {op:?} to {value:?}"),
            },
            Lowered::Index { .. } | Lowered::Assign { .. } => {
                panic!("unsupported lowered form {lowered}")
            }
        }
    }

    fn eval_source(&mut self, expr: &ExprNode) -> Value {
        match &expr.kind {
            ExprKind::Identifier(name) => {
                *self.reads.entry(name.clone()).or_default() += 1;
                self.globals
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| panic!("unknown variable `{name}`"))
            }
            ExprKind::Literal(Literal::Int(value)) => Value::Int(*value),
            ExprKind::Literal(Literal::Bool(value)) => Value::Bool(*value),
            ExprKind::Literal(Literal::Str(value)) => Value::Str(value.clone()),
            ExprKind::Literal(Literal::Null) => Value::Null,
            ExprKind::Parenthesized(inner) => self.eval_source(inner),
            ExprKind::Member { base, member, .. } => {
                let base = self.eval_source(base);
                self.field(&base, member)
            }
            ExprKind::Call { callee, args, .. } => {
                let ExprKind::Member { base, member, .. } = &callee.kind else {
                    panic!("only method calls are supported");
                };
                let receiver = self.eval_source(base);
                for arg in args {
                    self.eval_source(arg);
                }
                self.call(&receiver, member)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval_source(left);
                let right = self.eval_source(right);
                binary(*op, left, right)
            }
            other => panic!("unsupported source form {other:?}"),
        }
    }

    fn field(&self, base: &Value, name: &str) -> Value {
        let Value::Object(object) = base else {
            panic!("member `{name}` read from {base:?}");
        };
        object
            .fields
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("object has no field `{name}`"))
    }

    fn call(&mut self, receiver: &Value, name: &str) -> Value {
        let Value::Object(object) = receiver else {
            panic!("method `{name}` called on {receiver:?}");
        };
        *self.calls.entry(name.to_string()).or_default() += 1;
        object
            .methods
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("object has no method `{name}`"))
    }
}

fn binary(op: BinOp, left: Value, right: Value) -> Value {
    match (op, left, right) {
        (BinOp::Add, Value::Int(a), Value::Int(b)) => Value::Int(a + b),
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => Value::Int(a * b),
        (BinOp::Eq, a, b) => Value::Bool(a == b),
        (BinOp::Ne, a, b) => Value::Bool(a != b),
        (BinOp::NullCoalesce, Value::Null, b) => b,
        (BinOp::NullCoalesce, a, _) => a,
        (op, a, b) => panic!("cannot apply {op:?} to {a:?} and {b:?}"),
    }
}
