//! Where a primary constructor parameter's bare name may appear.
//!
//! The walk classifies every identifier that names a primary constructor
//! parameter by the context it is evaluated in. The classification is the
//! same for captured and non-captured parameters: capture adds a field, it
//! does not extend the parameter's lifetime.

use crate::diagnostics::Span;
use crate::frontend::ast::{
    AccessorKind, Block, FunctionBody, Member, Parameter, PropertyBody, Statement, TypeDecl,
};
use crate::syntax::expr::{ExprKind, ExprNode, InitializerTarget};

/// When the code containing a reference runs relative to construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceContext {
    /// Runs while the instance is being constructed.
    Initializer,
    /// Runs after construction finished, or outside any instance.
    MemberBody,
}

/// Bare-name references to one parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterReferences {
    pub legal: Vec<Span>,
    pub illegal: Vec<Span>,
}

/// References to each primary constructor parameter of one type, in
/// parameter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterScope {
    parameters: Vec<(String, ParameterReferences)>,
}

impl ParameterScope {
    #[must_use]
    pub fn references(&self, name: &str) -> Option<&ParameterReferences> {
        self.parameters
            .iter()
            .find(|(parameter, _)| parameter == name)
            .map(|(_, references)| references)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterReferences)> {
        self.parameters
            .iter()
            .map(|(name, references)| (name.as_str(), references))
    }

    /// Every member-body reference, ordered by position in the source.
    #[must_use]
    pub fn illegal_references(&self) -> Vec<(&str, Span)> {
        let mut found: Vec<(&str, Span)> = self
            .iter()
            .flat_map(|(name, references)| references.illegal.iter().map(move |span| (name, *span)))
            .collect();
        found.sort_by_key(|(_, span)| (span.start, span.end));
        found
    }

    fn record(&mut self, name: &str, span: Span, context: ReferenceContext) {
        let Some((_, references)) = self
            .parameters
            .iter_mut()
            .find(|(parameter, _)| parameter == name)
        else {
            return;
        };
        match context {
            ReferenceContext::Initializer => references.legal.push(span),
            ReferenceContext::MemberBody => references.illegal.push(span),
        }
    }
}

/// Classify every reference to a primary constructor parameter of `decl`.
///
/// Runs on the declaration as written, before captured fields are added.
#[must_use]
pub fn collect_references(decl: &TypeDecl) -> ParameterScope {
    let mut walker = ScopeWalker {
        scope: ParameterScope {
            parameters: decl
                .primary_parameters()
                .iter()
                .map(|param| (param.name.clone(), ParameterReferences::default()))
                .collect(),
        },
        locals: Vec::new(),
    };
    if walker.scope.parameters.is_empty() {
        return walker.scope;
    }

    for param in decl.primary_parameters() {
        if let Some(default) = &param.default {
            walker.expr(default, ReferenceContext::Initializer);
        }
    }
    if let Some(args) = decl.base.as_ref().and_then(|base| base.args.as_ref()) {
        for arg in args {
            walker.expr(arg, ReferenceContext::Initializer);
        }
    }
    for member in &decl.members {
        walker.member(member);
    }
    walker.scope
}

struct ScopeWalker {
    scope: ParameterScope,
    /// Names declared by locals, method parameters and lambda parameters.
    locals: Vec<Vec<String>>,
}

impl ScopeWalker {
    fn is_shadowed(&self, name: &str) -> bool {
        self.locals
            .iter()
            .any(|frame| frame.iter().any(|local| local == name))
    }

    fn with_frame(
        &mut self,
        names: impl IntoIterator<Item = String>,
        walk: impl FnOnce(&mut Self),
    ) {
        self.locals.push(names.into_iter().collect());
        walk(self);
        self.locals.pop();
    }

    fn declare(&mut self, name: &str) {
        if let Some(frame) = self.locals.last_mut() {
            frame.push(name.to_string());
        }
    }

    fn member(&mut self, member: &Member) {
        let initializer_context = if member.is_static() {
            ReferenceContext::MemberBody
        } else {
            ReferenceContext::Initializer
        };
        match member {
            Member::Field(field) => {
                if let Some(initializer) = &field.initializer {
                    self.expr(initializer, initializer_context);
                }
            }
            Member::Property(property) => {
                self.property_body(&property.body, &[]);
                if let Some(initializer) = &property.initializer {
                    self.expr(initializer, initializer_context);
                }
            }
            Member::Method(method) => {
                self.parameter_defaults(&method.parameters);
                let names = parameter_names(&method.parameters);
                self.with_frame(names, |walker| walker.function_body(&method.body));
            }
            Member::Indexer(indexer) => {
                self.parameter_defaults(&indexer.parameters);
                self.property_body(&indexer.body, &indexer.parameters);
            }
        }
    }

    fn parameter_defaults(&mut self, parameters: &[Parameter]) {
        for param in parameters {
            if let Some(default) = &param.default {
                self.expr(default, ReferenceContext::MemberBody);
            }
        }
    }

    fn property_body(&mut self, body: &PropertyBody, parameters: &[Parameter]) {
        match body {
            PropertyBody::Expression(expr) => {
                self.with_frame(parameter_names(parameters), |walker| {
                    walker.expr(expr, ReferenceContext::MemberBody);
                });
            }
            PropertyBody::Accessors(accessors) => {
                for accessor in accessors {
                    let Some(body) = &accessor.body else {
                        continue;
                    };
                    let mut names = parameter_names(parameters);
                    if accessor.kind == AccessorKind::Set {
                        names.push("value".to_string());
                    }
                    self.with_frame(names, |walker| walker.function_body(body));
                }
            }
        }
    }

    fn function_body(&mut self, body: &FunctionBody) {
        match body {
            FunctionBody::Expression(expr) => self.expr(expr, ReferenceContext::MemberBody),
            FunctionBody::Block(block) => self.block(block),
        }
    }

    fn block(&mut self, block: &Block) {
        self.with_frame(Vec::new(), |walker| {
            for statement in &block.statements {
                walker.statement(statement);
            }
        });
    }

    fn statement(&mut self, statement: &Statement) {
        let context = ReferenceContext::MemberBody;
        match statement {
            Statement::Block(block) => self.block(block),
            Statement::Return { value, .. } => {
                if let Some(value) = value {
                    self.expr(value, context);
                }
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.expr(condition, context);
                self.with_frame(Vec::new(), |walker| walker.statement(then_branch));
                if let Some(else_branch) = else_branch {
                    self.with_frame(Vec::new(), |walker| walker.statement(else_branch));
                }
            }
            Statement::Local {
                name, initializer, ..
            } => {
                if let Some(initializer) = initializer {
                    self.expr(initializer, context);
                }
                self.declare(name);
            }
            Statement::Expression(expr) => self.expr(expr, context),
        }
    }

    fn expr(&mut self, expr: &ExprNode, context: ReferenceContext) {
        match &expr.kind {
            ExprKind::Identifier(name) => {
                if !self.is_shadowed(name) {
                    self.scope.record(name, expr.span, context);
                }
            }
            // A lambda can run long after construction, wherever it was written.
            ExprKind::Lambda(lambda) => {
                let names = lambda.params.iter().map(|param| param.name.clone());
                self.with_frame(names, |walker| {
                    walker.expr(&lambda.body, ReferenceContext::MemberBody);
                });
            }
            ExprKind::New(new_expr) => {
                for arg in &new_expr.args {
                    self.expr(arg, context);
                }
                for initializer in &new_expr.initializers {
                    if let InitializerTarget::Index { indices, .. } = &initializer.target {
                        for index in indices {
                            self.expr(index, context);
                        }
                    }
                    self.expr(&initializer.value, context);
                }
            }
            _ => expr.for_each_child(|child| self.expr(child, context)),
        }
    }
}

fn parameter_names(parameters: &[Parameter]) -> Vec<String> {
    parameters.iter().map(|param| param.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::parse_unit;

    fn scope_for(source: &str) -> ParameterScope {
        let parsed = parse_unit(source)
            .unwrap_or_else(|err| panic!("parse failed: {:?}", err.diagnostics()));
        let decl = parsed.unit.types.first().expect("one type");
        collect_references(decl)
    }

    fn counts(scope: &ParameterScope, name: &str) -> (usize, usize) {
        let references = scope.references(name).expect("parameter");
        (references.legal.len(), references.illegal.len())
    }

    #[test]
    fn initializers_base_arguments_and_defaults_are_legal() {
        let scope = scope_for(
            r#"
            class Person(string first, string last = first) : Named(first + last) {
                string full = first + " " + last;
                string Nick { get; set; } = last;
            }
            "#,
        );
        assert_eq!(counts(&scope, "first"), (3, 0));
        assert_eq!(counts(&scope, "last"), (3, 0));
    }

    #[test]
    fn bodies_lambdas_and_static_initializers_are_illegal() {
        let scope = scope_for(
            r#"
            class Person(string name) {
                static string shared = name;
                string Upper() => name.ToUpper();
                string Label => name;
                string Deferred = new Func(() => name);
                void Greet(string greeting = name) { }
            }
            "#,
        );
        assert_eq!(counts(&scope, "name"), (0, 5));
        let spans = scope.illegal_references();
        assert!(spans.windows(2).all(|pair| pair[0].1.start < pair[1].1.start));
    }

    #[test]
    fn locals_and_parameters_shadow_primary_parameters() {
        let scope = scope_for(
            r#"
            class Counter(int count) {
                int Add(int count) => count + 1;
                int Twice() { var count = 2; return count * 2; }
                int Apply() => Run(count => count);
                int Late() { var total = count; return total; }
                int Setter { set { var copy = value; } }
            }
            "#,
        );
        assert_eq!(counts(&scope, "count"), (0, 1));
    }

    #[test]
    fn member_names_are_not_parameter_references() {
        let scope = scope_for(
            r#"
            class Widget(string name) {
                public string Name;
                string Other(Widget other) => other.name + this.$name;
            }
            "#,
        );
        assert_eq!(counts(&scope, "name"), (0, 0));
    }
}
