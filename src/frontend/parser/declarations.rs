use super::*;
use crate::syntax::expr::ExprNode;

/// Identifiers accepted as modifiers when another name follows them.
const CONTEXTUAL_MODIFIERS: &[&str] = &[
    "abstract", "virtual", "override", "sealed", "extern", "volatile", "required",
];

parser_impl! {
    pub(super) fn parse_type_declaration(&mut self) -> Option<TypeDecl> {
        let start = self.index;
        let modifiers = self.parse_modifiers();
        let kind = if self.consume_keyword(Keyword::Class) {
            TypeKind::Class
        } else if self.consume_keyword(Keyword::Struct) {
            TypeKind::Struct
        } else {
            let span = self.current_span();
            let found = self.peek().map(|token| token.lexeme.clone()).unwrap_or_default();
            self.push_error(
                format!("expected `class` or `struct` declaration, found `{found}`"),
                span,
            );
            self.synchronize_type();
            return None;
        };

        let Some((name, name_span)) = self.consume_identifier("expected type name") else {
            self.synchronize_type();
            return None;
        };
        let mut generics = self.parse_generic_params();
        let primary_parameters = if self.check_punctuation('(') {
            Some(self.parse_primary_parameters())
        } else {
            None
        };
        let base = if self.consume_punctuation(':') {
            self.parse_base_spec()
        } else {
            None
        };
        while self.check_keyword(Keyword::Where) {
            self.parse_where_clause(&mut generics);
        }

        let members = self.parse_type_body();
        Some(TypeDecl {
            modifiers,
            kind,
            name,
            name_span,
            generics,
            primary_parameters,
            base,
            members,
            span: self.span_from(start),
        })
    }

    /// Collect modifiers syntactically; validation is a semantic concern.
    pub(super) fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        while let Some(token) = self.peek() {
            let is_modifier = match &token.kind {
                TokenKind::Keyword(keyword) => keyword.is_modifier(),
                TokenKind::Identifier => {
                    CONTEXTUAL_MODIFIERS.contains(&token.lexeme.as_str())
                        && self.peek_n(1).is_some_and(|next| {
                            matches!(next.kind, TokenKind::Identifier | TokenKind::Keyword(_))
                        })
                }
                _ => false,
            };
            if !is_modifier {
                break;
            }
            modifiers.push(Modifier::new(token.lexeme.clone(), token.span));
            self.advance();
        }
        modifiers
    }

    /// `[target: Name, Other]` lists, one `Attribute` per name.
    pub(super) fn parse_attribute_lists(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        while self.check_punctuation('[') {
            self.advance();
            let target = if self.check_identifier() && self.check_punctuation_n(1, ':') {
                let target = self.peek().map(|token| token.lexeme.clone());
                self.advance();
                self.advance();
                target
            } else {
                None
            };
            loop {
                let Some((name, span)) = self.consume_identifier("expected attribute name") else {
                    break;
                };
                attributes.push(Attribute {
                    target: target.clone(),
                    name,
                    span,
                });
                if !self.consume_punctuation(',') {
                    break;
                }
            }
            if !self.expect_punctuation(']') {
                self.skip_expression_until_terminator();
                self.consume_punctuation(']');
            }
        }
        attributes
    }

    fn parse_generic_params(&mut self) -> Vec<GenericParam> {
        let mut generics = Vec::new();
        if !self.check_operator("<") {
            return generics;
        }
        self.advance();
        loop {
            let Some((name, span)) = self.consume_identifier("expected generic parameter name")
            else {
                break;
            };
            if generics.iter().any(|param: &GenericParam| param.name == name) {
                self.push_error(format!("duplicate generic parameter `{name}`"), Some(span));
            }
            generics.push(GenericParam {
                name,
                span,
                constraint: None,
            });
            if !self.consume_punctuation(',') {
                break;
            }
        }
        if !self.consume_operator(">") {
            let span = self.current_span();
            self.push_error("expected `>` to close generic parameter list", span);
        }
        generics
    }

    fn parse_primary_parameters(&mut self) -> Vec<PrimaryConstructorParameter> {
        let mut parameters = Vec::new();
        self.expect_punctuation('(');
        if self.consume_punctuation(')') {
            return parameters;
        }
        loop {
            match self.parse_primary_parameter() {
                Some(parameter) => {
                    let duplicate = parameters
                        .iter()
                        .any(|existing: &PrimaryConstructorParameter| {
                            existing.name == parameter.name
                        });
                    if duplicate {
                        self.push_error(
                            format!("duplicate parameter `{}`", parameter.name),
                            Some(parameter.name_span),
                        );
                    }
                    parameters.push(parameter);
                }
                None => self.skip_expression_until_terminator(),
            }
            if !self.consume_punctuation(',') {
                break;
            }
        }
        self.expect_punctuation(')');
        parameters
    }

    fn parse_primary_parameter(&mut self) -> Option<PrimaryConstructorParameter> {
        let start = self.index;
        let attributes = self.parse_attribute_lists();
        let modifiers = self.parse_modifiers();
        let ty = self.parse_type("for primary constructor parameter")?;
        let (name, name_span) = self.consume_identifier("expected parameter name")?;
        let default = if self.consume_operator("=") {
            self.parse_expression()
        } else {
            None
        };
        Some(PrimaryConstructorParameter {
            attributes,
            modifiers,
            ty,
            name,
            name_span,
            default,
            span: self.span_from(start),
        })
    }

    fn parse_base_spec(&mut self) -> Option<BaseSpec> {
        let start = self.index;
        let ty = self.parse_type("after `:`")?;
        let args = if self.consume_punctuation('(') {
            Some(self.parse_call_arguments())
        } else {
            None
        };
        Some(BaseSpec {
            ty,
            args,
            span: self.span_from(start),
        })
    }

    /// Arguments after an already consumed `(`, through the closing `)`.
    pub(super) fn parse_call_arguments(&mut self) -> Vec<ExprNode> {
        let mut args = Vec::new();
        if self.consume_punctuation(')') {
            return args;
        }
        loop {
            if let Some(arg) = self.parse_expression() {
                args.push(arg);
            }
            if !self.consume_punctuation(',') {
                break;
            }
        }
        self.expect_punctuation(')');
        args
    }

    fn parse_where_clause(&mut self, generics: &mut [GenericParam]) {
        self.advance(); // `where`
        let Some((name, span)) =
            self.consume_identifier("expected generic parameter name after `where`")
        else {
            return;
        };
        if !self.expect_punctuation(':') {
            return;
        }
        let constraint = if self.consume_keyword(Keyword::Class) {
            Some(GenericConstraint::Class)
        } else if self.consume_keyword(Keyword::Struct) {
            Some(GenericConstraint::Struct)
        } else {
            self.parse_type("as generic constraint")
                .map(GenericConstraint::Type)
        };
        match generics.iter_mut().find(|param| param.name == name) {
            Some(param) if param.constraint.is_some() => {
                self.push_error(
                    format!("generic parameter `{name}` already has a constraint"),
                    Some(span),
                );
            }
            Some(param) => param.constraint = constraint,
            None => self.push_error(
                format!("`{name}` is not a generic parameter of this type"),
                Some(span),
            ),
        }
    }

    fn parse_type_body(&mut self) -> Vec<Member> {
        let mut members = Vec::new();
        if !self.expect_punctuation('{') {
            self.synchronize_type();
            return members;
        }
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Punctuation('}') {
                break;
            }
            let before = self.index;
            if let Some(member) = self.parse_member() {
                members.push(member);
            }
            if self.index == before {
                self.advance();
            }
        }
        self.expect_punctuation('}');
        members
    }

    /// Skip ahead to something that can start a type declaration.
    fn synchronize_type(&mut self) {
        while let Some(token) = self.peek() {
            let starts_type = match token.kind {
                TokenKind::Keyword(keyword) => {
                    matches!(keyword, Keyword::Class | Keyword::Struct) || keyword.is_modifier()
                }
                _ => false,
            };
            if starts_type {
                return;
            }
            self.advance();
        }
    }
}
