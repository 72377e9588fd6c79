use super::*;

parser_impl! {
    pub(super) fn parse_member(&mut self) -> Option<Member> {
        let start = self.index;
        let attributes = self.parse_attribute_lists();
        let modifiers = self.parse_modifiers();
        let Some(ty) = self.parse_type("for member declaration") else {
            self.synchronize_member();
            return None;
        };

        if self.consume_keyword(Keyword::This) {
            return self
                .parse_indexer(start, attributes, modifiers, ty)
                .map(Member::Indexer);
        }

        let Some((name, name_span)) = self.consume_identifier("expected member name") else {
            self.synchronize_member();
            return None;
        };

        let member = if self.check_punctuation('(') {
            self.parse_method(start, attributes, modifiers, ty, name, name_span)
                .map(Member::Method)
        } else if self.check_operator("=>") || self.check_punctuation('{') {
            self.parse_property(start, attributes, modifiers, ty, name, name_span)
                .map(Member::Property)
        } else {
            self.parse_field(start, attributes, modifiers, ty, name, name_span)
                .map(Member::Field)
        };
        if member.is_none() {
            self.synchronize_member();
        }
        member
    }

    fn parse_field(
        &mut self,
        start: usize,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        ty: TypeExpr,
        name: String,
        name_span: Span,
    ) -> Option<FieldDecl> {
        let initializer = if self.consume_operator("=") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        if !self.expect_punctuation(';') {
            return None;
        }
        Some(FieldDecl {
            attributes,
            modifiers,
            ty,
            name,
            name_span,
            initializer,
            origin: FieldOrigin::Declared,
            span: self.span_from(start),
        })
    }

    fn parse_property(
        &mut self,
        start: usize,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        ty: TypeExpr,
        name: String,
        name_span: Span,
    ) -> Option<PropertyDecl> {
        let mut initializer = None;
        let body = if self.consume_operator("=>") {
            let expr = self.parse_expression()?;
            if !self.expect_punctuation(';') {
                return None;
            }
            PropertyBody::Expression(expr)
        } else {
            let accessors = self.parse_accessor_list()?;
            if self.consume_operator("=") {
                initializer = Some(self.parse_expression()?);
                if !self.expect_punctuation(';') {
                    return None;
                }
            }
            PropertyBody::Accessors(accessors)
        };
        Some(PropertyDecl {
            attributes,
            modifiers,
            ty,
            name,
            name_span,
            body,
            initializer,
            span: self.span_from(start),
        })
    }

    fn parse_method(
        &mut self,
        start: usize,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        return_type: TypeExpr,
        name: String,
        name_span: Span,
    ) -> Option<MethodDecl> {
        self.advance(); // `(`
        let parameters = self.parse_parameters(')')?;
        let body = self.parse_function_body()?;
        Some(MethodDecl {
            attributes,
            modifiers,
            return_type,
            name,
            name_span,
            parameters,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_indexer(
        &mut self,
        start: usize,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        ty: TypeExpr,
    ) -> Option<IndexerDecl> {
        if !self.expect_punctuation('[') {
            self.synchronize_member();
            return None;
        }
        let Some(parameters) = self.parse_parameters(']') else {
            self.synchronize_member();
            return None;
        };
        if parameters.is_empty() {
            let span = Some(self.previous_span());
            self.push_error("indexers must declare at least one parameter", span);
        }
        let body = if self.consume_operator("=>") {
            let expr = self.parse_expression();
            if !self.expect_punctuation(';') {
                self.synchronize_member();
                return None;
            }
            PropertyBody::Expression(expr?)
        } else if let Some(accessors) = self.parse_accessor_list() {
            PropertyBody::Accessors(accessors)
        } else {
            self.synchronize_member();
            return None;
        };
        Some(IndexerDecl {
            attributes,
            modifiers,
            ty,
            parameters,
            body,
            span: self.span_from(start),
        })
    }

    /// Parameters up to and including `close`; the opening token is consumed.
    fn parse_parameters(&mut self, close: char) -> Option<Vec<Parameter>> {
        let mut parameters = Vec::new();
        if self.consume_punctuation(close) {
            return Some(parameters);
        }
        loop {
            let start = self.index;
            let ty = self.parse_type("for parameter")?;
            let (name, name_span) = self.consume_identifier("expected parameter name")?;
            if parameters.iter().any(|param: &Parameter| param.name == name) {
                self.push_error(format!("duplicate parameter `{name}`"), Some(name_span));
            }
            let default = if self.consume_operator("=") {
                self.parse_expression()
            } else {
                None
            };
            parameters.push(Parameter {
                ty,
                name,
                name_span,
                default,
                span: self.span_from(start),
            });
            if !self.consume_punctuation(',') {
                break;
            }
        }
        self.expect_punctuation(close).then_some(parameters)
    }

    fn parse_function_body(&mut self) -> Option<FunctionBody> {
        if self.consume_operator("=>") {
            let expr = self.parse_expression()?;
            return self
                .expect_punctuation(';')
                .then_some(FunctionBody::Expression(expr));
        }
        if self.check_punctuation('{') {
            return Some(FunctionBody::Block(self.parse_block()));
        }
        let span = self.current_span();
        self.push_error("expected `=>` or `{` to start a body", span);
        None
    }

    fn parse_accessor_list(&mut self) -> Option<Vec<Accessor>> {
        if !self.expect_punctuation('{') {
            return None;
        }
        let mut accessors: Vec<Accessor> = Vec::new();
        while !self.check_punctuation('}') {
            let start = self.index;
            let kind = if self.consume_keyword(Keyword::Get) {
                AccessorKind::Get
            } else if self.consume_keyword(Keyword::Set) {
                AccessorKind::Set
            } else {
                let span = self.current_span();
                let found = self.peek().map(|token| token.lexeme.clone());
                match found {
                    Some(found) => self.push_error(
                        format!("expected `get` or `set` accessor, found `{found}`"),
                        span,
                    ),
                    None => self.push_error("expected `get` or `set` accessor", span),
                }
                return None;
            };
            if accessors.iter().any(|accessor| accessor.kind == kind) {
                let span = Some(self.previous_span());
                self.push_error("duplicate accessor", span);
            }
            let body = if self.consume_punctuation(';') {
                None
            } else {
                Some(self.parse_function_body()?)
            };
            accessors.push(Accessor {
                kind,
                body,
                span: self.span_from(start),
            });
        }
        self.advance(); // `}`
        Some(accessors)
    }
}
