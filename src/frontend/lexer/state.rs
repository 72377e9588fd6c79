use super::{Keyword, LexOutput, Token, TokenKind};
use crate::diagnostics::{DiagnosticSink, FileId, Span};

pub(super) fn run(source: &str) -> LexOutput {
    run_with_file(source, FileId::UNKNOWN)
}

pub(super) fn run_with_file(source: &str, file_id: FileId) -> LexOutput {
    let mut lexer = Lexer::new(source, file_id);
    lexer.lex_all();
    lexer.finish()
}

struct Lexer<'a> {
    source: &'a str,
    iter: core::str::CharIndices<'a>,
    lookahead: Option<(usize, char)>,
    tokens: Vec<Token>,
    diagnostics: DiagnosticSink,
    file_id: FileId,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, file_id: FileId) -> Self {
        let mut iter = source.char_indices();
        let lookahead = iter.next();
        Self {
            source,
            iter,
            lookahead,
            tokens: Vec::new(),
            diagnostics: DiagnosticSink::new("LEX"),
            file_id,
        }
    }

    fn finish(self) -> LexOutput {
        let Lexer {
            tokens,
            diagnostics,
            file_id,
            ..
        } = self;
        LexOutput {
            tokens,
            diagnostics: diagnostics.into_vec(),
            file_id,
        }
    }

    fn lex_all(&mut self) {
        while let Some((start, ch)) = self.lookahead {
            match ch {
                c if c.is_whitespace() => self.consume_whitespace(start),
                c if c.is_alphabetic() || c == '_' => self.consume_identifier(start),
                c if c.is_ascii_digit() => self.consume_number(start),
                '"' => self.consume_string_literal(start),
                '/' => self.consume_slash(start),
                '{' | '}' | '(' | ')' | '[' | ']' | ';' | ',' | ':' | '.' | '$' => {
                    self.emit_single_char_token(start, ch, TokenKind::Punctuation(ch));
                    self.bump();
                }
                '?' => self.consume_question(start),
                '=' | '+' | '-' | '*' | '%' | '!' | '<' | '>' | '&' | '|' => {
                    self.consume_operator(start, ch);
                }
                _ => {
                    self.report(
                        format!("unexpected character `{ch}`"),
                        Span::in_file(self.file_id, start, start + ch.len_utf8()),
                    );
                    self.emit_single_char_token(start, ch, TokenKind::Unknown(ch));
                    self.bump();
                }
            }
        }
    }

    fn bump(&mut self) {
        self.lookahead = self.iter.next();
    }

    fn peek_next(&self) -> Option<char> {
        self.iter.clone().next().map(|(_, ch)| ch)
    }

    fn current_offset(&self) -> usize {
        self.lookahead
            .map(|(idx, _)| idx)
            .unwrap_or(self.source.len())
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        &self.source[start..end]
    }

    fn emit(&mut self, start: usize, end: usize, kind: TokenKind) {
        self.tokens.push(Token {
            kind,
            lexeme: self.slice(start, end).to_string(),
            span: Span::in_file(self.file_id, start, end),
        });
    }

    fn emit_single_char_token(&mut self, start: usize, ch: char, kind: TokenKind) {
        let end = start + ch.len_utf8();
        self.tokens.push(Token {
            kind,
            lexeme: ch.to_string(),
            span: Span::in_file(self.file_id, start, end),
        });
    }

    fn report(&mut self, message: String, span: Span) {
        self.diagnostics.push_error(message, Some(span));
    }

    fn consume_whitespace(&mut self, start: usize) {
        while let Some((_, ch)) = self.lookahead {
            if !ch.is_whitespace() {
                break;
            }
            self.bump();
        }
        let end = self.current_offset();
        self.emit(start, end, TokenKind::Whitespace);
    }

    fn consume_identifier(&mut self, start: usize) {
        while let Some((_, ch)) = self.lookahead {
            if ch.is_alphanumeric() || ch == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let end = self.current_offset();
        let kind = match Keyword::from_ident(self.slice(start, end)) {
            Some(keyword) => keyword.token_kind(),
            None => TokenKind::Identifier,
        };
        self.emit(start, end, kind);
    }

    fn consume_number(&mut self, start: usize) {
        while let Some((_, ch)) = self.lookahead {
            if ch.is_ascii_digit() || ch == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let end = self.current_offset();
        let digits: String = self.slice(start, end).chars().filter(|ch| *ch != '_').collect();
        let value = match digits.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                self.report(
                    format!("integer literal `{digits}` is out of range"),
                    Span::in_file(self.file_id, start, end),
                );
                0
            }
        };
        self.emit(start, end, TokenKind::NumberLiteral(value));
    }

    fn consume_string_literal(&mut self, start: usize) {
        self.bump();
        let mut value = String::new();
        let mut terminated = false;
        while let Some((_, ch)) = self.lookahead {
            self.bump();
            match ch {
                '"' => {
                    terminated = true;
                    break;
                }
                '\\' => {
                    let Some((_, escaped)) = self.lookahead else {
                        break;
                    };
                    self.bump();
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        '0' => '\0',
                        other => other,
                    });
                }
                '\n' => break,
                other => value.push(other),
            }
        }
        let end = self.current_offset();
        if !terminated {
            self.report(
                "unterminated string literal".into(),
                Span::in_file(self.file_id, start, end),
            );
        }
        self.emit(start, end, TokenKind::StringLiteral(value));
    }

    fn consume_slash(&mut self, start: usize) {
        match self.peek_next() {
            Some('/') => {
                while let Some((_, ch)) = self.lookahead {
                    if ch == '\n' {
                        break;
                    }
                    self.bump();
                }
                let end = self.current_offset();
                self.emit(start, end, TokenKind::Comment);
            }
            Some('*') => {
                self.bump();
                self.bump();
                let mut closed = false;
                while let Some((_, ch)) = self.lookahead {
                    self.bump();
                    if ch == '*' && matches!(self.lookahead, Some((_, '/'))) {
                        self.bump();
                        closed = true;
                        break;
                    }
                }
                let end = self.current_offset();
                if !closed {
                    self.report(
                        "unterminated block comment".into(),
                        Span::in_file(self.file_id, start, end),
                    );
                }
                self.emit(start, end, TokenKind::Comment);
            }
            _ => {
                self.emit_single_char_token(start, '/', TokenKind::Operator("/"));
                self.bump();
            }
        }
    }

    fn consume_question(&mut self, start: usize) {
        if self.peek_next() == Some('?') {
            self.bump();
            self.bump();
            self.emit(start, start + 2, TokenKind::Operator("??"));
        } else {
            self.emit_single_char_token(start, '?', TokenKind::Punctuation('?'));
            self.bump();
        }
    }

    fn consume_operator(&mut self, start: usize, ch: char) {
        let next = self.peek_next();
        let two: Option<&'static str> = match (ch, next) {
            ('=', Some('>')) => Some("=>"),
            ('=', Some('=')) => Some("=="),
            ('!', Some('=')) => Some("!="),
            ('<', Some('=')) => Some("<="),
            ('>', Some('=')) => Some(">="),
            ('&', Some('&')) => Some("&&"),
            ('|', Some('|')) => Some("||"),
            _ => None,
        };
        if let Some(op) = two {
            self.bump();
            self.bump();
            self.emit(start, start + 2, TokenKind::Operator(op));
            return;
        }
        let single: &'static str = match ch {
            '=' => "=",
            '+' => "+",
            '-' => "-",
            '*' => "*",
            '%' => "%",
            '!' => "!",
            '<' => "<",
            '>' => ">",
            '&' => "&",
            _ => "|",
        };
        self.emit_single_char_token(start, ch, TokenKind::Operator(single));
        self.bump();
    }
}
