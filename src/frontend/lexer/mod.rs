use crate::diagnostics::{Diagnostic, FileId, Span};

mod state;

pub use keyword::Keyword;
pub use token::{Token, TokenKind};

mod keyword {
    use super::TokenKind;

    /// Reserved keywords recognised by the lexer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Keyword {
        Public,
        Private,
        Internal,
        Protected,
        Readonly,
        Static,
        Const,
        Class,
        Struct,
        Where,
        Return,
        If,
        Else,
        Var,
        New,
        This,
        Null,
        True,
        False,
        Get,
        Set,
    }

    impl Keyword {
        #[must_use]
        pub fn from_ident(ident: &str) -> Option<Self> {
            KEYWORDS
                .iter()
                .find_map(|(name, keyword)| (*name == ident).then_some(*keyword))
        }

        #[must_use]
        pub fn as_str(self) -> &'static str {
            KEYWORDS
                .iter()
                .find_map(|(name, keyword)| (*keyword == self).then_some(*name))
                .unwrap_or("<keyword>")
        }

        pub fn token_kind(self) -> TokenKind {
            TokenKind::Keyword(self)
        }

        /// Keywords that may appear in a member or parameter modifier list.
        #[must_use]
        pub fn is_modifier(self) -> bool {
            matches!(
                self,
                Keyword::Public
                    | Keyword::Private
                    | Keyword::Internal
                    | Keyword::Protected
                    | Keyword::Readonly
                    | Keyword::Static
                    | Keyword::Const
            )
        }
    }

    const KEYWORDS: &[(&str, Keyword)] = &[
        ("public", Keyword::Public),
        ("private", Keyword::Private),
        ("internal", Keyword::Internal),
        ("protected", Keyword::Protected),
        ("readonly", Keyword::Readonly),
        ("static", Keyword::Static),
        ("const", Keyword::Const),
        ("class", Keyword::Class),
        ("struct", Keyword::Struct),
        ("where", Keyword::Where),
        ("return", Keyword::Return),
        ("if", Keyword::If),
        ("else", Keyword::Else),
        ("var", Keyword::Var),
        ("new", Keyword::New),
        ("this", Keyword::This),
        ("null", Keyword::Null),
        ("true", Keyword::True),
        ("false", Keyword::False),
        ("get", Keyword::Get),
        ("set", Keyword::Set),
    ];
}

mod token {
    use super::keyword::Keyword;

    /// Token emitted by the lexer.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Token {
        pub kind: TokenKind,
        pub lexeme: String,
        pub span: super::Span,
    }

    /// Token categories understood by the parsers.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TokenKind {
        Identifier,
        NumberLiteral(i64),
        StringLiteral(String),
        Keyword(Keyword),
        Punctuation(char),
        Operator(&'static str),
        Comment,
        Whitespace,
        Unknown(char),
    }

    impl TokenKind {
        #[must_use]
        pub fn is_trivia(&self) -> bool {
            matches!(self, TokenKind::Comment | TokenKind::Whitespace)
        }
    }
}

/// Result of lexing a source string.
#[derive(Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    pub file_id: FileId,
}

impl LexOutput {
    /// Tokens with whitespace and comments removed, ready for the parsers.
    #[must_use]
    pub fn significant_tokens(self) -> Vec<Token> {
        self.tokens
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect()
    }
}

/// Lex an entire source string.
#[must_use]
pub fn lex(source: &str) -> LexOutput {
    state::run(source)
}

/// Lex an entire source string with a known file id.
#[must_use]
pub fn lex_with_file(source: &str, file_id: FileId) -> LexOutput {
    state::run_with_file(source, file_id)
}
