use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

pub use crate::frontend::ast::{
    Accessor, AccessorKind, Attribute, BaseSpec, Block, CompilationUnit, FieldDecl, FieldOrigin,
    FunctionBody, GenericConstraint, GenericParam, IndexerDecl, Member, MethodDecl, Modifier,
    Parameter, PrimaryConstructorParameter, PropertyBody, PropertyDecl, Statement, TypeDecl,
    TypeExpr, TypeKind,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink, FileCache, FileId, Span};
use crate::frontend::lexer::{Keyword, LexOutput, Token, TokenKind, lex, lex_with_file};

// Parser submodules wrap their methods in `parser_impl! { ... }` instead of
// spelling out `impl<'a> Parser<'a>` everywhere.
macro_rules! parser_impl {
    ($($items:tt)*) => {
        impl Parser {
            $($items)*
        }
    };
}

mod core;
mod declarations;
mod members;
mod statements;
pub(crate) mod types;

/// Resulting AST and diagnostics from parsing.
#[derive(Debug)]
pub struct ParseResult {
    pub unit: CompilationUnit,
    pub file_id: FileId,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fatal parse error preventing further analysis.
#[derive(Debug)]
pub struct ParseError {
    message: String,
    diagnostics: Vec<Diagnostic>,
    files: FileCache,
}

impl ParseError {
    pub fn new(message: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            message: message.into(),
            diagnostics,
            files: FileCache::default(),
        }
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn files(&self) -> &FileCache {
        &self.files
    }

    /// Attach the source so the diagnostics can be rendered with locations.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let mut files = FileCache::default();
        let file_id = files.add_file(path, source);
        for diagnostic in &mut self.diagnostics {
            if let Some(label) = diagnostic.primary_label.as_mut() {
                label.span = label.span.with_file(file_id);
            }
            for label in &mut diagnostic.secondary_labels {
                label.span = label.span.with_file(file_id);
            }
        }
        self.files = files;
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for ParseError {}

/// Parse a source string into a compilation unit.
///
/// # Errors
/// Returns an error when lexical or syntactic issues prevent construction of a valid unit.
pub fn parse_unit(source: &str) -> Result<ParseResult, ParseError> {
    parse_unit_from_lex(lex(source))
}

/// Parse using a specific file id (for source-mapped diagnostics).
///
/// # Errors
/// Returns an error when lexical or syntactic issues prevent construction of a valid unit.
pub fn parse_unit_in_file(source: &str, file_id: FileId) -> Result<ParseResult, ParseError> {
    parse_unit_from_lex(lex_with_file(source, file_id))
}

fn parse_unit_from_lex(lex_output: LexOutput) -> Result<ParseResult, ParseError> {
    let mut parser = Parser::new(lex_output);
    let unit = parser.parse_compilation_unit();
    let file_id = parser.file_id;
    let diagnostics = parser.finish();
    if diagnostics.iter().any(|diag| diag.severity.is_error()) {
        return Err(ParseError::new(
            "encountered errors while parsing",
            diagnostics,
        ));
    }
    Ok(ParseResult {
        unit,
        file_id,
        diagnostics,
    })
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    index: usize,
    diagnostics: DiagnosticSink,
    file_id: FileId,
}

impl Parser {
    fn new(lex_output: LexOutput) -> Self {
        let LexOutput {
            tokens,
            diagnostics: lex_diagnostics,
            file_id,
        } = lex_output;
        let mut diagnostics = DiagnosticSink::new("PARSE");
        diagnostics.extend(lex_diagnostics);
        Self {
            tokens: tokens
                .into_iter()
                .filter(|token| !token.kind.is_trivia())
                .collect(),
            index: 0,
            diagnostics,
            file_id,
        }
    }

    fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics.into_vec()
    }

    fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let mut unit = CompilationUnit::default();
        while self.peek().is_some() {
            let before = self.index;
            if let Some(decl) = self.parse_type_declaration() {
                unit.types.push(decl);
            }
            if self.index == before {
                // Guarantee forward progress on unrecognised input.
                self.advance();
            }
        }
        unit
    }
}

#[cfg(test)]
mod tests;
