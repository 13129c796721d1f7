//! Lexical analysis for GraphQL query text.
//!
//! The token grammar lives in [`token`] and is scanned by `logos`; this module
//! drives the scan, turns scan failures into diagnostics and terminates the
//! stream with an EOF token so the parser never runs off the end.

pub mod token;

use crate::ast::Span;
use crate::diag::{Diag, codes};
use logos::Logos;
use token::{LexError, Token, TokenKind};

/// Result of lexical analysis.
///
/// Contains both the tokens produced and any diagnostics encountered during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens produced, including an EOF token at the end.
    pub tokens: Vec<Token>,
    /// Diagnostics encountered during lexing, in source order.
    pub diagnostics: Vec<Diag>,
}

/// A lexical analyzer for GraphQL query text.
///
/// Scanning continues after errors so every malformed token is reported.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenizes the source text and returns the result.
    pub fn tokenize(self) -> LexerResult {
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();
        let mut scanner = TokenKind::lexer(self.source);

        while let Some(result) = scanner.next() {
            let span = scanner.span();
            match result {
                Ok(kind) => tokens.push(Token::new(kind, span)),
                Err(error) => diagnostics.push(self.lex_error(&error, span)),
            }
        }

        let eof = self.source.len();
        tokens.push(Token::new(TokenKind::Eof, eof..eof));

        LexerResult {
            tokens,
            diagnostics,
        }
    }

    fn lex_error(&self, error: &LexError, span: Span) -> Diag {
        let message = match error {
            LexError::UnexpectedCharacter => {
                let text = self.source.get(span.clone()).unwrap_or_default();
                format!("unexpected character {text:?}")
            }
            other => other.to_string(),
        };
        Diag::error(message)
            .with_label(span, error.to_string())
            .with_code(codes::SYNTAX_ERROR)
    }
}

/// Convenience function to tokenize query text.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}
