//! Parser for executable GraphQL documents.
//!
//! The parser consumes the token stream produced by the lexer and builds a
//! spanned [`Document`]. Parsing is fail-fast: the first lexer or parser
//! diagnostic, whichever appears first in the query, becomes the
//! [`QuerySyntaxError`].

mod base;
mod document;
mod selection;
mod value;

pub use document::MAX_NESTING_DEPTH;
use document::DocumentParser;

use crate::ast::Document;
use crate::diag::Diag;
use crate::error::QuerySyntaxError;
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::{LexerResult, tokenize};
use base::TokenStream;

/// GraphQL document parser.
pub struct Parser {
    tokens: Vec<Token>,
    diagnostics: Vec<Diag>,
}

impl Parser {
    /// Creates a parser from a token stream, appending EOF if it is missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let eof_pos = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::new(TokenKind::Eof, eof_pos..eof_pos));
        }

        Self {
            tokens,
            diagnostics: Vec::new(),
        }
    }

    /// Merges lexer diagnostics so they take part in error selection.
    pub fn with_lexer_diagnostics(mut self, lex_diags: Vec<Diag>) -> Self {
        self.diagnostics.extend(lex_diags);
        self
    }

    /// Parses the token stream into a document.
    pub fn parse(self) -> Result<Document, QuerySyntaxError> {
        let mut parser = DocumentParser::new(TokenStream::new(&self.tokens));
        let parsed = parser.parse_document();

        let mut diagnostics = self.diagnostics;
        let document = match parsed {
            Ok(document) => Some(document),
            Err(diag) => {
                diagnostics.push(*diag);
                None
            }
        };

        let earliest = diagnostics
            .into_iter()
            .enumerate()
            .min_by_key(|(index, diag)| {
                (
                    diag.primary_span().map_or(usize::MAX, |span| span.start),
                    *index,
                )
            })
            .map(|(_, diag)| diag);

        match (earliest, document) {
            (Some(diag), _) => Err(QuerySyntaxError::new(diag)),
            (None, Some(document)) => Ok(document),
            (None, None) => Err(QuerySyntaxError::new(Diag::error("Failed to parse query"))),
        }
    }
}

/// Parses query text into a document.
pub fn parse_document(source: &str) -> Result<Document, QuerySyntaxError> {
    let LexerResult {
        tokens,
        diagnostics,
    } = tokenize(source);
    Parser::new(tokens).with_lexer_diagnostics(diagnostics).parse()
}
