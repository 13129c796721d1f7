//! Shared parser infrastructure for token stream navigation and error handling.
//!
//! All grammar modules go through `TokenStream` for lookahead and matching so
//! that error messages and spans are produced in one place.

use crate::ast::{Name, Span, Spanned};
use crate::diag::{Diag, codes};
use crate::lexer::token::{Token, TokenKind};

/// Common error type for parsing operations.
pub type ParseError = Box<Diag>;

/// Common result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Token stream navigator providing common operations for all parsers.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    /// Creates a new token stream from a token slice.
    ///
    /// The slice must end with an EOF token; [`super::Parser::new`] guarantees
    /// this for every stream it builds.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(TokenKind::Eof)
        ));
        Self { tokens, pos: 0 }
    }

    /// Returns the current token, or the final (EOF) token past the end.
    pub fn current(&self) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    /// Advances to the next token. Does nothing at EOF.
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    /// Checks for a name token with the given text (`query`, `on`, `true`, ...).
    pub fn check_keyword(&self, keyword: &str) -> bool {
        self.current().kind.is_keyword(keyword)
    }

    pub fn at_eof(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    /// Consumes the current token if it matches the given kind.
    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a specific token kind and returns its span.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.check(&kind) {
            let span = self.current().span.clone();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here(format!("Expected {kind}, found {}", self.current().kind)))
        }
    }

    /// Expects a name token and returns it with its span.
    pub fn expect_name(&mut self) -> ParseResult<Name> {
        let token = self.current();
        match &token.kind {
            TokenKind::Name(name) => {
                self.advance();
                Ok(Spanned::new(name.clone(), token.span.clone()))
            }
            other => Err(self.error_here(format!("Expected Name, found {other}"))),
        }
    }

    /// Expects the name token `keyword`.
    pub fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Span> {
        if self.check_keyword(keyword) {
            let span = self.current().span.clone();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here(format!(
                "Expected \"{keyword}\", found {}",
                self.current().kind
            )))
        }
    }

    /// Creates a syntax error at the current token position.
    pub fn error_here(&self, message: impl Into<String>) -> ParseError {
        Box::new(
            Diag::error(message.into())
                .with_label(self.current().span.clone(), "here")
                .with_code(codes::SYNTAX_ERROR),
        )
    }

    /// Returns the span of the previous token (useful after consuming a token).
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span.clone()
        } else {
            self.current().span.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tokens() -> Vec<Token> {
        vec![
            Token::new(TokenKind::LBrace, 0..1),
            Token::new(TokenKind::Name("subject".into()), 2..9),
            Token::new(TokenKind::RBrace, 10..11),
            Token::new(TokenKind::Eof, 11..11),
        ]
    }

    #[test]
    fn token_stream_navigation() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);

        assert_eq!(stream.current().kind, TokenKind::LBrace);

        stream.advance();
        assert!(stream.check_keyword("subject"));
        assert_eq!(stream.previous_span(), 0..1);
    }

    #[test]
    fn advance_stops_at_eof() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);
        for _ in 0..10 {
            stream.advance();
        }
        assert!(stream.at_eof());
        assert_eq!(stream.current().span, 11..11);
    }

    #[test]
    fn expect_name_returns_spanned_text() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);
        assert!(stream.consume(&TokenKind::LBrace));
        let name = stream.expect_name().unwrap();
        assert_eq!(name.node, "subject");
        assert_eq!(name.span, 2..9);
    }

    #[test]
    fn expect_failure_reports_found_token() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);
        let err = stream.expect(TokenKind::LParen).unwrap_err();
        assert_eq!(err.message, "Expected '(', found '{'");
        assert_eq!(err.primary_span(), Some(&(0..1)));
        assert_eq!(err.code.as_deref(), Some(codes::SYNTAX_ERROR));

        let err = stream.expect_name().unwrap_err();
        assert_eq!(err.message, "Expected Name, found '{'");
    }

    #[test]
    fn expect_keyword() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);
        stream.advance();
        assert!(stream.expect_keyword("fragment").is_err());
        assert_eq!(stream.expect_keyword("subject").unwrap(), 2..9);
    }
}
