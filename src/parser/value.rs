//! Arguments, directives and input values.
//!
//! ```text
//! arguments  ::= "(" argument+ ")"
//! argument   ::= name ":" value
//! directives ::= ( "@" name arguments? )*
//!
//! value ::= variable | int | float | string | block_string
//!         | "true" | "false" | "null" | enum_value
//!         | "[" value* "]" | "{" ( name ":" value )* "}"
//! ```
//!
//! Constant contexts (variable defaults and their directives) reject variables.

use super::base::ParseResult;
use super::document::DocumentParser;
use crate::ast::{Argument, Directive, ObjectField, Spanned, Value, merge_spans};
use crate::lexer::token::TokenKind;

impl DocumentParser<'_> {
    pub(super) fn parse_arguments(&mut self, const_only: bool) -> ParseResult<Vec<Argument>> {
        if !self.stream.consume(&TokenKind::LParen) {
            return Ok(Vec::new());
        }

        let mut arguments = Vec::new();
        loop {
            let name = self.stream.expect_name()?;
            self.stream.expect(TokenKind::Colon)?;
            let value = self.parse_value(const_only)?;
            arguments.push(Argument {
                span: merge_spans(&name.span, value.span()),
                name,
                value,
            });
            if self.stream.consume(&TokenKind::RParen) {
                return Ok(arguments);
            }
        }
    }

    pub(super) fn parse_directives(&mut self, const_only: bool) -> ParseResult<Vec<Directive>> {
        let mut directives = Vec::new();
        while self.stream.check(&TokenKind::At) {
            let start = self.stream.expect(TokenKind::At)?;
            let name = self.stream.expect_name()?;
            let arguments = self.parse_arguments(const_only)?;
            directives.push(Directive {
                name,
                arguments,
                span: merge_spans(&start, &self.stream.previous_span()),
            });
        }
        Ok(directives)
    }

    pub(super) fn parse_value(&mut self, const_only: bool) -> ParseResult<Value> {
        let token = self.stream.current();
        let span = token.span.clone();

        let value = match &token.kind {
            TokenKind::Dollar => {
                if const_only {
                    return Err(self
                        .stream
                        .error_here("Variables are not allowed in constant values"));
                }
                self.stream.advance();
                let name = self.stream.expect_name()?;
                return Ok(Value::Variable(Spanned::new(
                    name.node,
                    merge_spans(&span, &name.span),
                )));
            }
            TokenKind::Int(text) => Value::Int(Spanned::new(text.clone(), span)),
            TokenKind::Float(text) => Value::Float(Spanned::new(text.clone(), span)),
            TokenKind::String(text) | TokenKind::BlockString(text) => {
                Value::String(Spanned::new(text.clone(), span))
            }
            TokenKind::Name(name) => match name.as_str() {
                "true" => Value::Boolean(Spanned::new(true, span)),
                "false" => Value::Boolean(Spanned::new(false, span)),
                "null" => Value::Null(span),
                _ => Value::Enum(Spanned::new(name.clone(), span)),
            },
            TokenKind::LBracket => return self.parse_list(const_only),
            TokenKind::LBrace => return self.parse_object(const_only),
            other => {
                return Err(self
                    .stream
                    .error_here(format!("Expected a value, found {other}")));
            }
        };

        self.stream.advance();
        Ok(value)
    }

    fn parse_list(&mut self, const_only: bool) -> ParseResult<Value> {
        let start = self.stream.expect(TokenKind::LBracket)?;
        self.enter_nesting()?;
        let mut items = Vec::new();
        while !self.stream.check(&TokenKind::RBracket) {
            items.push(self.parse_value(const_only)?);
        }
        self.leave_nesting();
        let end = self.stream.expect(TokenKind::RBracket)?;
        Ok(Value::List(items, merge_spans(&start, &end)))
    }

    fn parse_object(&mut self, const_only: bool) -> ParseResult<Value> {
        let start = self.stream.expect(TokenKind::LBrace)?;
        self.enter_nesting()?;
        let mut fields = Vec::new();
        while !self.stream.check(&TokenKind::RBrace) {
            let name = self.stream.expect_name()?;
            self.stream.expect(TokenKind::Colon)?;
            let value = self.parse_value(const_only)?;
            fields.push(ObjectField {
                span: merge_spans(&name.span, value.span()),
                name,
                value,
            });
        }
        self.leave_nesting();
        let end = self.stream.expect(TokenKind::RBrace)?;
        Ok(Value::Object(fields, merge_spans(&start, &end)))
    }
}
