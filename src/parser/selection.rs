//! Selection-set grammar.
//!
//! ```text
//! selection_set ::= "{" selection+ "}"
//!
//! selection ::=
//!     | alias? name arguments? directives? selection_set?
//!     | "..." fragment_name directives?
//!     | "..." ( "on" name )? directives? selection_set
//!
//! alias ::= name ":"
//! ```
//!
//! An empty selection set is a syntax error.

use super::base::ParseResult;
use super::document::DocumentParser;
use crate::ast::{Field, FragmentSpread, InlineFragment, Selection, SelectionSet, merge_spans};
use crate::lexer::token::TokenKind;

impl DocumentParser<'_> {
    pub(super) fn parse_selection_set(&mut self) -> ParseResult<SelectionSet> {
        let start = self.stream.expect(TokenKind::LBrace)?;
        if self.stream.check(&TokenKind::RBrace) {
            return Err(self
                .stream
                .error_here("Selection set must contain at least one selection"));
        }

        self.enter_nesting()?;
        let mut selections = Vec::new();
        while !self.stream.check(&TokenKind::RBrace) {
            if self.stream.at_eof() {
                return Err(self.stream.error_here("Expected '}', found <EOF>"));
            }
            selections.push(self.parse_selection()?);
        }
        self.leave_nesting();

        let end = self.stream.expect(TokenKind::RBrace)?;
        Ok(SelectionSet {
            selections,
            span: merge_spans(&start, &end),
        })
    }

    fn parse_selection(&mut self) -> ParseResult<Selection> {
        match &self.stream.current().kind {
            TokenKind::Spread => self.parse_fragment_selection(),
            TokenKind::Name(_) => self.parse_field().map(Selection::Field),
            other => Err(self
                .stream
                .error_here(format!("Expected a field or fragment, found {other}"))),
        }
    }

    fn parse_field(&mut self) -> ParseResult<Field> {
        let first = self.stream.expect_name()?;
        let (alias, name) = if self.stream.consume(&TokenKind::Colon) {
            (Some(first), self.stream.expect_name()?)
        } else {
            (None, first)
        };
        let start = alias.as_ref().map_or(&name.span, |alias| &alias.span).clone();

        let arguments = self.parse_arguments(false)?;
        let directives = self.parse_directives(false)?;
        let selection_set = if self.stream.check(&TokenKind::LBrace) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Ok(Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
            span: merge_spans(&start, &self.stream.previous_span()),
        })
    }

    fn parse_fragment_selection(&mut self) -> ParseResult<Selection> {
        let start = self.stream.expect(TokenKind::Spread)?;

        let is_spread = matches!(&self.stream.current().kind, TokenKind::Name(name) if name != "on");
        if is_spread {
            let name = self.parse_fragment_name()?;
            let directives = self.parse_directives(false)?;
            return Ok(Selection::FragmentSpread(FragmentSpread {
                name,
                directives,
                span: merge_spans(&start, &self.stream.previous_span()),
            }));
        }

        let type_condition = if self.stream.check_keyword("on") {
            self.stream.advance();
            Some(self.stream.expect_name()?)
        } else {
            None
        };
        let directives = self.parse_directives(false)?;
        if !self.stream.check(&TokenKind::LBrace) {
            return Err(self.stream.error_here(format!(
                "Expected '{{' after '...', found {}",
                self.stream.current().kind
            )));
        }
        let selection_set = self.parse_selection_set()?;

        Ok(Selection::InlineFragment(InlineFragment {
            type_condition,
            directives,
            span: merge_spans(&start, &selection_set.span),
            selection_set,
        }))
    }
}
