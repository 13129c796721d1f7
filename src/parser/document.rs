//! Document-level grammar: operations, fragments and variable definitions.
//!
//! # Grammar Overview
//!
//! ```text
//! document ::= definition+
//!
//! definition ::=
//!     | selection_set
//!     | operation_type name? variable_definitions? directives? selection_set
//!     | "fragment" fragment_name "on" name directives? selection_set
//!
//! operation_type ::= "query" | "mutation" | "subscription"
//!
//! variable_definitions ::= "(" variable_definition+ ")"
//! variable_definition  ::= "$" name ":" type ( "=" const_value )? directives?
//!
//! type ::= name "!"? | "[" type "]" "!"?
//! ```

use super::base::{ParseResult, TokenStream};
use crate::ast::{
    Definition, Document, FragmentDefinition, Name, OperationDefinition, OperationKind, TypeRef,
    VariableDefinition, merge_spans,
};
use crate::lexer::token::TokenKind;

/// Deepest nesting of selection sets and list/object values accepted.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Recursive-descent parser for executable documents.
///
/// The grammar is split across this module, `selection` and `value`; all of
/// them extend this type.
pub struct DocumentParser<'a> {
    pub(super) stream: TokenStream<'a>,
    depth: usize,
}

impl<'a> DocumentParser<'a> {
    pub fn new(stream: TokenStream<'a>) -> Self {
        Self { stream, depth: 0 }
    }

    /// Parses a complete document. Stops at the first error.
    pub fn parse_document(&mut self) -> ParseResult<Document> {
        let start = self.stream.current().span.clone();
        if self.stream.at_eof() {
            return Err(self
                .stream
                .error_here("Expected an operation or fragment definition, found <EOF>"));
        }

        let mut definitions = Vec::new();
        while !self.stream.at_eof() {
            definitions.push(self.parse_definition()?);
        }

        Ok(Document {
            definitions,
            span: merge_spans(&start, &self.stream.previous_span()),
        })
    }

    fn parse_definition(&mut self) -> ParseResult<Definition> {
        let token = self.stream.current();
        match &token.kind {
            TokenKind::LBrace => self.parse_operation().map(Definition::Operation),
            TokenKind::Name(name) if OperationKind::from_keyword(name).is_some() => {
                self.parse_operation().map(Definition::Operation)
            }
            TokenKind::Name(name) if name == "fragment" => {
                self.parse_fragment_definition().map(Definition::Fragment)
            }
            other => Err(self.stream.error_here(format!(
                "Expected an operation or fragment definition, found {other}"
            ))),
        }
    }

    fn parse_operation(&mut self) -> ParseResult<OperationDefinition> {
        let start = self.stream.current().span.clone();

        if self.stream.check(&TokenKind::LBrace) {
            let selection_set = self.parse_selection_set()?;
            return Ok(OperationDefinition {
                kind: OperationKind::Query,
                name: None,
                variables: Vec::new(),
                directives: Vec::new(),
                span: merge_spans(&start, &selection_set.span),
                selection_set,
            });
        }

        let kind = self
            .stream
            .current()
            .kind
            .as_name()
            .and_then(|name| OperationKind::from_keyword(name))
            .ok_or_else(|| self.stream.error_here("Expected an operation type"))?;
        self.stream.advance();

        let name = match self.stream.current().kind {
            TokenKind::Name(_) => Some(self.stream.expect_name()?),
            _ => None,
        };
        let variables = self.parse_variable_definitions()?;
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        Ok(OperationDefinition {
            kind,
            name,
            variables,
            directives,
            span: merge_spans(&start, &selection_set.span),
            selection_set,
        })
    }

    fn parse_fragment_definition(&mut self) -> ParseResult<FragmentDefinition> {
        let start = self.stream.expect_keyword("fragment")?;
        let name = self.parse_fragment_name()?;
        self.stream.expect_keyword("on")?;
        let type_condition = self.stream.expect_name()?;
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        Ok(FragmentDefinition {
            name,
            type_condition,
            directives,
            span: merge_spans(&start, &selection_set.span),
            selection_set,
        })
    }

    /// A fragment name is any name except `on`.
    pub(super) fn parse_fragment_name(&mut self) -> ParseResult<Name> {
        if self.stream.check_keyword("on") {
            return Err(self
                .stream
                .error_here("Expected a fragment name, found reserved word \"on\""));
        }
        self.stream.expect_name()
    }

    fn parse_variable_definitions(&mut self) -> ParseResult<Vec<VariableDefinition>> {
        if !self.stream.consume(&TokenKind::LParen) {
            return Ok(Vec::new());
        }

        let mut variables = Vec::new();
        loop {
            variables.push(self.parse_variable_definition()?);
            if self.stream.consume(&TokenKind::RParen) {
                return Ok(variables);
            }
        }
    }

    fn parse_variable_definition(&mut self) -> ParseResult<VariableDefinition> {
        let start = self.stream.expect(TokenKind::Dollar)?;
        let name = self.stream.expect_name()?;
        self.stream.expect(TokenKind::Colon)?;
        let ty = self.parse_type_ref()?;
        let default_value = if self.stream.consume(&TokenKind::Equals) {
            Some(self.parse_value(true)?)
        } else {
            None
        };
        let directives = self.parse_directives(true)?;

        Ok(VariableDefinition {
            name,
            ty,
            default_value,
            directives,
            span: merge_spans(&start, &self.stream.previous_span()),
        })
    }

    fn parse_type_ref(&mut self) -> ParseResult<TypeRef> {
        let inner = if self.stream.check(&TokenKind::LBracket) {
            let start = self.stream.expect(TokenKind::LBracket)?;
            self.enter_nesting()?;
            let item = self.parse_type_ref()?;
            self.leave_nesting();
            let end = self.stream.expect(TokenKind::RBracket)?;
            TypeRef::List(Box::new(item), merge_spans(&start, &end))
        } else {
            TypeRef::Named(self.stream.expect_name()?)
        };

        if self.stream.check(&TokenKind::Bang) {
            let end = self.stream.expect(TokenKind::Bang)?;
            let span = merge_spans(inner.span(), &end);
            return Ok(TypeRef::NonNull(Box::new(inner), span));
        }
        Ok(inner)
    }

    /// Tracks one more level of nesting, failing past [`MAX_NESTING_DEPTH`].
    pub(super) fn enter_nesting(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.stream.error_here(format!(
                "Query nesting exceeds the maximum depth of {MAX_NESTING_DEPTH}"
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub(super) fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
