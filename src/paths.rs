//! Entity path extraction.
//!
//! Walks a parsed document depth-first and produces one [`EntityPath`] per
//! field that opens a selection set. Leaf selections are attached to the
//! innermost open entity path. Arguments are not selections and are skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::ControlFlow;

use smol_str::SmolStr;
use tracing::debug;

use crate::ast::visit::{Visit, walk_operation, walk_selection_set};
use crate::ast::{
    Document, Field, FragmentDefinition, FragmentSpread, OperationDefinition, Span,
};
use crate::diag::{Diag, codes};
use crate::error::QuerySyntaxError;
use crate::parser::{MAX_NESTING_DEPTH, parse_document};

/// Most entity paths a single query may expand to.
pub const MAX_ENTITY_PATHS: usize = 10_000;

/// Most field selections visited while expanding a single query.
pub const MAX_EXPANDED_SELECTIONS: usize = 100_000;

/// One selection-set level of a query.
///
/// `path` is the chain of field names from the query root down to and
/// including `entity_name`; `fields` are the distinct leaf names selected at
/// this level in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPath {
    pub entity_name: SmolStr,
    pub path: Vec<SmolStr>,
    pub fields: Vec<SmolStr>,
    /// Spans of the `path` segments, index for index.
    pub path_spans: Vec<Span>,
    /// Spans of the first occurrence of each name in `fields`.
    pub field_spans: Vec<Span>,
}

impl EntityPath {
    fn open(path: &[(SmolStr, Span)]) -> Self {
        let (names, spans): (Vec<_>, Vec<_>) = path.iter().cloned().unzip();
        let entity_name = path.last().map(|(name, _)| name.clone()).unwrap_or_default();
        Self {
            entity_name,
            path: names,
            fields: Vec::new(),
            path_spans: spans,
            field_spans: Vec::new(),
        }
    }

    /// The root entity name (first path segment).
    pub fn root(&self) -> Option<&SmolStr> {
        self.path.first()
    }

    /// Nesting depth, 1 for a root entity.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Collects entity paths from a document, expanding fragment spreads in place.
///
/// A fragment is expanded at most once per entity path. Expansion is bounded
/// by [`MAX_NESTING_DEPTH`], [`MAX_ENTITY_PATHS`] and
/// [`MAX_EXPANDED_SELECTIONS`].
pub struct PathExtractor<'d> {
    fragments: BTreeMap<&'d str, &'d FragmentDefinition>,
    stack: Vec<(SmolStr, Span)>,
    open: Vec<usize>,
    paths: Vec<EntityPath>,
    seen_fields: Vec<BTreeSet<SmolStr>>,
    active_fragments: Vec<SmolStr>,
    // (open path, fragment); `None` is the operation root.
    expanded: BTreeSet<(Option<usize>, SmolStr)>,
    visited: usize,
    document: &'d Document,
}

impl<'d> PathExtractor<'d> {
    pub fn new(document: &'d Document) -> Self {
        let mut fragments = BTreeMap::new();
        for fragment in document.fragments() {
            // The first definition of a name wins, as with `Document::fragment`.
            fragments.entry(fragment.name.node.as_str()).or_insert(fragment);
        }
        Self {
            fragments,
            stack: Vec::new(),
            open: Vec::new(),
            paths: Vec::new(),
            seen_fields: Vec::new(),
            active_fragments: Vec::new(),
            expanded: BTreeSet::new(),
            visited: 0,
            document,
        }
    }

    /// Extracts all entity paths of every operation in the document.
    ///
    /// Fails when a spread names an unknown fragment, fragments spread each
    /// other in a cycle, or expansion exceeds one of the limits.
    pub fn extract(mut self) -> Result<Vec<EntityPath>, QuerySyntaxError> {
        let document = self.document;
        if let ControlFlow::Break(diag) = self.visit_document(document) {
            return Err(QuerySyntaxError::new(diag));
        }
        debug!(
            paths = self.paths.len(),
            selections = self.visited,
            "extracted entity paths"
        );
        Ok(self.paths)
    }

    fn syntax_error(&self, message: String, span: &Span) -> Diag {
        let diag = Diag::error(message)
            .with_label(span.clone(), "here")
            .with_code(codes::SYNTAX_ERROR);
        if self.active_fragments.is_empty() {
            diag
        } else {
            diag.with_note(format!(
                "reached through fragment {}",
                self.active_fragments.join(" -> ")
            ))
        }
    }

    /// Nesting of the current position once fragments are expanded.
    fn expanded_depth(&self) -> usize {
        self.stack.len() + self.active_fragments.len()
    }

    fn add_field(&mut self, name: &SmolStr, span: &Span) {
        let Some(&index) = self.open.last() else {
            return;
        };
        if self.seen_fields[index].insert(name.clone()) {
            self.paths[index].fields.push(name.clone());
            self.paths[index].field_spans.push(span.clone());
        }
    }
}

impl Visit for PathExtractor<'_> {
    type Break = Diag;

    fn visit_operation(&mut self, operation: &OperationDefinition) -> ControlFlow<Diag> {
        // Root-level expansions are scoped to their operation.
        self.expanded.retain(|(scope, _)| scope.is_some());
        walk_operation(self, operation)
    }

    // Fragments are only reached through the spreads that use them.
    fn visit_fragment_definition(&mut self, _fragment: &FragmentDefinition) -> ControlFlow<Diag> {
        ControlFlow::Continue(())
    }

    fn visit_field(&mut self, field: &Field) -> ControlFlow<Diag> {
        let name = &field.name.node;

        self.visited += 1;
        if self.visited > MAX_EXPANDED_SELECTIONS {
            return ControlFlow::Break(self.syntax_error(
                format!("Query expands to more than {MAX_EXPANDED_SELECTIONS} selections"),
                &field.name.span,
            ));
        }

        let Some(selection_set) = &field.selection_set else {
            if !name.starts_with("__") {
                self.add_field(name, &field.name.span);
            }
            return ControlFlow::Continue(());
        };

        if self.expanded_depth() >= MAX_NESTING_DEPTH {
            return ControlFlow::Break(self.syntax_error(
                format!("Query nesting exceeds the maximum depth of {MAX_NESTING_DEPTH}"),
                &field.name.span,
            ));
        }
        if self.paths.len() >= MAX_ENTITY_PATHS {
            return ControlFlow::Break(self.syntax_error(
                format!("Query expands to more than {MAX_ENTITY_PATHS} entity paths"),
                &field.name.span,
            ));
        }

        self.stack.push((name.clone(), field.name.span.clone()));
        self.paths.push(EntityPath::open(&self.stack));
        self.seen_fields.push(BTreeSet::new());
        self.open.push(self.paths.len() - 1);

        let flow = walk_selection_set(self, selection_set);

        self.open.pop();
        self.stack.pop();
        flow
    }

    fn visit_fragment_spread(&mut self, spread: &FragmentSpread) -> ControlFlow<Diag> {
        let name = &spread.name.node;
        let Some(fragment) = self.fragments.get(name.as_str()).copied() else {
            return ControlFlow::Break(
                self.syntax_error(format!("Unknown fragment \"{name}\""), &spread.name.span),
            );
        };
        if self.active_fragments.contains(name) {
            return ControlFlow::Break(self.syntax_error(
                format!("Fragment \"{name}\" spreads itself"),
                &spread.name.span,
            ));
        }
        if !self
            .expanded
            .insert((self.open.last().copied(), name.clone()))
        {
            return ControlFlow::Continue(());
        }
        if self.expanded_depth() >= MAX_NESTING_DEPTH {
            return ControlFlow::Break(self.syntax_error(
                format!("Query nesting exceeds the maximum depth of {MAX_NESTING_DEPTH}"),
                &spread.name.span,
            ));
        }

        self.active_fragments.push(name.clone());
        let flow = walk_selection_set(self, &fragment.selection_set);
        self.active_fragments.pop();
        flow
    }
}

/// Parses `query` and extracts its entity paths in discovery order.
pub fn parse_query(query: &str) -> Result<Vec<EntityPath>, QuerySyntaxError> {
    let document = parse_document(query)?;
    PathExtractor::new(&document).extract()
}
