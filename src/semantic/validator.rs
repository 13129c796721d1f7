//! Path-aware validation of queries against a schema graph.

use std::collections::BTreeSet;

use smol_str::SmolStr;
use tracing::debug;

use super::error::{ErrorType, ValidationError, ValidationResult};
use super::similarity::{SequenceRatio, SimilarityMetric};
use super::suggest::Suggester;
use crate::config::GuardConfig;
use crate::paths::{EntityPath, parse_query};
use crate::schema::{EntitySchema, SchemaGraph};

/// Validates every entity path of a query, collecting all errors.
///
/// For each path the root must be an entity of the graph and every further
/// segment a relationship of the entity resolved so far. The leaves of a path
/// that resolves are checked against the fields and relationship names of its
/// terminal entity. An unresolvable hop is reported once even when several
/// paths pass through it.
#[derive(Debug, Clone)]
pub struct PathValidator<M = SequenceRatio> {
    suggester: Suggester<M>,
}

impl Default for PathValidator {
    fn default() -> Self {
        Self::with_suggester(Suggester::default())
    }
}

impl PathValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::with_suggester(Suggester::from_config(config))
    }
}

impl<M: SimilarityMetric> PathValidator<M> {
    pub fn with_suggester(suggester: Suggester<M>) -> Self {
        Self { suggester }
    }

    pub fn suggester(&self) -> &Suggester<M> {
        &self.suggester
    }

    /// Validates a query. Never fails: a query that does not parse yields a
    /// single syntax error.
    pub fn validate(&self, query: &str, graph: &SchemaGraph) -> ValidationResult {
        match parse_query(query) {
            Ok(paths) => self.validate_paths(&paths, graph),
            Err(error) => {
                debug!(error = %error, "query failed to parse");
                ValidationResult::new(vec![ValidationError::syntax(&error)], &[])
            }
        }
    }

    /// Validates already extracted paths. Errors appear in path order, then
    /// field order.
    pub fn validate_paths(&self, paths: &[EntityPath], graph: &SchemaGraph) -> ValidationResult {
        let mut errors = Vec::new();
        let mut failed_prefixes: BTreeSet<&[SmolStr]> = BTreeSet::new();

        for path in paths {
            if failed_prefixes
                .iter()
                .any(|prefix| path.path.starts_with(prefix))
            {
                continue;
            }
            match self.resolve(path, graph) {
                Ok(entity) => self.check_fields(path, entity, &mut errors),
                Err((failed_at, error)) => {
                    failed_prefixes.insert(&path.path[..=failed_at]);
                    errors.push(error);
                }
            }
        }

        debug!(
            paths = paths.len(),
            errors = errors.len(),
            "validated query paths"
        );
        ValidationResult::new(errors, paths)
    }

    /// Walks `path` through the graph, returning the terminal entity or the
    /// index of the first unresolvable segment with its error.
    fn resolve<'g>(
        &self,
        path: &EntityPath,
        graph: &'g SchemaGraph,
    ) -> Result<&'g EntitySchema, (usize, ValidationError)> {
        let Some(root) = path.root() else {
            return Err((0, self.unknown_root(path, graph, &SmolStr::default())));
        };
        let mut current = graph
            .entity(root)
            .ok_or_else(|| (0, self.unknown_root(path, graph, root)))?;

        for (index, segment) in path.path.iter().enumerate().skip(1) {
            let span = path.path_spans.get(index).cloned();

            let Some(relationship) = current.relationship(segment) else {
                return Err((
                    index,
                    ValidationError {
                        entity: segment.clone(),
                        field: SmolStr::default(),
                        error_type: ErrorType::UnknownEntity,
                        message: format!(
                            "Relationship '{segment}' does not exist in entity '{}'",
                            current.name
                        ),
                        suggestions: self.suggester.suggest(segment, current.relationships.keys()),
                        span,
                    },
                ));
            };

            current = graph.entity(&relationship.target_type).ok_or_else(|| {
                (
                    index,
                    ValidationError {
                        entity: segment.clone(),
                        field: SmolStr::default(),
                        error_type: ErrorType::UnknownEntity,
                        message: format!(
                            "Target entity '{}' for relationship '{segment}' does not exist",
                            relationship.target_type
                        ),
                        suggestions: Vec::new(),
                        span,
                    },
                )
            })?;
        }

        Ok(current)
    }

    fn unknown_root(&self, path: &EntityPath, graph: &SchemaGraph, root: &SmolStr) -> ValidationError {
        ValidationError {
            entity: root.clone(),
            field: SmolStr::default(),
            error_type: ErrorType::UnknownEntity,
            message: format!("Root entity '{root}' does not exist"),
            suggestions: self.suggester.suggest(root, graph.entity_names()),
            span: path.path_spans.first().cloned(),
        }
    }

    fn check_fields(&self, path: &EntityPath, entity: &EntitySchema, errors: &mut Vec<ValidationError>) {
        for (index, field) in path.fields.iter().enumerate() {
            if entity.is_selectable(field) {
                continue;
            }
            errors.push(ValidationError {
                entity: entity.name.clone(),
                field: field.clone(),
                error_type: ErrorType::UnknownField,
                message: format!("Field '{field}' does not exist in entity '{}'", entity.name),
                suggestions: self.field_suggestions(field, entity),
                span: path.field_spans.get(index).cloned(),
            });
        }
    }

    /// Similarity suggestions followed by pattern suggestions not already
    /// listed.
    fn field_suggestions(&self, field: &str, entity: &EntitySchema) -> Vec<SmolStr> {
        let mut suggestions = self.suggester.suggest(field, entity.selectable_names());
        for name in self.suggester.pattern_suggestions(field, entity.selectable_names()) {
            if !suggestions.contains(&name) {
                suggestions.push(name);
            }
        }
        suggestions
    }
}
