//! Common test utilities
//!
//! Shared fixtures and assertion helpers for the integration tests.
//!
//! # Fixtures
//! - [`commons_schema`] - Raw schema document of a small data commons
//! - [`commons_graph`] - The graph built from [`commons_schema`]
//! - [`scenario_schema`] - The two-entity subject/study schema
//!
//! # Validation Helpers
//! - [`assert_valid`] - Assert that a query validates without errors
//! - [`single_error`] - Validate and return the only error

#![allow(dead_code)]

use commons_guard::semantic::{ValidationError, ValidationResult};
use commons_guard::{SchemaGraph, SchemaGraphBuilder, validate_query};
use serde_json::{Value, json};

pub const COMMONS_SCHEMA: &str = include_str!("../fixtures/commons_schema.json");

pub fn commons_schema() -> Value {
    serde_json::from_str(COMMONS_SCHEMA).expect("fixture is valid JSON")
}

pub fn commons_graph() -> SchemaGraph {
    SchemaGraphBuilder::new()
        .build_from_str(COMMONS_SCHEMA)
        .expect("fixture is an object")
}

/// `subject` links to `study`; `subject.gender` is an enum.
pub fn scenario_schema() -> Value {
    json!({
        "subject": {
            "properties": {"gender": {"enum": ["Male", "Female"]}},
            "links": [{"name": "studies", "target_type": "study", "backref": "subjects"}]
        },
        "study": {"properties": {}, "links": []}
    })
}

pub fn scenario_graph() -> SchemaGraph {
    SchemaGraphBuilder::new()
        .build_from_value(&scenario_schema())
        .expect("fixture is an object")
}

/// Format validation errors for display in assertion messages.
pub fn format_errors(result: &ValidationResult) -> String {
    result
        .errors
        .iter()
        .map(|error| format!("{error:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that `query` validates against `graph` without errors.
///
/// # Panics
/// Panics with the collected errors when validation fails.
pub fn assert_valid(query: &str, graph: &SchemaGraph) {
    let result = validate_query(query, graph);
    assert!(
        result.is_valid(),
        "expected `{query}` to validate, got:\n{}",
        format_errors(&result)
    );
}

/// Validate `query` and return its only error.
///
/// # Panics
/// Panics unless validation produced exactly one error.
pub fn single_error(query: &str, graph: &SchemaGraph) -> ValidationError {
    let result = validate_query(query, graph);
    assert_eq!(
        result.errors.len(),
        1,
        "expected one error for `{query}`, got:\n{}",
        format_errors(&result)
    );
    result.errors.into_iter().next().expect("one error")
}
