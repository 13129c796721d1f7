//! Error types returned by the fallible entry points of the crate.
//!
//! Validation itself never fails: unknown names and syntax problems are
//! reported inside a `ValidationResult`. These types cover the surfaces that
//! can: building a graph from a raw document, parsing a query on its own,
//! cache refreshes and configuration.

use crate::ast::Span;
use crate::diag::{Diag, convert_diag_to_report};
use miette::Report;
use smol_str::SmolStr;
use thiserror::Error;

/// Boxed error produced by a schema source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The raw schema document cannot establish any entity.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The text is not JSON at all.
    #[error("Schema document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top level is valid JSON but not an object keyed by entity name.
    #[error("Schema document must be an object keyed by entity name, found {found}")]
    NotAnObject { found: &'static str },
}

impl SchemaError {
    pub(crate) fn not_an_object(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        };
        Self::NotAnObject { found }
    }
}

/// The query text is not a syntactically valid GraphQL document.
///
/// Carries the first lexer or parser diagnostic; render it against the query
/// with [`QuerySyntaxError::to_report`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .diag.message)]
pub struct QuerySyntaxError {
    diag: Diag,
}

impl QuerySyntaxError {
    pub fn new(diag: Diag) -> Self {
        Self { diag }
    }

    pub fn message(&self) -> &str {
        &self.diag.message
    }

    /// Where in the query the problem was detected.
    pub fn span(&self) -> Option<&Span> {
        self.diag.primary_span()
    }

    pub fn diag(&self) -> &Diag {
        &self.diag
    }

    /// Renders the error with a snippet of the query it came from.
    pub fn to_report(&self, query: &str) -> Report {
        convert_diag_to_report(&self.diag, query)
    }
}

impl From<Box<Diag>> for QuerySyntaxError {
    fn from(diag: Box<Diag>) -> Self {
        Self::new(*diag)
    }
}

/// A cache refresh failed; the previous entry (if any) is left untouched.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to fetch schema '{key}': {source}")]
    Fetch {
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to build schema '{key}': {source}")]
    Build {
        key: String,
        #[source]
        source: SchemaError,
    },
}

impl CacheError {
    /// Key of the cache entry whose refresh failed.
    pub fn key(&self) -> &str {
        match self {
            CacheError::Fetch { key, .. } | CacheError::Build { key, .. } => key,
        }
    }
}

/// A query template was requested for an entity the schema does not have.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Entity '{entity}' does not exist")]
    UnknownEntity {
        entity: SmolStr,
        suggestions: Vec<SmolStr>,
    },
}

/// Invalid configuration value or document.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("Configuration error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn out_of_range(
        field: &'static str,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}
