//! Schema-graph extraction and GraphQL query validation for data-commons APIs.
//!
//! Queries written by an agent are checked against the live schema before
//! they are executed: every root entity, relationship hop and leaf field must
//! exist, and every unknown name comes back with ranked corrections.
//!
//! # Example
//!
//! ```
//! use commons_guard::{SchemaGraphBuilder, validate_query};
//! use serde_json::json;
//!
//! let graph = SchemaGraphBuilder::new()
//!     .build_from_value(&json!({
//!         "subject": {
//!             "properties": {"gender": {"enum": ["Male", "Female"]}},
//!             "links": [{"name": "studies", "target_type": "study", "backref": "subjects"}]
//!         },
//!         "study": {"properties": {}, "links": []}
//!     }))
//!     .unwrap();
//!
//! // Backrefs are traversable even though only `subject -> study` is declared.
//! assert!(validate_query("{ study { subjects { gender } } }", &graph).is_valid());
//!
//! let result = validate_query("{ subject { id gander } }", &graph);
//! assert_eq!(result.errors.len(), 1);
//! assert_eq!(result.errors[0].field, "gander");
//! assert!(result.errors[0].suggestions.iter().any(|s| s == "gender"));
//! ```

pub mod ast;
pub mod cache;
pub mod config;
pub mod diag;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod paths;
pub mod schema;
pub mod semantic;

// Re-export syntax span primitives.
pub use ast::{Document, Span, Spanned};

// Re-export diagnostics and errors.
pub use diag::{Diag, DiagLabel, convert_diag_to_report};
pub use error::{CacheError, ConfigError, QuerySyntaxError, SchemaError, TemplateError};

// Re-export lexing and parsing entry points.
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};
pub use parser::parse_document;
pub use paths::{EntityPath, parse_query};

// Re-export the schema and validation surface.
pub use cache::{CacheConfig, SchemaCache, SchemaSource};
pub use config::GuardConfig;
pub use schema::{EntitySchema, Relationship, SchemaGraph, SchemaGraphBuilder};
pub use semantic::{
    ErrorType, PathValidator, QueryTemplate, Suggester, TemplateOptions, ValidationError,
    ValidationResult,
};

/// Validates `query` against `graph` with default suggestion settings.
pub fn validate_query(query: &str, graph: &SchemaGraph) -> ValidationResult {
    PathValidator::new().validate(query, graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_accessible() {
        let _span: Span = 0..5;
        let _spanned = Spanned::new(42, 0..5);

        let result = validate_query("{ anything { id } }", &SchemaGraph::default());
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].error_type, ErrorType::UnknownEntity);
    }
}
