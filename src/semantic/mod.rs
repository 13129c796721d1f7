//! Schema-aware validation of queries.
//!
//! Checks every entity path a query selects against a [`SchemaGraph`] and
//! reports unknown entities, unknown relationship hops and unknown leaf
//! fields, each with ranked correction suggestions.
//!
//! # Architecture
//!
//! 1. **Path extraction** - [`parse_query`](crate::parse_query) turns the
//!    query into [`EntityPath`](crate::paths::EntityPath)s
//! 2. **Path resolution** - [`PathValidator`] walks each path from its root
//!    entity through relationships
//! 3. **Leaf checks** - leaves are matched against the terminal entity
//! 4. **Suggestions** - [`Suggester`] ranks candidates with a
//!    [`SimilarityMetric`] and naming-pattern heuristics
//!
//! # Example
//!
//! ```
//! use commons_guard::schema::SchemaGraphBuilder;
//! use commons_guard::semantic::{ErrorType, PathValidator};
//! use serde_json::json;
//!
//! let graph = SchemaGraphBuilder::new()
//!     .build_from_value(&json!({"subject": {"properties": {"gender": {"type": "string"}}}}))
//!     .unwrap();
//!
//! let result = PathValidator::new().validate("{ subject { id gander } }", &graph);
//! assert!(!result.is_valid());
//! assert_eq!(result.errors[0].error_type, ErrorType::UnknownField);
//! assert_eq!(result.errors[0].suggestions, vec!["gender"]);
//! ```
//!
//! [`SchemaGraph`]: crate::schema::SchemaGraph

mod error;
mod similarity;
mod suggest;
mod template;
mod validator;

pub use error::{ErrorType, ValidationError, ValidationResult};
pub use similarity::{LevenshteinRatio, SequenceRatio, SimilarityMetric};
pub use suggest::{CandidateKind, FieldSuggestions, Scored, ScoredCandidate, Suggester};
pub use template::{QueryTemplate, TemplateOptions};
pub use validator::PathValidator;
