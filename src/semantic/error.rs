//! Validation error model.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use smol_str::SmolStr;

use crate::ast::Span;
use crate::diag::{Diag, codes};
use crate::error::QuerySyntaxError;
use crate::paths::EntityPath;

/// Kind of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The query is not valid GraphQL.
    SyntaxError,
    /// A root entity or relationship hop does not exist.
    UnknownEntity,
    /// A leaf selection does not exist on the resolved entity.
    UnknownField,
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::SyntaxError => codes::SYNTAX_ERROR,
            ErrorType::UnknownEntity => codes::UNKNOWN_ENTITY,
            ErrorType::UnknownField => codes::UNKNOWN_FIELD,
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found in a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Entity the error is about: the unresolved root or hop name, or the
    /// resolved entity owning an unknown field.
    pub entity: SmolStr,
    /// The unknown leaf name, empty for entity-level errors.
    pub field: SmolStr,
    pub error_type: ErrorType,
    pub message: String,
    /// Best corrections first. May be empty.
    pub suggestions: Vec<SmolStr>,
    /// Byte range of the offending name in the query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl ValidationError {
    pub fn syntax(error: &QuerySyntaxError) -> Self {
        Self {
            entity: SmolStr::default(),
            field: SmolStr::default(),
            error_type: ErrorType::SyntaxError,
            message: format!("Invalid GraphQL syntax: {}", error.message()),
            suggestions: Vec::new(),
            span: error.span().cloned(),
        }
    }

    /// Converts the error into a diagnostic that can be rendered against the
    /// query text.
    pub fn to_diag(&self) -> Diag {
        let mut diag = Diag::error(self.message.clone()).with_code(self.error_type.as_str());
        if let Some(span) = &self.span {
            let label = match self.error_type {
                ErrorType::SyntaxError => "here",
                ErrorType::UnknownEntity => "unknown entity",
                ErrorType::UnknownField => "unknown field",
            };
            diag = diag.with_label(span.clone(), label);
        }
        if let Some(help) = self.help() {
            diag = diag.with_help(help);
        }
        diag
    }

    /// "did you mean" text listing the suggestions, if there are any.
    pub fn help(&self) -> Option<String> {
        match self.suggestions.as_slice() {
            [] => None,
            [only] => Some(format!("did you mean '{only}'?")),
            many => {
                let quoted: Vec<String> = many.iter().map(|name| format!("'{name}'")).collect();
                Some(format!("did you mean one of {}?", quoted.join(", ")))
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)?;
        if let Some(help) = self.help() {
            write!(f, " ({help})")?;
        }
        Ok(())
    }
}

/// Outcome of validating one query.
///
/// A query is valid exactly when no errors were collected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    extracted_fields: BTreeMap<SmolStr, Vec<SmolStr>>,
}

impl ValidationResult {
    pub fn new(errors: Vec<ValidationError>, paths: &[EntityPath]) -> Self {
        let mut extracted_fields: BTreeMap<SmolStr, Vec<SmolStr>> = BTreeMap::new();
        for path in paths {
            let fields = extracted_fields.entry(path.entity_name.clone()).or_default();
            for field in &path.fields {
                if !fields.contains(field) {
                    fields.push(field.clone());
                }
            }
        }
        Self {
            errors,
            extracted_fields,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Leaf selections per entity name, distinct and in query order.
    pub fn extracted_fields(&self) -> &BTreeMap<SmolStr, Vec<SmolStr>> {
        &self.extracted_fields
    }

    pub fn errors_of(&self, error_type: ErrorType) -> impl Iterator<Item = &ValidationError> {
        self.errors
            .iter()
            .filter(move |error| error.error_type == error_type)
    }

    /// One line per error.
    pub fn error_summary(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn to_diags(&self) -> Vec<Diag> {
        self.errors.iter().map(ValidationError::to_diag).collect()
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 3)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("extracted_fields", &self.extracted_fields)?;
        state.end()
    }
}
