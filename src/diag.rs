//! Diagnostic model shared by syntax errors and schema validation errors.
//!
//! Diagnostics are plain data until they are rendered; rendering goes through
//! miette so callers get source snippets with labeled spans and help text.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::fmt;

/// Diagnostic codes attached by this crate.
pub mod codes {
    /// The query could not be tokenized or parsed.
    pub const SYNTAX_ERROR: &str = "syntax_error";
    /// A root entity or relationship hop is not present in the schema.
    pub const UNKNOWN_ENTITY: &str = "unknown_entity";
    /// A leaf selection is not present on the resolved entity.
    pub const UNKNOWN_FIELD: &str = "unknown_field";
}

/// A span within the query text together with its explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    /// Byte range in the query text.
    pub span: Span,
    /// Text rendered next to the span.
    pub message: String,
}

impl DiagLabel {
    /// Creates a label.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A structured error diagnostic. Every diagnostic rejects the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    /// The main diagnostic message.
    pub message: String,
    /// Labeled spans pointing into the query. The first one is primary.
    pub labels: Vec<DiagLabel>,
    /// Optional remediation text, typically "did you mean" suggestions.
    pub help: Option<String>,
    /// Additional context, such as the fragments an error was reached through.
    pub notes: Vec<String>,
    /// Optional diagnostic code, one of [`codes`].
    pub code: Option<String>,
}

impl Diag {
    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            labels: Vec::new(),
            help: None,
            notes: Vec::new(),
            code: None,
        }
    }

    /// Adds a label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::new(span, message));
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Returns the span of the primary label, if any.
    pub fn primary_span(&self) -> Option<&Span> {
        self.labels.first().map(|label| &label.span)
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Clamps a span to the bounds of `source`.
fn clamp_span(span: &Span, source: &str) -> Span {
    let len = source.len();
    let start = span.start.min(len);
    let end = span.end.min(len).max(start);
    start..end
}

/// Renders diagnostics against the query text they refer to.
pub fn convert_diagnostics_to_reports(diagnostics: &[Diag], source: &str) -> Vec<Report> {
    diagnostics
        .iter()
        .map(|diag| convert_diag_to_report(diag, source))
        .collect()
}

/// Renders a single diagnostic as a miette report with source context.
///
/// Spans outside of `source` are clamped rather than rejected.
pub fn convert_diag_to_report(diag: &Diag, source: &str) -> Report {
    Report::new(build_diagnostic(diag, source)).with_source_code(source.to_string())
}

fn build_diagnostic(diag: &Diag, source: &str) -> BuiltDiagnostic {
    let labels = diag
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let span = clamp_span(&label.span, source);
            let offset_len = (span.start, span.end - span.start);
            if index == 0 {
                LabeledSpan::new_primary_with_span(Some(label.message.clone()), offset_len)
            } else {
                LabeledSpan::new_with_span(Some(label.message.clone()), offset_len)
            }
        })
        .collect();

    BuiltDiagnostic {
        message: diag.message.clone(),
        code: diag.code.clone(),
        help: diag.help.clone(),
        labels,
        notes: diag.notes.iter().cloned().map(NoteDiagnostic).collect(),
    }
}

#[derive(Debug)]
struct BuiltDiagnostic {
    message: String,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    notes: Vec<NoteDiagnostic>,
}

#[derive(Debug)]
struct NoteDiagnostic(String);

impl fmt::Display for NoteDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BuiltDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuiltDiagnostic {}
impl std::error::Error for NoteDiagnostic {}

impl Diagnostic for BuiltDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.notes.is_empty() {
            None
        } else {
            Some(Box::new(self.notes.iter().map(|note| note as &dyn Diagnostic)))
        }
    }
}

impl Diagnostic for NoteDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Advice)
    }
}
