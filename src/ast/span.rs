//! Source spans and spanned nodes.

use std::ops::Range;

/// Byte range in query text.
pub type Span = Range<usize>;

/// A value paired with the span it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    /// The wrapped value.
    pub node: T,
    /// Where the value appears in the query text.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Creates a new spanned value.
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// Maps the inner value while preserving the span.
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            node: f(self.node),
            span: self.span,
        }
    }

    /// Extracts the inner value, discarding the span.
    pub fn into_inner(self) -> T {
        self.node
    }
}

impl<T> AsRef<T> for Spanned<T> {
    fn as_ref(&self) -> &T {
        &self.node
    }
}

/// Merges two spans into one covering both.
pub fn merge_spans(start: &Span, end: &Span) -> Span {
    start.start..end.end.max(start.start)
}
