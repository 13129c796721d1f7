//! Spanned syntax tree for executable GraphQL documents.

pub mod document;
mod span;
pub mod visit;

pub use document::{
    Argument, Definition, Directive, Document, Field, FragmentDefinition, FragmentSpread,
    InlineFragment, Name, ObjectField, OperationDefinition, OperationKind, Selection,
    SelectionSet, TypeRef, Value, VariableDefinition,
};
pub use span::{Span, Spanned, merge_spans};
pub use visit::{Visit, VisitResult};
