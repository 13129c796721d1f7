//! Executable GraphQL document nodes.
//!
//! Only the executable subset of the language is modelled: operations,
//! fragments and the selections, arguments and values inside them.

use super::span::{Span, Spanned};
use smol_str::SmolStr;
use std::fmt;

/// A spanned GraphQL name.
pub type Name = Spanned<SmolStr>;

/// A parsed executable document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Definitions in source order.
    pub definitions: Vec<Definition>,
    /// Span of the whole document.
    pub span: Span,
}

impl Document {
    /// Iterates over the operation definitions in source order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        })
    }

    /// Iterates over the fragment definitions in source order.
    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Fragment(fragment) => Some(fragment),
            Definition::Operation(_) => None,
        })
    }

    /// Looks up a fragment definition by name.
    pub fn fragment(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments().find(|fragment| fragment.name.node == name)
    }
}

/// A top-level definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

/// Kind of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Resolves an operation keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "query" => Some(Self::Query),
            "mutation" => Some(Self::Mutation),
            "subscription" => Some(Self::Subscription),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

/// An operation, either explicit (`query Name($v: T) { ... }`) or the
/// `{ ... }` shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinition {
    pub kind: OperationKind,
    pub name: Option<Name>,
    pub variables: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

/// `fragment Name on Type { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: Name,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

/// `$name: Type = default @directives`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub span: Span,
}

/// A variable type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(Name),
    List(Box<TypeRef>, Span),
    NonNull(Box<TypeRef>, Span),
}

impl TypeRef {
    /// Span of the whole type reference.
    pub fn span(&self) -> &Span {
        match self {
            TypeRef::Named(name) => &name.span,
            TypeRef::List(_, span) | TypeRef::NonNull(_, span) => span,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name.node),
            TypeRef::List(inner, _) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner, _) => write!(f, "{inner}!"),
        }
    }
}

/// A braces-delimited, non-empty list of selections.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
    pub span: Span,
}

/// A single entry of a selection set.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl Selection {
    /// Span of the selection.
    pub fn span(&self) -> &Span {
        match self {
            Selection::Field(field) => &field.span,
            Selection::FragmentSpread(spread) => &spread.span,
            Selection::InlineFragment(fragment) => &fragment.span,
        }
    }
}

/// `alias: name(arguments) @directives { selections }`
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    pub selection_set: Option<SelectionSet>,
    pub span: Span,
}

impl Field {
    /// Name under which the field appears in the response.
    pub fn response_key(&self) -> &SmolStr {
        self.alias.as_ref().map_or(&self.name.node, |alias| &alias.node)
    }

    /// Returns true when the field opens a nested selection set.
    pub fn is_entity(&self) -> bool {
        self.selection_set.is_some()
    }
}

/// `...Name @directives`
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSpread {
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Span,
}

/// `... on Type @directives { selections }`
#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<Name>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

/// `name: value`
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Name,
    pub value: Value,
    pub span: Span,
}

/// `@name(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

/// An input value. Numeric literals keep their source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(Name),
    Int(Spanned<SmolStr>),
    Float(Spanned<SmolStr>),
    String(Spanned<String>),
    Boolean(Spanned<bool>),
    Null(Span),
    Enum(Name),
    List(Vec<Value>, Span),
    Object(Vec<ObjectField>, Span),
}

impl Value {
    /// Span of the value.
    pub fn span(&self) -> &Span {
        match self {
            Value::Variable(name) | Value::Enum(name) | Value::Int(name) | Value::Float(name) => {
                &name.span
            }
            Value::String(value) => &value.span,
            Value::Boolean(value) => &value.span,
            Value::Null(span) | Value::List(_, span) | Value::Object(_, span) => span,
        }
    }
}

/// `name: value` inside an object value.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub name: Name,
    pub value: Value,
    pub span: Span,
}
