//! Immutable document visitor.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, so an
//! implementation overrides only the nodes it cares about and calls the walker
//! to keep descending. Returning `ControlFlow::Break` stops the traversal.

use std::ops::ControlFlow;

use super::document::{
    Argument, Definition, Directive, Document, Field, FragmentDefinition, FragmentSpread,
    InlineFragment, OperationDefinition, Selection, SelectionSet, Value, VariableDefinition,
};

/// Shared type alias for visitor traversal methods.
pub type VisitResult<B> = ControlFlow<B>;

macro_rules! try_visit {
    ($expr:expr) => {
        match $expr {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(b) => return ControlFlow::Break(b),
        }
    };
}

pub trait Visit {
    /// Early-exit payload produced when traversal stops.
    type Break;

    fn visit_document(&mut self, document: &Document) -> VisitResult<Self::Break> {
        walk_document(self, document)
    }

    fn visit_definition(&mut self, definition: &Definition) -> VisitResult<Self::Break> {
        walk_definition(self, definition)
    }

    fn visit_operation(&mut self, operation: &OperationDefinition) -> VisitResult<Self::Break> {
        walk_operation(self, operation)
    }

    fn visit_fragment_definition(
        &mut self,
        fragment: &FragmentDefinition,
    ) -> VisitResult<Self::Break> {
        walk_fragment_definition(self, fragment)
    }

    fn visit_variable_definition(
        &mut self,
        variable: &VariableDefinition,
    ) -> VisitResult<Self::Break> {
        walk_variable_definition(self, variable)
    }

    fn visit_selection_set(&mut self, selection_set: &SelectionSet) -> VisitResult<Self::Break> {
        walk_selection_set(self, selection_set)
    }

    fn visit_selection(&mut self, selection: &Selection) -> VisitResult<Self::Break> {
        walk_selection(self, selection)
    }

    fn visit_field(&mut self, field: &Field) -> VisitResult<Self::Break> {
        walk_field(self, field)
    }

    fn visit_fragment_spread(&mut self, _spread: &FragmentSpread) -> VisitResult<Self::Break> {
        ControlFlow::Continue(())
    }

    fn visit_inline_fragment(&mut self, fragment: &InlineFragment) -> VisitResult<Self::Break> {
        walk_inline_fragment(self, fragment)
    }

    fn visit_directive(&mut self, directive: &Directive) -> VisitResult<Self::Break> {
        walk_directive(self, directive)
    }

    fn visit_argument(&mut self, argument: &Argument) -> VisitResult<Self::Break> {
        walk_argument(self, argument)
    }

    fn visit_value(&mut self, value: &Value) -> VisitResult<Self::Break> {
        walk_value(self, value)
    }
}

pub fn walk_document<V: Visit + ?Sized>(
    visitor: &mut V,
    document: &Document,
) -> VisitResult<V::Break> {
    for definition in &document.definitions {
        try_visit!(visitor.visit_definition(definition));
    }
    ControlFlow::Continue(())
}

pub fn walk_definition<V: Visit + ?Sized>(
    visitor: &mut V,
    definition: &Definition,
) -> VisitResult<V::Break> {
    match definition {
        Definition::Operation(operation) => visitor.visit_operation(operation),
        Definition::Fragment(fragment) => visitor.visit_fragment_definition(fragment),
    }
}

pub fn walk_operation<V: Visit + ?Sized>(
    visitor: &mut V,
    operation: &OperationDefinition,
) -> VisitResult<V::Break> {
    for variable in &operation.variables {
        try_visit!(visitor.visit_variable_definition(variable));
    }
    for directive in &operation.directives {
        try_visit!(visitor.visit_directive(directive));
    }
    visitor.visit_selection_set(&operation.selection_set)
}

pub fn walk_fragment_definition<V: Visit + ?Sized>(
    visitor: &mut V,
    fragment: &FragmentDefinition,
) -> VisitResult<V::Break> {
    for directive in &fragment.directives {
        try_visit!(visitor.visit_directive(directive));
    }
    visitor.visit_selection_set(&fragment.selection_set)
}

pub fn walk_variable_definition<V: Visit + ?Sized>(
    visitor: &mut V,
    variable: &VariableDefinition,
) -> VisitResult<V::Break> {
    if let Some(default_value) = &variable.default_value {
        try_visit!(visitor.visit_value(default_value));
    }
    for directive in &variable.directives {
        try_visit!(visitor.visit_directive(directive));
    }
    ControlFlow::Continue(())
}

pub fn walk_selection_set<V: Visit + ?Sized>(
    visitor: &mut V,
    selection_set: &SelectionSet,
) -> VisitResult<V::Break> {
    for selection in &selection_set.selections {
        try_visit!(visitor.visit_selection(selection));
    }
    ControlFlow::Continue(())
}

pub fn walk_selection<V: Visit + ?Sized>(
    visitor: &mut V,
    selection: &Selection,
) -> VisitResult<V::Break> {
    match selection {
        Selection::Field(field) => visitor.visit_field(field),
        Selection::FragmentSpread(spread) => visitor.visit_fragment_spread(spread),
        Selection::InlineFragment(fragment) => visitor.visit_inline_fragment(fragment),
    }
}

pub fn walk_field<V: Visit + ?Sized>(visitor: &mut V, field: &Field) -> VisitResult<V::Break> {
    for argument in &field.arguments {
        try_visit!(visitor.visit_argument(argument));
    }
    for directive in &field.directives {
        try_visit!(visitor.visit_directive(directive));
    }
    match &field.selection_set {
        Some(selection_set) => visitor.visit_selection_set(selection_set),
        None => ControlFlow::Continue(()),
    }
}

pub fn walk_inline_fragment<V: Visit + ?Sized>(
    visitor: &mut V,
    fragment: &InlineFragment,
) -> VisitResult<V::Break> {
    for directive in &fragment.directives {
        try_visit!(visitor.visit_directive(directive));
    }
    visitor.visit_selection_set(&fragment.selection_set)
}

pub fn walk_directive<V: Visit + ?Sized>(
    visitor: &mut V,
    directive: &Directive,
) -> VisitResult<V::Break> {
    for argument in &directive.arguments {
        try_visit!(visitor.visit_argument(argument));
    }
    ControlFlow::Continue(())
}

pub fn walk_argument<V: Visit + ?Sized>(
    visitor: &mut V,
    argument: &Argument,
) -> VisitResult<V::Break> {
    visitor.visit_value(&argument.value)
}

pub fn walk_value<V: Visit + ?Sized>(visitor: &mut V, value: &Value) -> VisitResult<V::Break> {
    match value {
        Value::List(items, _) => {
            for item in items {
                try_visit!(visitor.visit_value(item));
            }
        }
        Value::Object(fields, _) => {
            for field in fields {
                try_visit!(visitor.visit_value(&field.value));
            }
        }
        _ => {}
    }
    ControlFlow::Continue(())
}
