//! Normalized entity/relationship graph.
//!
//! A [`SchemaGraph`] is immutable once built and safe to share behind an
//! `Arc` between any number of concurrent validations.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use smol_str::SmolStr;

use super::summary::EntitySummary;

/// How a relationship entered the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipDirection {
    /// Declared by the owning entity's links: a child-of edge toward the target.
    Declared,
    /// Synthesized from another entity's backref: a parent-of edge.
    Inferred,
}

impl fmt::Display for RelationshipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipDirection::Declared => write!(f, "declared"),
            RelationshipDirection::Inferred => write!(f, "inferred"),
        }
    }
}

/// A named, directed edge traversable as a nested selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub name: SmolStr,
    pub target_type: SmolStr,
    /// Reverse traversal name, empty when the edge has none.
    pub backref: SmolStr,
    pub direction: RelationshipDirection,
}

impl Relationship {
    pub fn declared(
        name: impl Into<SmolStr>,
        target_type: impl Into<SmolStr>,
        backref: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            backref: backref.into(),
            direction: RelationshipDirection::Declared,
        }
    }

    pub fn inferred(
        name: impl Into<SmolStr>,
        target_type: impl Into<SmolStr>,
        backref: impl Into<SmolStr>,
    ) -> Self {
        Self {
            direction: RelationshipDirection::Inferred,
            ..Self::declared(name, target_type, backref)
        }
    }

    pub fn has_backref(&self) -> bool {
        !self.backref.is_empty()
    }
}

/// One entity: its scalar fields and outgoing relationships.
///
/// A name never appears in both `fields` and `relationships`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    pub name: SmolStr,
    pub fields: BTreeSet<SmolStr>,
    /// Keyed by the GraphQL field name used to traverse the edge.
    pub relationships: BTreeMap<SmolStr, Relationship>,
    pub summary: EntitySummary,
}

impl EntitySchema {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    /// True when `name` may be selected on this entity, either as a scalar
    /// field or as a relationship.
    pub fn is_selectable(&self, name: &str) -> bool {
        self.has_field(name) || self.relationships.contains_key(name)
    }

    /// Scalar field names followed by relationship names, each in name order.
    pub fn selectable_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.fields.iter().chain(self.relationships.keys())
    }

    /// Relationships of the given direction, in name order.
    pub fn relationships_by_direction(
        &self,
        direction: RelationshipDirection,
    ) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .values()
            .filter(move |relationship| relationship.direction == direction)
    }
}

/// All entities of one schema version, ordered by name for determinism.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SchemaGraph {
    pub entities: BTreeMap<SmolStr, EntitySchema>,
}

impl SchemaGraph {
    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.entities.keys()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity names grouped by category. Entities without a category are
    /// grouped under `"uncategorized"`.
    pub fn entities_by_category(&self) -> BTreeMap<SmolStr, Vec<&SmolStr>> {
        let mut groups: BTreeMap<SmolStr, Vec<&SmolStr>> = BTreeMap::new();
        for (name, entity) in &self.entities {
            let category = entity
                .summary
                .category
                .clone()
                .unwrap_or_else(|| SmolStr::new_static("uncategorized"));
            groups.entry(category).or_default().push(name);
        }
        groups
    }

    /// Total number of relationships, declared and inferred.
    pub fn relationship_count(&self) -> usize {
        self.entities
            .values()
            .map(|entity| entity.relationships.len())
            .sum()
    }

    /// Relationships whose target entity is not part of the graph.
    pub fn dangling_relationships(&self) -> Vec<(&EntitySchema, &Relationship)> {
        self.entities
            .values()
            .flat_map(|entity| {
                entity
                    .relationships
                    .values()
                    .filter(|relationship| !self.contains(&relationship.target_type))
                    .map(move |relationship| (entity, relationship))
            })
            .collect()
    }
}
