//! Builds a [`SchemaGraph`] from a raw schema.
//!
//! Two passes: the first gives every entity its scalar fields and declared
//! relationships, the second adds an inferred reverse relationship on the
//! target for every declared relationship that carries a backref.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use smol_str::SmolStr;
use tracing::{debug, info, warn};

use super::graph::{EntitySchema, Relationship, RelationshipDirection, SchemaGraph};
use super::raw::{RawEntity, RawSchema};
use super::summary::EntitySummary;
use crate::config::GuardConfig;
use crate::error::SchemaError;

/// Fields every entity exposes regardless of its properties.
pub const SYSTEM_FIELDS: [&str; 3] = ["id", "submitter_id", "type"];

/// Additional system fields exposed when datetime system fields are enabled.
pub const DATETIME_SYSTEM_FIELDS: [&str; 2] = ["created_datetime", "updated_datetime"];

/// Converts raw schemas into graphs.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraphBuilder {
    datetime_system_fields: bool,
}

impl SchemaGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new().with_datetime_system_fields(config.datetime_system_fields)
    }

    /// Also adds `created_datetime` and `updated_datetime` to every entity.
    pub fn with_datetime_system_fields(mut self, enabled: bool) -> Self {
        self.datetime_system_fields = enabled;
        self
    }

    /// System fields added to every entity.
    pub fn system_fields(&self) -> impl Iterator<Item = &'static str> {
        let datetime: &[&'static str] = if self.datetime_system_fields {
            &DATETIME_SYSTEM_FIELDS
        } else {
            &[]
        };
        SYSTEM_FIELDS.iter().chain(datetime).copied()
    }

    /// Parses schema JSON text and builds its graph.
    pub fn build_from_str(&self, text: &str) -> Result<SchemaGraph, SchemaError> {
        Ok(self.build(&RawSchema::from_json_str(text)?))
    }

    /// Builds the graph of a schema document.
    ///
    /// Fails only when the top level is not an object.
    pub fn build_from_value(&self, document: &Value) -> Result<SchemaGraph, SchemaError> {
        Ok(self.build(&RawSchema::from_value(document)?))
    }

    /// Builds the graph of a typed raw schema. Never fails.
    pub fn build(&self, raw: &RawSchema) -> SchemaGraph {
        let mut entities: BTreeMap<SmolStr, EntitySchema> = raw
            .entities
            .values()
            .map(|entity| (entity.name.clone(), self.declared_entity(entity)))
            .collect();

        infer_backrefs(&mut entities);

        for entity in entities.values() {
            for relationship in entity.relationships.values() {
                if !entities.contains_key(&relationship.target_type) {
                    info!(
                        entity = %entity.name,
                        relationship = %relationship.name,
                        target = %relationship.target_type,
                        "relationship target is not a known entity"
                    );
                }
            }
        }

        for entity in entities.values_mut() {
            if let Some(raw_entity) = raw.entities.get(&entity.name) {
                entity.summary = summarize(raw_entity, entity);
            }
        }

        let graph = SchemaGraph { entities };
        debug!(
            entities = graph.len(),
            relationships = graph.relationship_count(),
            "built schema graph"
        );
        graph
    }

    fn declared_entity(&self, raw: &RawEntity) -> EntitySchema {
        let mut fields: BTreeSet<SmolStr> = raw.scalar_properties().cloned().collect();
        fields.extend(self.system_fields().map(SmolStr::new_static));

        let mut relationships = BTreeMap::new();
        for link in &raw.links {
            let relationship = Relationship::declared(
                link.name.clone(),
                link.target_type.clone(),
                link.backref.clone().unwrap_or_default(),
            );
            if fields.remove(&link.name) {
                warn!(
                    entity = %raw.name,
                    name = %link.name,
                    "link name collides with a scalar field, keeping the relationship"
                );
            }
            if let Some(previous) = relationships.insert(link.name.clone(), relationship) {
                warn!(
                    entity = %raw.name,
                    name = %link.name,
                    previous_target = %previous.target_type,
                    "link declared twice, keeping the last declaration"
                );
            }
        }

        EntitySchema {
            name: raw.name.clone(),
            fields,
            relationships,
            summary: EntitySummary::default(),
        }
    }
}

/// Adds the reverse edge of every declared relationship with a backref whose
/// target is part of the graph.
fn infer_backrefs(entities: &mut BTreeMap<SmolStr, EntitySchema>) {
    let inferred: Vec<(SmolStr, Relationship)> = entities
        .values()
        .flat_map(|entity| {
            entity
                .relationships_by_direction(RelationshipDirection::Declared)
                .filter(|relationship| relationship.has_backref())
                .map(move |relationship| {
                    (
                        relationship.target_type.clone(),
                        Relationship::inferred(
                            relationship.backref.clone(),
                            entity.name.clone(),
                            relationship.name.clone(),
                        ),
                    )
                })
        })
        .collect();

    for (target, relationship) in inferred {
        let Some(entity) = entities.get_mut(&target) else {
            continue;
        };

        if let Some(existing) = entity.relationships.get(&relationship.name) {
            if existing.target_type == relationship.target_type {
                debug!(
                    entity = %entity.name,
                    name = %relationship.name,
                    "backref already present"
                );
            } else {
                warn!(
                    entity = %entity.name,
                    name = %relationship.name,
                    kept = %existing.target_type,
                    dropped = %relationship.target_type,
                    direction = %existing.direction,
                    "backref collides with an existing relationship, keeping the existing one"
                );
            }
            continue;
        }

        if entity.fields.remove(&relationship.name) {
            warn!(
                entity = %entity.name,
                name = %relationship.name,
                "backref collides with a scalar field, keeping the relationship"
            );
        }
        entity
            .relationships
            .insert(relationship.name.clone(), relationship);
    }
}

fn summarize(raw: &RawEntity, entity: &EntitySchema) -> EntitySummary {
    let enum_fields = raw
        .properties
        .iter()
        .filter(|(name, definition)| definition.is_enum() && entity.has_field(name))
        .map(|(name, _)| name.clone())
        .collect();

    EntitySummary {
        title: raw.title.clone(),
        description: raw.description.clone(),
        category: raw.category.clone(),
        required_fields: raw.required.clone(),
        enum_fields,
        field_count: entity.fields.len(),
        parent_count: entity
            .relationships_by_direction(RelationshipDirection::Declared)
            .count(),
        child_count: entity
            .relationships_by_direction(RelationshipDirection::Inferred)
            .count(),
    }
}
