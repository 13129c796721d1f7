//! Query templates built only from names the schema guarantees.

use serde::Serialize;
use smol_str::SmolStr;

use super::similarity::SimilarityMetric;
use super::suggest::Suggester;
use crate::error::TemplateError;
use crate::schema::{RelationshipDirection, SYSTEM_FIELDS, SchemaGraph};

/// Fields listed right after the system fields when the entity has them.
const PRIORITY_FIELDS: [&str; 3] = ["created_datetime", "updated_datetime", "state"];

const MAX_RELATIONSHIP_EXAMPLES: usize = 5;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Value of the `first` argument on the root field.
    pub first: u32,
    /// Upper bound on selected fields. System, priority and enum fields are
    /// always selected; only the remaining scalar fields are cut.
    pub max_fields: usize,
    pub include_relationships: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            first: 10,
            max_fields: 20,
            include_relationships: true,
        }
    }
}

/// A ready-to-run query selecting known-valid fields of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTemplate {
    pub entity: SmolStr,
    pub query: String,
    /// Selected fields in template order.
    pub fields: Vec<SmolStr>,
    pub enum_fields: Vec<SmolStr>,
    pub required_fields: Vec<SmolStr>,
    /// Relationships shown as commented-out nested selections.
    pub relationship_examples: Vec<SmolStr>,
}

impl QueryTemplate {
    /// Builds a template with default similarity settings for the error case.
    pub fn generate(
        graph: &SchemaGraph,
        entity: &str,
        options: TemplateOptions,
    ) -> Result<Self, TemplateError> {
        Self::generate_with(graph, entity, options, &Suggester::default())
    }

    pub fn generate_with<M: SimilarityMetric>(
        graph: &SchemaGraph,
        entity: &str,
        options: TemplateOptions,
        suggester: &Suggester<M>,
    ) -> Result<Self, TemplateError> {
        let Some(schema) = graph.entity(entity) else {
            return Err(TemplateError::UnknownEntity {
                entity: entity.into(),
                suggestions: suggester.suggest(entity, graph.entity_names()),
            });
        };

        let mut fields: Vec<SmolStr> = SYSTEM_FIELDS.into_iter().map(SmolStr::new_static).collect();
        let mut chosen: Vec<SmolStr> = PRIORITY_FIELDS
            .into_iter()
            .filter(|name| schema.has_field(name))
            .map(SmolStr::new_static)
            .collect();
        for name in &schema.summary.enum_fields {
            if !fields.contains(name) && !chosen.contains(name) {
                chosen.push(name.clone());
            }
        }
        let remaining = options.max_fields.saturating_sub(fields.len() + chosen.len());
        let others: Vec<SmolStr> = schema
            .fields
            .iter()
            .filter(|name| !fields.contains(name) && !chosen.contains(name))
            .take(remaining)
            .cloned()
            .collect();
        chosen.extend(others);
        fields.extend(chosen);

        let relationship_examples: Vec<SmolStr> = if options.include_relationships {
            schema
                .relationships_by_direction(RelationshipDirection::Declared)
                .chain(schema.relationships_by_direction(RelationshipDirection::Inferred))
                .take(MAX_RELATIONSHIP_EXAMPLES)
                .map(|relationship| relationship.name.clone())
                .collect()
        } else {
            Vec::new()
        };

        let query = render(&schema.name, options.first, &fields, &relationship_examples);

        Ok(Self {
            entity: schema.name.clone(),
            query,
            fields,
            enum_fields: schema.summary.enum_fields.clone(),
            required_fields: schema.summary.required_fields.clone(),
            relationship_examples,
        })
    }
}

fn render(entity: &str, first: u32, fields: &[SmolStr], relationships: &[SmolStr]) -> String {
    let inner = format!("{INDENT}{INDENT}");
    let mut lines = vec!["{".to_string(), format!("{INDENT}{entity}(first: {first}) {{")];
    lines.extend(fields.iter().map(|field| format!("{inner}{field}")));
    if !relationships.is_empty() {
        lines.push(String::new());
        lines.push(format!("{inner}# Relationship fields (uncomment as needed):"));
        for name in relationships {
            lines.extend([
                format!("{inner}# {name} {{"),
                format!("{inner}#{INDENT}id"),
                format!("{inner}#{INDENT}submitter_id"),
                format!("{inner}# }}"),
            ]);
        }
    }
    lines.push(format!("{INDENT}}}"));
    lines.push("}".to_string());
    lines.join("\n")
}
