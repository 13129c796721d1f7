//! Typed view of a raw data-commons schema document.
//!
//! The raw document maps entity names to definitions with `properties`,
//! `links` and descriptive metadata. It is converted once, here, into
//! [`RawSchema`]; nothing downstream looks at JSON again. Malformed
//! per-entity, per-property and per-link data is skipped with a log line
//! instead of failing the conversion.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::error::SchemaError;

/// Classification of a single entity property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyDef {
    /// Carries a `type` (one name or a list of names).
    Scalar { types: Vec<SmolStr> },
    /// Carries an `enum` list of permitted values.
    Enum { values: Vec<String> },
    /// Carries `anyOf`: an embedded object or relationship shape.
    Relation,
    /// Anything else (`$ref`, `oneOf`, non-object definitions).
    Unclassified,
}

impl PropertyDef {
    /// Classifies a property definition.
    ///
    /// `anyOf` wins over `type` and `enum`; `enum` wins over `type`.
    pub fn classify(definition: &Value) -> Self {
        let Some(object) = definition.as_object() else {
            return PropertyDef::Unclassified;
        };

        if object.contains_key("anyOf") {
            return PropertyDef::Relation;
        }
        if let Some(values) = object.get("enum") {
            let values = values
                .as_array()
                .map(|values| values.iter().map(enum_value_text).collect())
                .unwrap_or_default();
            return PropertyDef::Enum { values };
        }
        if let Some(types) = object.get("type") {
            let types = match types {
                Value::String(name) => vec![SmolStr::new(name)],
                Value::Array(names) => names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(SmolStr::new)
                    .collect(),
                _ => Vec::new(),
            };
            return PropertyDef::Scalar { types };
        }
        PropertyDef::Unclassified
    }

    /// Scalar properties become directly queryable fields.
    pub fn is_scalar(&self) -> bool {
        matches!(self, PropertyDef::Scalar { .. } | PropertyDef::Enum { .. })
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, PropertyDef::Enum { .. })
    }
}

fn enum_value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A declared link, flattened out of any `subgroup` it was nested in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDef {
    pub name: SmolStr,
    pub target_type: SmolStr,
    /// Reverse traversal name; `None` when absent or empty.
    pub backref: Option<SmolStr>,
    pub label: Option<SmolStr>,
    pub multiplicity: Option<SmolStr>,
    pub required: bool,
    /// True when the link was declared inside a `subgroup`.
    pub in_subgroup: bool,
}

/// One entity definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEntity {
    pub name: SmolStr,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<SmolStr>,
    pub required: Vec<SmolStr>,
    /// Properties ordered by name for determinism.
    pub properties: BTreeMap<SmolStr, PropertyDef>,
    /// Links in declaration order with subgroups flattened.
    pub links: Vec<LinkDef>,
}

/// All entity definitions of a schema document, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSchema {
    pub entities: BTreeMap<SmolStr, RawEntity>,
}

impl RawSchema {
    /// Parses schema JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Converts a schema document. Keys starting with `_` are schema-level
    /// metadata and never become entities.
    pub fn from_value(document: &Value) -> Result<Self, SchemaError> {
        let object = document
            .as_object()
            .ok_or_else(|| SchemaError::not_an_object(document))?;

        let entities = object
            .iter()
            .filter(|(key, _)| !key.starts_with('_'))
            .map(|(key, definition)| {
                let name = SmolStr::new(key);
                let entity = RawEntity::from_value(name.clone(), definition);
                (name, entity)
            })
            .collect();

        Ok(Self { entities })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EntityDocument {
    title: Option<String>,
    description: Option<String>,
    category: Option<SmolStr>,
    required: Vec<SmolStr>,
    properties: Map<String, Value>,
    links: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct LinkDocument {
    name: Option<SmolStr>,
    target_type: Option<SmolStr>,
    backref: Option<SmolStr>,
    label: Option<SmolStr>,
    multiplicity: Option<SmolStr>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    subgroup: Vec<Value>,
}

impl RawEntity {
    /// Converts one entity definition.
    ///
    /// A definition that cannot be read at all yields an entity with no
    /// properties and no links.
    pub fn from_value(name: SmolStr, definition: &Value) -> Self {
        let document = match EntityDocument::deserialize(definition) {
            Ok(document) => document,
            Err(error) => {
                warn!(entity = %name, %error, "malformed entity definition, keeping name only");
                EntityDocument::default()
            }
        };

        let properties = document
            .properties
            .iter()
            .map(|(field, definition)| (SmolStr::new(field), PropertyDef::classify(definition)))
            .collect();

        let mut links = Vec::new();
        for link in &document.links {
            flatten_link(&name, link, false, &mut links);
        }

        Self {
            name,
            title: document.title,
            description: document.description,
            category: document.category,
            required: document.required,
            properties,
            links,
        }
    }

    /// Names of scalar properties, in name order.
    pub fn scalar_properties(&self) -> impl Iterator<Item = &SmolStr> {
        self.properties
            .iter()
            .filter(|(_, definition)| definition.is_scalar())
            .map(|(name, _)| name)
    }
}

fn flatten_link(entity: &SmolStr, link: &Value, in_subgroup: bool, out: &mut Vec<LinkDef>) {
    let document = match LinkDocument::deserialize(link) {
        Ok(document) => document,
        Err(error) => {
            debug!(%entity, %error, "skipping unreadable link entry");
            return;
        }
    };

    if !document.subgroup.is_empty() {
        for sublink in &document.subgroup {
            flatten_link(entity, sublink, true, out);
        }
        return;
    }

    match (document.name, document.target_type) {
        (Some(name), Some(target_type)) => out.push(LinkDef {
            name,
            target_type,
            backref: document.backref.filter(|backref| !backref.is_empty()),
            label: document.label,
            multiplicity: document.multiplicity,
            required: document.required,
            in_subgroup,
        }),
        _ => debug!(%entity, "skipping link entry without name or target_type"),
    }
}
