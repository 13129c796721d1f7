//! Schema graph extraction.
//!
//! A raw schema document is converted into typed definitions ([`raw`]) and
//! then into a normalized [`SchemaGraph`] of entities, scalar fields and
//! directed relationships, including the reverse relationships implied by
//! backrefs.

mod builder;
mod graph;
pub mod raw;
mod summary;

pub use builder::{DATETIME_SYSTEM_FIELDS, SYSTEM_FIELDS, SchemaGraphBuilder};
pub use graph::{EntitySchema, Relationship, RelationshipDirection, SchemaGraph};
pub use raw::{LinkDef, PropertyDef, RawEntity, RawSchema};
pub use summary::{EntityPosition, EntitySummary};
