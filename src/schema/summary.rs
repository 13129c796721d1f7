//! Per-entity summary metadata.

use std::fmt;

use serde::Serialize;
use smol_str::SmolStr;

/// Where an entity sits in the link hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPosition {
    /// No parents.
    Root,
    /// Has parents, no children.
    Leaf,
    Intermediate,
}

impl fmt::Display for EntityPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityPosition::Root => write!(f, "root"),
            EntityPosition::Leaf => write!(f, "leaf"),
            EntityPosition::Intermediate => write!(f, "intermediate"),
        }
    }
}

/// Descriptive metadata and hierarchy counts for an entity.
///
/// Parents are the targets of declared links; children are the entities
/// whose backrefs point here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EntitySummary {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<SmolStr>,
    pub required_fields: Vec<SmolStr>,
    /// Names of enum-valued fields, in name order.
    pub enum_fields: Vec<SmolStr>,
    pub field_count: usize,
    pub parent_count: usize,
    pub child_count: usize,
}

impl EntitySummary {
    pub fn position(&self) -> EntityPosition {
        if self.parent_count == 0 {
            EntityPosition::Root
        } else if self.child_count == 0 {
            EntityPosition::Leaf
        } else {
            EntityPosition::Intermediate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(parent_count: usize, child_count: usize) -> EntitySummary {
        EntitySummary {
            parent_count,
            child_count,
            ..EntitySummary::default()
        }
    }

    #[test]
    fn position_from_counts() {
        assert_eq!(summary(0, 0).position(), EntityPosition::Root);
        assert_eq!(summary(0, 3).position(), EntityPosition::Root);
        assert_eq!(summary(2, 0).position(), EntityPosition::Leaf);
        assert_eq!(summary(1, 1).position(), EntityPosition::Intermediate);
        assert_eq!(EntityPosition::Intermediate.to_string(), "intermediate");
    }
}
