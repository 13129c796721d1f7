mod common;

use commons_guard::schema::{EntityPosition, RelationshipDirection};
use commons_guard::{SchemaError, SchemaGraphBuilder};
use common::{commons_graph, commons_schema, scenario_graph};
use serde_json::json;
use smol_str::SmolStr;

fn names<'a>(iter: impl Iterator<Item = &'a SmolStr>) -> Vec<&'a str> {
    iter.map(SmolStr::as_str).collect()
}

#[test]
fn backref_is_inferred_on_the_target() {
    let graph = scenario_graph();

    let study = graph.entity("study").expect("study exists");
    let subjects = study.relationship("subjects").expect("backref inferred");
    assert_eq!(subjects.target_type, "subject");
    assert_eq!(subjects.backref, "studies");
    assert_eq!(subjects.direction, RelationshipDirection::Inferred);

    let subject = graph.entity("subject").expect("subject exists");
    assert!(subject.has_field("gender"));
    assert_eq!(subject.relationship("studies").unwrap().target_type, "study");
}

#[test]
fn entity_set_matches_non_underscore_keys() {
    let graph = commons_graph();
    assert_eq!(
        names(graph.entity_names()),
        vec!["aliquot", "demographic", "program", "project", "sample", "study", "subject"]
    );
}

#[test]
fn scalar_classification() {
    let graph = commons_graph();

    let project = graph.entity("project").unwrap();
    assert_eq!(
        names(project.fields.iter()),
        vec!["availability_type", "code", "id", "name", "state", "submitter_id", "type"]
    );
    // anyOf property shares its name with the link.
    assert!(project.relationship("programs").is_some());

    let subject = graph.entity("subject").unwrap();
    assert!(!subject.has_field("project_id"));
    assert!(subject.has_field("age_at_enrollment"));
}

#[test]
fn subgroup_links_become_relationships() {
    let graph = commons_graph();
    let subject = graph.entity("subject").unwrap();
    assert_eq!(
        names(subject.relationships.keys()),
        vec!["demographics", "samples", "studies"]
    );
    assert_eq!(
        subject.relationship("studies").unwrap().direction,
        RelationshipDirection::Declared
    );
}

#[test]
fn build_is_idempotent() {
    let builder = SchemaGraphBuilder::new();
    let first = builder.build_from_value(&commons_schema()).unwrap();
    let second = builder.build_from_value(&commons_schema()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn backrefs_are_symmetric() {
    let graph = commons_graph();
    for entity in graph.entities.values() {
        for relationship in entity.relationships.values() {
            if !relationship.has_backref() || !graph.contains(&relationship.target_type) {
                continue;
            }
            let target = graph.entity(&relationship.target_type).unwrap();
            let reverse = target.relationship(&relationship.backref).unwrap_or_else(|| {
                panic!(
                    "{}.{} has no reverse edge {} on {}",
                    entity.name, relationship.name, relationship.backref, target.name
                )
            });
            assert_eq!(reverse.target_type, entity.name);
        }
    }
}

#[test]
fn names_are_never_both_field_and_relationship() {
    let graph = commons_graph();
    for entity in graph.entities.values() {
        for name in entity.relationships.keys() {
            assert!(!entity.has_field(name), "{}.{name} is both", entity.name);
        }
    }
}

#[test]
fn summaries_and_hierarchy() {
    let graph = commons_graph();
    assert_eq!(graph.relationship_count(), 12);

    let position = |name: &str| graph.entity(name).unwrap().summary.position();
    assert_eq!(position("program"), EntityPosition::Root);
    assert_eq!(position("subject"), EntityPosition::Intermediate);
    assert_eq!(position("aliquot"), EntityPosition::Leaf);
    assert_eq!(position("demographic"), EntityPosition::Leaf);

    let subject = &graph.entity("subject").unwrap().summary;
    assert_eq!(subject.title.as_deref(), Some("Subject"));
    assert_eq!(subject.enum_fields, vec!["ethnicity", "gender", "race"]);
    assert_eq!(subject.required_fields, vec!["submitter_id", "type", "studies"]);
    assert_eq!((subject.parent_count, subject.child_count), (1, 2));

    let groups = graph.entities_by_category();
    assert_eq!(
        groups["administrative"],
        vec!["program", "project", "study", "subject"]
    );
    assert_eq!(groups["biospecimen"], vec!["aliquot", "sample"]);
    assert_eq!(groups["clinical"], vec!["demographic"]);
}

#[test]
fn datetime_system_fields_are_optional() {
    let graph = SchemaGraphBuilder::new()
        .with_datetime_system_fields(true)
        .build_from_value(&commons_schema())
        .unwrap();
    assert!(graph.entity("aliquot").unwrap().has_field("created_datetime"));
    assert!(!commons_graph().entity("aliquot").unwrap().has_field("created_datetime"));
}

#[test]
fn malformed_entries_are_skipped() {
    let graph = SchemaGraphBuilder::new()
        .build_from_value(&json!({
            "broken": "not an object",
            "partial": {
                "properties": {"ok": {"type": "string"}, "bad": 7},
                "links": [{"name": "dangling"}, 12, {"name": "real", "target_type": "broken"}]
            }
        }))
        .unwrap();

    assert_eq!(
        names(graph.entity("broken").unwrap().fields.iter()),
        vec!["id", "submitter_id", "type"]
    );
    let partial = graph.entity("partial").unwrap();
    assert!(partial.has_field("ok"));
    assert!(!partial.has_field("bad"));
    assert_eq!(names(partial.relationships.keys()), vec!["real"]);
}

#[test]
fn only_non_object_top_level_fails() {
    let err = SchemaGraphBuilder::new()
        .build_from_value(&json!("schema"))
        .unwrap_err();
    assert!(matches!(err, SchemaError::NotAnObject { found: "a string" }));

    let graph = SchemaGraphBuilder::new().build_from_value(&json!({})).unwrap();
    assert!(graph.is_empty());
}
