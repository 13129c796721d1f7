mod common;

use commons_guard::{QueryTemplate, TemplateError, TemplateOptions, validate_query};
use common::{commons_graph, format_errors};

#[test]
fn every_entity_template_validates() {
    let graph = commons_graph();
    for name in graph.entity_names() {
        let template = QueryTemplate::generate(&graph, name, TemplateOptions::default()).unwrap();
        let result = validate_query(&template.query, &graph);
        assert!(
            result.is_valid(),
            "template for {name} failed:\n{}\n{}",
            template.query,
            format_errors(&result)
        );
    }
}

#[test]
fn project_template_layout() {
    let graph = commons_graph();
    let template = QueryTemplate::generate(&graph, "project", TemplateOptions::default()).unwrap();
    assert_eq!(
        template.fields,
        vec!["id", "submitter_id", "type", "state", "availability_type", "code", "name"]
    );
    assert_eq!(template.relationship_examples, vec!["programs", "studies"]);
    assert!(template.query.starts_with("{\n    project(first: 10) {\n"));
    assert!(template.query.contains("        # programs {\n"));
}

#[test]
fn unknown_entity_suggests_alternatives() {
    let graph = commons_graph();
    let err = QueryTemplate::generate(&graph, "aliquots", TemplateOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Entity 'aliquots' does not exist");
    let TemplateError::UnknownEntity { suggestions, .. } = err;
    assert_eq!(suggestions, vec!["aliquot"]);
}
