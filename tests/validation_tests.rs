mod common;

use commons_guard::semantic::{ErrorType, PathValidator};
use commons_guard::{GuardConfig, parse_query, validate_query};
use common::{assert_valid, commons_graph, format_errors, scenario_graph, single_error};

#[test]
fn misspelled_leaf_field_suggests_the_real_one() {
    let error = single_error("{ subject { id gander } }", &scenario_graph());
    assert_eq!(error.error_type, ErrorType::UnknownField);
    assert_eq!(error.entity, "subject");
    assert_eq!(error.field, "gander");
    assert!(error.suggestions.iter().any(|s| s == "gender"));
}

#[test]
fn unknown_root_entity() {
    let error = single_error("{ unknown_entity { id } }", &scenario_graph());
    assert_eq!(error.error_type, ErrorType::UnknownEntity);
    assert_eq!(error.entity, "unknown_entity");
    assert_eq!(error.field, "");
}

#[test]
fn unknown_field_on_relationship_target() {
    let error = single_error("{ subject { studies { invalid_field } } }", &scenario_graph());
    assert_eq!(error.error_type, ErrorType::UnknownField);
    assert_eq!(error.entity, "study");
    assert_eq!(error.field, "invalid_field");
}

#[test]
fn missing_closing_brace_is_one_syntax_error() {
    let error = single_error("{ subject { id }", &scenario_graph());
    assert_eq!(error.error_type, ErrorType::SyntaxError);
    assert!(error.span.is_some());
}

#[test]
fn empty_selection_set_is_a_syntax_error() {
    let error = single_error("{ subject { } }", &scenario_graph());
    assert_eq!(error.error_type, ErrorType::SyntaxError);
    assert!(
        error.message.contains("Selection set must contain at least one selection"),
        "{}",
        error.message
    );
}

#[test]
fn other_syntax_errors() {
    let graph = scenario_graph();
    for query in ["", "{ subject { id } } }", "{ subject { id % } }", "{ subject(first: ) { id } }"] {
        let result = validate_query(query, &graph);
        assert_eq!(result.errors.len(), 1, "{query}: {}", format_errors(&result));
        assert_eq!(result.errors[0].error_type, ErrorType::SyntaxError, "{query}");
    }
}

#[test]
fn every_invalid_leaf_is_reported() {
    let graph = commons_graph();
    let query = r#"
        {
            subject {
                id
                gander
                favourite_color
                studies {
                    study_design
                    budget
                    projects { code nickname }
                }
                samples { sample_type tissue_weight }
            }
            program { name funding }
        }
    "#;
    let result = validate_query(query, &graph);
    let unknown: Vec<_> = result
        .errors_of(ErrorType::UnknownField)
        .map(|e| (e.entity.as_str(), e.field.as_str()))
        .collect();
    assert_eq!(
        unknown,
        vec![
            ("subject", "gander"),
            ("subject", "favourite_color"),
            ("study", "budget"),
            ("project", "nickname"),
            ("sample", "tissue_weight"),
            ("program", "funding"),
        ]
    );
    assert_eq!(result.errors.len(), 6);
}

#[test]
fn validation_is_deterministic() {
    let graph = commons_graph();
    let query = "{ subjct { id } subject { gander studys { id } samples { sampel_type } } }";
    let first = validate_query(query, &graph);
    let second = validate_query(query, &graph);
    assert_eq!(first, second);
    assert_eq!(first.error_summary(), second.error_summary());
    assert_eq!(first.errors.len(), 4);
}

#[test]
fn schema_derived_query_round_trips() {
    let graph = commons_graph();
    for (name, entity) in &graph.entities {
        let mut query = format!("{{ {name}(first: 5) {{");
        for field in &entity.fields {
            query.push(' ');
            query.push_str(field);
        }
        for (relationship_name, relationship) in &entity.relationships {
            let Some(target) = graph.entity(&relationship.target_type) else {
                continue;
            };
            query.push_str(&format!(" {relationship_name} {{"));
            for field in &target.fields {
                query.push(' ');
                query.push_str(field);
            }
            query.push_str(" }");
        }
        query.push_str(" } }");
        assert_valid(&query, &graph);
    }
}

#[test]
fn deep_backref_traversal() {
    let graph = commons_graph();
    assert_valid(
        "query Deep { program { name projects { code studies { subjects { gender samples { aliquots { aliquot_volume } } } } } } }",
        &graph,
    );
}

#[test]
fn relationship_hop_errors() {
    let graph = commons_graph();
    let error = single_error("{ subject { studys { id } } }", &graph);
    assert_eq!(error.error_type, ErrorType::UnknownEntity);
    assert_eq!(error.entity, "studys");
    assert_eq!(error.field, "");
    assert_eq!(error.message, "Relationship 'studys' does not exist in entity 'subject'");
    assert_eq!(error.suggestions, vec!["studies"]);
}

#[test]
fn aliases_arguments_comments_and_fragments() {
    let graph = commons_graph();
    let query = r#"
        # list subjects
        query Subjects($first: Int = 10, $project: [String!]) {
            people: subject(first: $first, project_id: $project, order_by_asc: "age_at_enrollment") {
                sex: gender
                ...Basics
                ... on subject @include(if: true) { race }
                studies { ...StudyBits }
            }
        }
        fragment Basics on subject { id submitter_id __typename }
        fragment StudyBits on study { study_description }
    "#;
    assert_valid(query, &graph);

    let paths = parse_query(query).unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].fields, vec!["gender", "id", "submitter_id", "race"]);
    assert_eq!(paths[1].path, vec!["subject", "studies"]);
}

#[test]
fn extracted_fields_merge_paths() {
    let graph = commons_graph();
    let result = validate_query("{ subject { id gender } subject { race id } }", &graph);
    assert!(result.is_valid());
    assert_eq!(result.extracted_fields()["subject"], vec!["id", "gender", "race"]);
}

#[test]
fn diagnostics_render_with_help() {
    let graph = scenario_graph();
    let query = "{ subject { id gander } }";
    let result = validate_query(query, &graph);
    let diags = result.to_diags();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].help.as_deref(), Some("did you mean 'gender'?"));

    let report = commons_guard::convert_diag_to_report(&diags[0], query);
    assert_eq!(report.to_string(), "Field 'gander' does not exist in entity 'subject'");
}

#[test]
fn configured_validator_uses_limits() {
    let graph = commons_graph();
    let config = GuardConfig {
        suggestion_limit: 1,
        suggestion_threshold: 0.3,
        pattern_suggestion_limit: 0,
        ..GuardConfig::default()
    };
    let validator = PathValidator::from_config(&config);
    let result = validator.validate("{ subject { gendr } }", &graph);
    assert_eq!(result.errors[0].suggestions, vec!["gender"]);
}

#[test]
fn result_serializes_for_tool_responses() {
    let graph = scenario_graph();
    let result = validate_query("{ subject { gander } }", &graph);
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["is_valid"], false);
    assert_eq!(value["errors"][0]["error_type"], "unknown_field");
    assert_eq!(value["errors"][0]["suggestions"][0], "gender");
    assert_eq!(value["extracted_fields"]["subject"][0], "gander");
}

#[test]
fn fragment_fan_out_is_a_single_syntax_error() {
    let mut query = String::from("{ subject { ...F0 } }");
    for i in 0..30 {
        query.push_str(&format!(
            " fragment F{i} on subject {{ id studies {{ ...F{0} }} subjects: studies {{ ...F{0} }} }}",
            i + 1
        ));
    }
    query.push_str(" fragment F30 on subject { id }");

    let result = validate_query(&query, &scenario_graph());
    assert_eq!(result.errors.len(), 1, "{}", format_errors(&result));
    assert_eq!(result.errors[0].error_type, ErrorType::SyntaxError);
    assert!(result.errors[0].message.contains("entity paths"));
}

#[test]
fn repeated_fragment_spreads_report_each_error_once() {
    let query = "{ subject { ...Bad ...Bad ...Bad } } fragment Bad on subject { gander studies { nope } }";
    let result = validate_query(query, &scenario_graph());
    let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["gander", "nope"]);
}
