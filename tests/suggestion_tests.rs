mod common;

use commons_guard::semantic::{CandidateKind, LevenshteinRatio, Suggester};
use commons_guard::GuardConfig;
use common::commons_graph;
use smol_str::SmolStr;

fn candidates(names: &[&str]) -> Vec<SmolStr> {
    names.iter().map(|name| SmolStr::new(name)).collect()
}

#[test]
fn suggest_is_deterministic_and_ordered() {
    let names = candidates(&["submitter_id", "subject", "sample", "samples", "study", "studies"]);
    let suggester = Suggester::new().with_limit(10).with_threshold(0.0);

    let first = suggester.suggest_scored("sampel", &names);
    let second = suggester.suggest_scored("sampel", &names);
    assert_eq!(first, second);
    assert_eq!(first.len(), names.len());
    for pair in first.windows(2) {
        assert!(
            pair[0].similarity > pair[1].similarity
                || (pair[0].similarity == pair[1].similarity && pair[0].name < pair[1].name),
            "{pair:?}"
        );
    }
    assert_eq!(first[0].name, "sample");
}

#[test]
fn default_threshold_and_limit() {
    let names = candidates(&["gender", "genders", "gendre", "gendered", "agenda"]);
    let result = Suggester::new().suggest("gender_", &names);
    assert_eq!(result.len(), 3);
    assert_eq!(result[0], "gender");
}

#[test]
fn lexically_distant_names_come_from_patterns() {
    let graph = commons_graph();
    let result = Suggester::new().suggest_fields(&graph, "program", "program_name");
    assert!(result.entity_exists);
    assert_eq!(result.pattern_suggestions, vec!["name"]);
    assert_eq!(result.total_valid_fields, 6);
}

#[test]
fn scored_field_suggestions_carry_kinds() {
    let graph = commons_graph();
    let result = Suggester::new().suggest_fields(&graph, "subject", "sample");
    assert_eq!(result.suggestions[0].name, "samples");
    assert_eq!(
        result.suggestions[0].kind,
        CandidateKind::Relationship { target: "sample".into() }
    );
    assert!(result.suggestions.len() <= GuardConfig::default().field_suggestion_limit);
    assert!(result.suggestions.iter().all(|s| s.similarity >= 0.4));
}

#[test]
fn missing_entity_is_reported_with_alternatives() {
    let graph = commons_graph();
    let result = Suggester::new().suggest_fields(&graph, "subjects", "gender");
    assert!(!result.entity_exists);
    assert_eq!(result.entity_suggestions[0].name, "subject");
    assert_eq!(result.total_valid_fields, 0);
}

#[test]
fn alternative_metric_keeps_the_contract() {
    let names = candidates(&["gender", "race", "ethnicity"]);
    let suggester = Suggester::new().with_metric(LevenshteinRatio);
    assert_eq!(suggester.suggest("gendr", &names), vec!["gender"]);
    assert!(suggester.suggest("zzzzzz", &names).is_empty());
}

#[test]
fn field_suggestions_serialize() {
    let graph = commons_graph();
    let result = Suggester::new().suggest_fields(&graph, "subject", "studys");
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["entity_exists"], true);
    assert_eq!(value["suggestions"][0]["name"], "studies");
    assert_eq!(value["suggestions"][0]["kind"], "relationship");
    assert_eq!(value["suggestions"][0]["target"], "study");
}
