use commons_guard::ast::{Definition, OperationKind, Selection, Value};
use commons_guard::parser::MAX_NESTING_DEPTH;
use commons_guard::{TokenKind, parse_document, parse_query, tokenize};

fn parse_ok(source: &str) -> commons_guard::Document {
    parse_document(source).unwrap_or_else(|err| panic!("unexpected error for `{source}`: {err}"))
}

fn parse_err(source: &str) -> String {
    match parse_document(source) {
        Ok(document) => panic!("expected `{source}` to fail, got {document:?}"),
        Err(err) => err.message().to_string(),
    }
}

#[test]
fn shorthand_and_named_operations() {
    let document = parse_ok("{ a } query Q { b } mutation M { c } subscription S { d }");
    let kinds: Vec<_> = document.operations().map(|op| op.kind).collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::Query,
            OperationKind::Query,
            OperationKind::Mutation,
            OperationKind::Subscription
        ]
    );
}

#[test]
fn arguments_are_not_selections() {
    let document = parse_ok(r#"{ subject(first: 10, filter: {gender: ["Male", "Female"], age: {gt: 1.5e1}}) { id } }"#);
    let Definition::Operation(operation) = &document.definitions[0] else {
        panic!("expected an operation");
    };
    let Selection::Field(field) = &operation.selection_set.selections[0] else {
        panic!("expected a field");
    };
    assert_eq!(field.arguments.len(), 2);
    assert!(matches!(field.arguments[1].value, Value::Object(..)));
    assert_eq!(field.selection_set.as_ref().unwrap().selections.len(), 1);
}

#[test]
fn comments_commas_and_block_strings_are_ignored_tokens() {
    let source = "{\n  # fields\n  subject(note: \"\"\"\n    multi\n    line\n  \"\"\"), { id, }\n}";
    let paths = parse_query(source).unwrap();
    assert_eq!(paths[0].fields, vec!["id"]);

    let tokens = tokenize("# only a comment\n").tokens;
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn syntax_errors_report_the_first_problem() {
    assert_eq!(parse_err("{ subject { id }"), "Expected '}', found <EOF>");
    assert_eq!(
        parse_err("{ subject { } }"),
        "Selection set must contain at least one selection"
    );
    assert!(parse_err("{ subject { id } } extra").starts_with("Expected an operation or fragment definition"));
    assert!(parse_err("query ($a: ) { id }").starts_with("Expected"));
    assert!(parse_err("{ a(x: \"unterminated) { id } }").contains("nterminated"));
}

#[test]
fn syntax_errors_render_with_source_context() {
    let query = "{ subject { id }";
    let err = parse_document(query).unwrap_err();
    assert_eq!(err.span(), Some(&(16..16)));
    let report = err.to_report(query);
    assert_eq!(report.to_string(), "Expected '}', found <EOF>");
}

#[test]
fn fragment_problems_are_syntax_errors() {
    let err = parse_query("{ subject { ...Missing } }").unwrap_err();
    assert_eq!(err.message(), "Unknown fragment \"Missing\"");

    let err = parse_query("{ subject { ...A } } fragment A on subject { ...B } fragment B on subject { ...A }")
        .unwrap_err();
    assert!(err.message().contains("spreads itself"), "{}", err.message());
}

#[test]
fn nesting_limit() {
    let nested = |depth: usize| {
        let mut query = String::new();
        for level in 0..depth {
            query.push_str(&format!("{{ f{level} "));
        }
        query.push_str("id");
        for _ in 0..depth {
            query.push_str(" }");
        }
        query
    };

    assert!(parse_document(&nested(MAX_NESTING_DEPTH)).is_ok());
    assert_eq!(parse_query(&nested(MAX_NESTING_DEPTH)).unwrap().len(), MAX_NESTING_DEPTH - 1);
    let err = parse_document(&nested(MAX_NESTING_DEPTH + 1)).unwrap_err();
    assert!(err.message().contains("maximum depth"), "{}", err.message());
}

#[test]
fn paths_record_hierarchy_and_spans() {
    let query = "{ subject { id studies { study_title } } }";
    let paths = parse_query(query).unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[1].entity_name, "studies");
    assert_eq!(paths[1].path, vec!["subject", "studies"]);
    assert_eq!(paths[1].depth(), 2);
    assert_eq!(&query[paths[1].field_spans[0].clone()], "study_title");
    assert_eq!(&query[paths[0].path_spans[0].clone()], "subject");
}
