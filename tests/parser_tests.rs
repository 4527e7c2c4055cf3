// tests/parser_tests.rs

use miette::Diagnostic;
use minisciath::errors::{ErrorCategory, ParseError};
use minisciath::syntax::{parse_str, Node};

fn s(text: &str) -> Node {
    Node::Scalar(text.to_string())
}

fn map(entries: &[(&str, Node)]) -> Node {
    Node::Mapping(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

fn parse(text: &str) -> Node {
    parse_str("tests.yml", text).unwrap()
}

fn parse_err(text: &str) -> ParseError {
    parse_str("tests.yml", text).unwrap_err()
}

// ---
// Scenarios
// ---

#[test]
fn test_flat_sequence() {
    assert_eq!(parse("- alpha\n- beta\n"), Node::Sequence(vec![s("alpha"), s("beta")]));
}

#[test]
fn test_flat_mapping() {
    assert_eq!(
        parse("name: test1\ncommand: echo hi\n"),
        map(&[("name", s("test1")), ("command", s("echo hi"))])
    );
}

#[test]
fn test_sequence_of_mappings() {
    let doc = parse("- name: t1\n  command: run1\n- name: t2\n  command: run2\n");
    assert_eq!(
        doc,
        Node::Sequence(vec![
            map(&[("name", s("t1")), ("command", s("run1"))]),
            map(&[("name", s("t2")), ("command", s("run2"))]),
        ])
    );
}

#[test]
fn test_duplicate_key_fails_at_second_line() {
    let err = parse_err("name: t1\nname: t2\n");
    assert_eq!(err.category(), ErrorCategory::DuplicateKey);
    assert_eq!(err.line(), 2);
    assert_eq!(err.file(), "tests.yml");
}

#[test]
fn test_tab_indentation_fails() {
    let err = parse_err("- outer\n\tinner: value\n");
    assert_eq!(err.category(), ErrorCategory::Indentation);
    assert_eq!(err.line(), 2);
}

// ---
// Properties
// ---

#[test]
fn test_blank_and_comment_lines_do_not_change_structure() {
    let plain = "- name: t1\n  command: run1\n- name: t2\n";
    let noisy = "# suite\n\n- name: t1   # first\n\n      # stray comment\n  command: run1\n\n- name: t2\n\n";
    assert_eq!(parse(plain), parse(noisy));
}

#[test]
fn test_depth_follows_indentation_increases() {
    let doc = parse("a:\n  b:\n    - c\n    -\n       d: e\n");
    assert_eq!(doc.depth(), 4);
    assert_eq!(
        doc,
        map(&[(
            "a",
            map(&[(
                "b",
                Node::Sequence(vec![s("c"), map(&[("d", s("e"))])])
            )])
        )])
    );
}

#[test]
fn test_indent_width_need_not_be_uniform() {
    let doc = parse("top:\n    - x\n    - nested:\n       - y\n");
    assert_eq!(
        doc,
        map(&[(
            "top",
            Node::Sequence(vec![s("x"), map(&[("nested", Node::Sequence(vec![s("y")]))])])
        )])
    );
}

#[test]
fn test_duplicate_key_detected_when_nested() {
    let err = parse_err("- name: t1\n  opts:\n    a: 1\n    a: 2\n");
    assert_eq!(err.category(), ErrorCategory::DuplicateKey);
    assert_eq!(err.line(), 4);
}

#[test]
fn test_same_key_in_sibling_mappings_is_fine() {
    let doc = parse("- name: a\n- name: b\n");
    assert_eq!(doc.as_sequence().map(|items| items.len()), Some(2));
}

#[test]
fn test_tab_on_blank_line_still_fails() {
    let err = parse_err("- a\n\t\n- b\n");
    assert_eq!(err.category(), ErrorCategory::Indentation);
    assert_eq!(err.line(), 2);
}

#[test]
fn test_empty_values_stay_empty_scalars() {
    assert_eq!(parse("key:\nother: x\n"), map(&[("key", s("")), ("other", s("x"))]));
    assert_eq!(parse("-\n- b\n"), Node::Sequence(vec![s(""), s("b")]));
}

#[test]
fn test_value_keeps_text_after_first_colon() {
    assert_eq!(
        parse("command: ./app --url=http://host:80\n"),
        map(&[("command", s("./app --url=http://host:80"))])
    );
}

#[test]
fn test_escaped_hash_survives() {
    assert_eq!(
        parse("command: echo \\#1 # run\n"),
        map(&[("command", s("echo #1"))])
    );
}

#[test]
fn test_crlf_input_parses() {
    assert_eq!(
        parse("- name: a\r\n  command: b\r\n"),
        Node::Sequence(vec![map(&[("name", s("a")), ("command", s("b"))])])
    );
}

// ---
// Structural errors
// ---

#[test]
fn test_inline_value_then_nested_block_fails_at_nested_line() {
    let err = parse_err("- name: t1\n  opts: verbose\n    level: 3\n");
    assert_eq!(err.category(), ErrorCategory::UnexpectedNesting);
    assert_eq!(err.line(), 3);
}

#[test]
fn test_nested_under_filled_sequence_item_fails() {
    let err = parse_err("- outer\n  - inner\n");
    assert_eq!(err.category(), ErrorCategory::UnexpectedNesting);
    assert_eq!(err.line(), 2);
}

#[test]
fn test_mixing_kinds_at_one_level_fails() {
    let err = parse_err("- a\nkey: b\n");
    assert_eq!(err.category(), ErrorCategory::MixedEntryType);
    assert_eq!(err.line(), 2);
}

#[test]
fn test_mixing_kinds_after_dedent_fails() {
    let err = parse_err("a:\n  - x\nb:\n  c: y\n- z\n");
    assert_eq!(err.category(), ErrorCategory::MixedEntryType);
    assert_eq!(err.line(), 5);
}

#[test]
fn test_dedent_to_unknown_level_fails() {
    let err = parse_err("a:\n    b: 1\n  c: 2\n");
    assert_eq!(err.category(), ErrorCategory::Indentation);
    assert_eq!(err.line(), 3);
}

#[test]
fn test_dash_glued_to_text_is_a_scalar() {
    assert_eq!(
        parse("- a\n--\n-x\n"),
        Node::Sequence(vec![s("a"), s("-"), s("x")])
    );
}

#[test]
fn test_line_without_colon_or_dash_is_malformed() {
    let err = parse_err("- a\n- b\nnot an entry\n");
    assert_eq!(err.category(), ErrorCategory::MalformedEntry);
    assert_eq!(err.line(), 3);
}

#[test]
fn test_comment_only_input_is_empty() {
    let err = parse_err("# nothing here\n\n   \n");
    assert_eq!(err.category(), ErrorCategory::EmptyDocument);
    assert_eq!(parse_err("").category(), ErrorCategory::EmptyDocument);
}

// ---
// Diagnostics
// ---

#[test]
fn test_error_display_names_file_and_line() {
    let err = parse_err("name: t1\nname: t2\n");
    assert_eq!(
        err.to_string(),
        "tests.yml:2: file parse error: duplicate key: name"
    );
}

#[test]
fn test_diagnostic_carries_code_and_label() {
    let err = parse_err("- a\n\t- b\n");
    let code = err.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("minisciath::parse::indentation"));
    assert!(err.help().is_some());
    let labels: Vec<_> = err.labels().into_iter().flatten().collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].offset(), 4);
}
