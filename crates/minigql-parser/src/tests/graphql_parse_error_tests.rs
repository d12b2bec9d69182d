//! Tests for [`crate::GraphQLParseError`] rendering.

use crate::GraphQLParser;
use crate::tests::utils::parse_err;
use std::path::Path;

/// The one-line form is `file:line:col: error: message`.
#[test]
fn format_oneline() {
    let err = parse_err("query { user(id 1) }");
    assert_eq!(err.format_oneline(), "<input>:1:17: error: expected `:`, found `1`");
    assert_eq!(err.to_string(), err.format_oneline());
}

/// The detailed form shows the offending line with a caret underline.
#[test]
fn format_detailed_with_snippet() {
    let source = "query { user(id 1) }";
    let err = parse_err(source);
    let detailed = err.format_detailed(Some(source));
    assert!(detailed.starts_with("error: expected `:`, found `1`\n"), "{detailed}");
    assert!(detailed.contains("  --> <input>:1:17"), "{detailed}");
    assert!(detailed.contains(" 1 | query { user(id 1) }"), "{detailed}");
    assert!(detailed.contains("^"), "{detailed}");
}

/// Without source text only the header and notes are rendered.
#[test]
fn format_detailed_without_source() {
    let err = parse_err("{ f(a: [1");
    let detailed = err.format_detailed(None);
    assert!(!detailed.contains(" | "), "{detailed}");
    assert!(detailed.contains("= note: opening `[` in list value here"), "{detailed}");
}

/// Errors from a file-backed parser name the file.
#[test]
fn file_path_in_location() {
    let path = Path::new("queries/books.graphql");
    let err = GraphQLParser::with_file_path("{ books", path)
        .parse_executable_document()
        .unwrap_err();
    assert!(
        err.format_oneline().starts_with("queries/books.graphql:1:"),
        "{}",
        err.format_oneline(),
    );
}

/// `byte_offset` points at the offending token.
#[test]
fn byte_offset_of_error() {
    let err = parse_err("{ a }\n{ b(");
    assert_eq!(err.byte_offset(), 10);
}
