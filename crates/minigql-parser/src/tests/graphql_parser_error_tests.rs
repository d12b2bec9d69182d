//! Tests for syntax errors: kinds, messages, locations and notes.

use crate::DefinitionKind;
use crate::GraphQLErrorNoteKind;
use crate::GraphQLParseErrorKind;
use crate::GraphQLParser;
use crate::ast;
use crate::tests::utils::parse_err;

// =============================================================================
// Unexpected tokens
// =============================================================================

/// A missing `:` between argument name and value.
#[test]
fn missing_colon_in_argument() {
    let err = parse_err("query { user(id 1) }");
    assert_eq!(err.message(), "expected `:`, found `1`");
    assert_eq!(err.location(), ast::AstPos { line: 1, column: 17 });
    assert_eq!(
        err.kind(),
        &GraphQLParseErrorKind::UnexpectedToken {
            expected: vec![":".to_string()],
            found: "1".to_string(),
        },
    );
}

/// Junk at the start of a document lists what a definition can start with.
#[test]
fn invalid_definition_start() {
    let err = parse_err("42");
    assert!(err.message().starts_with("expected one of `query`"), "{}", err.message());
    assert!(matches!(err.kind(), GraphQLParseErrorKind::UnexpectedToken { .. }));
}

/// An empty document has no definitions and is rejected.
#[test]
fn empty_document() {
    let err = parse_err("  # nothing here\n");
    assert!(matches!(err.kind(), GraphQLParseErrorKind::UnexpectedEof { .. }));
}

/// Lexer errors surface with the lexer's message and notes.
#[test]
fn lexer_error_is_propagated() {
    let err = parse_err("{ a ..b }");
    assert_eq!(err.kind(), &GraphQLParseErrorKind::LexerError);
    assert_eq!(err.location(), ast::AstPos { line: 1, column: 5 });
    assert!(err.notes().iter().any(|n| n.kind == GraphQLErrorNoteKind::Help));
}

/// An unterminated string on the second line is located there.
#[test]
fn unterminated_string_location() {
    let err = parse_err("{\n  f(a: \"oops)\n}");
    assert_eq!(err.kind(), &GraphQLParseErrorKind::LexerError);
    assert_eq!(err.location(), ast::AstPos { line: 2, column: 8 });
}

// =============================================================================
// Unclosed delimiters
// =============================================================================

/// Running out of input inside a selection set names the open brace.
#[test]
fn unclosed_selection_set() {
    let err = parse_err("{ books {\n  title\n");
    assert_eq!(
        err.kind(),
        &GraphQLParseErrorKind::UnclosedDelimiter { delimiter: "{".to_string() },
    );
    assert_eq!(err.message(), "unclosed `{`");

    let note = &err.notes()[0];
    assert_eq!(note.message, "opening `{` in selection set here");
    let note_span = note.span.as_ref().expect("note span");
    assert_eq!(note_span.start_inclusive.to_ast_pos(), ast::AstPos { line: 1, column: 9 });
}

/// Unclosed argument lists and list values are reported the same way.
#[test]
fn unclosed_parens_and_brackets() {
    let err = parse_err("{ f(a: 1");
    assert_eq!(
        err.kind(),
        &GraphQLParseErrorKind::UnclosedDelimiter { delimiter: "(".to_string() },
    );

    let err = parse_err("{ f(a: [1, 2");
    assert_eq!(
        err.kind(),
        &GraphQLParseErrorKind::UnclosedDelimiter { delimiter: "[".to_string() },
    );
    assert_eq!(err.notes()[0].message, "opening `[` in list value here");
}

// =============================================================================
// Empty constructs and reserved names
// =============================================================================

/// `{}` is not a valid selection set.
#[test]
fn empty_selection_set() {
    let err = parse_err("{ }");
    assert_eq!(
        err.kind(),
        &GraphQLParseErrorKind::InvalidEmptyConstruct {
            construct: "selection set".to_string(),
        },
    );
}

/// `()` is not a valid argument list.
#[test]
fn empty_argument_list() {
    let err = parse_err("{ f() }");
    assert_eq!(
        err.kind(),
        &GraphQLParseErrorKind::InvalidEmptyConstruct {
            construct: "argument list".to_string(),
        },
    );
}

/// `on` cannot name a fragment.
#[test]
fn fragment_named_on() {
    let err = parse_err("fragment on on Book { title }");
    assert_eq!(
        err.kind(),
        &GraphQLParseErrorKind::ReservedName { name: "on".to_string() },
    );
    assert_eq!(err.location(), ast::AstPos { line: 1, column: 10 });
}

/// A fragment must have a type condition.
#[test]
fn fragment_without_type_condition() {
    let err = parse_err("fragment F { title }");
    assert_eq!(err.message(), "expected `on`, found `{`");
}

// =============================================================================
// Wrong document kind
// =============================================================================

/// Type-system definitions are rejected in executable documents.
#[test]
fn type_definition_in_executable_document() {
    let err = parse_err("{ a }\ntype Book { title: String }");
    assert_eq!(
        err.kind(),
        &GraphQLParseErrorKind::WrongDocumentKind {
            found: DefinitionKind::TypeDefinition,
        },
    );
    assert_eq!(err.location(), ast::AstPos { line: 2, column: 1 });
}

/// `schema` and `directive` definitions get their own kind.
#[test]
fn schema_and_directive_definitions() {
    assert_eq!(
        parse_err("schema { query: Query }").kind(),
        &GraphQLParseErrorKind::WrongDocumentKind { found: DefinitionKind::Schema },
    );
    assert_eq!(
        parse_err("directive @x on FIELD").kind(),
        &GraphQLParseErrorKind::WrongDocumentKind {
            found: DefinitionKind::DirectiveDefinition,
        },
    );
}

// =============================================================================
// Depth limit
// =============================================================================

/// Deeply nested lists hit the depth limit instead of overflowing the stack.
#[test]
fn deeply_nested_list_value() {
    let depth = GraphQLParser::<crate::token_source::StrGraphQLTokenSource>::MAX_RECURSION_DEPTH
        + 10;
    let source = format!("{{ f(a: {}{}) }}", "[".repeat(depth), "]".repeat(depth));
    let err = parse_err(&source);
    assert_eq!(err.kind(), &GraphQLParseErrorKind::MaxDepthExceeded);
}

/// Deeply nested selection sets hit the same limit.
#[test]
fn deeply_nested_selection_sets() {
    let source = format!("{}{}", "{ a ".repeat(200), "}".repeat(200));
    let err = parse_err(&source);
    assert_eq!(err.kind(), &GraphQLParseErrorKind::MaxDepthExceeded);
}

/// Nesting within the limit parses.
#[test]
fn nesting_within_limit() {
    let source = format!("{{ f(a: {}{}) }}", "[".repeat(20), "]".repeat(20));
    assert!(crate::tests::utils::parse(&source).is_ok());
}
