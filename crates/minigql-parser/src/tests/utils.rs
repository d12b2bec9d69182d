//! Shared helpers for parser tests.

use crate::ast;
use crate::GraphQLParseError;
use crate::GraphQLParser;
use crate::token::GraphQLTokenKind;
use crate::token_source::StrGraphQLTokenSource;

pub fn parse(source: &str) -> Result<ast::Document, GraphQLParseError> {
    GraphQLParser::new(source).parse_executable_document()
}

/// Parses `source`, panicking with a rendered diagnostic on failure.
pub fn parse_ok(source: &str) -> ast::Document {
    parse(source).unwrap_or_else(|err| {
        panic!("unexpected parse error:\n{}", err.format_detailed(Some(source)))
    })
}

pub fn parse_err(source: &str) -> GraphQLParseError {
    match parse(source) {
        Ok(doc) => panic!("expected a parse error, got: {doc:?}"),
        Err(err) => err,
    }
}

/// All token kinds of `source`, including the trailing `Eof`.
pub fn lex_kinds(source: &str) -> Vec<GraphQLTokenKind<'_>> {
    StrGraphQLTokenSource::new(source)
        .map(|token| token.kind)
        .collect()
}

/// The selection set of the first definition, which must be an operation.
pub fn first_selection_set(doc: &ast::Document) -> &ast::SelectionSet {
    match &doc.definitions[0] {
        ast::Definition::Operation(op) => match op {
            ast::OperationDefinition::SelectionSet(set) => set,
            ast::OperationDefinition::Query(q) => &q.selection_set,
            ast::OperationDefinition::Mutation(m) => &m.selection_set,
            ast::OperationDefinition::Subscription(s) => &s.selection_set,
        },
        other => panic!("expected an operation, got: {other:?}"),
    }
}

pub fn first_field(doc: &ast::Document) -> &ast::Field {
    match &first_selection_set(doc).items[0] {
        ast::Selection::Field(field) => field,
        other => panic!("expected a field, got: {other:?}"),
    }
}

/// Parses `{ f(arg: <value>) }` and returns the argument value.
pub fn parse_arg_value(value_source: &str) -> ast::Value {
    let source = format!("{{ f(arg: {value_source}) }}");
    let doc = parse_ok(&source);
    first_field(&doc).arguments[0].1.clone()
}
