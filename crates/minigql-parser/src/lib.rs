//! A GraphQL lexer and parser for executable documents.
//!
//! Parsing is fail-fast: the first lexical or syntactic problem is returned
//! as a [`GraphQLParseError`] carrying a 1-based line/column location, a
//! source span and optional notes. Successful parses produce the owned
//! [`ast::Document`] consumed by validation and execution.
//!
//! ```
//! let doc = minigql_parser::parse_executable_document(
//!     "query Books { books { title author } }",
//! ).unwrap();
//! assert_eq!(doc.definitions.len(), 1);
//!
//! let err = minigql_parser::parse_executable_document("{ books {").unwrap_err();
//! assert_eq!(err.location().line, 1);
//! ```

pub mod ast;
mod definition_kind;
mod graphql_error_note;
mod graphql_parse_error;
mod graphql_parse_error_kind;
mod graphql_parser;
mod graphql_source_span;
mod graphql_string_parsing_error;
mod graphql_token_stream;
mod source_position;
pub mod token;
pub mod token_source;
mod value_parsing_error;

pub use definition_kind::DefinitionKind;
pub use graphql_error_note::GraphQLErrorNote;
pub use graphql_error_note::GraphQLErrorNoteKind;
pub use graphql_error_note::GraphQLErrorNotes;
pub use graphql_parse_error::GraphQLParseError;
pub use graphql_parse_error_kind::GraphQLParseErrorKind;
pub use graphql_parser::GraphQLParser;
pub use graphql_source_span::GraphQLSourceSpan;
pub use graphql_string_parsing_error::GraphQLStringParsingError;
pub use graphql_token_stream::GraphQLTokenStream;
pub use smallvec::smallvec;
pub use smallvec::SmallVec;
pub use source_position::SourcePosition;
pub use value_parsing_error::ValueParsingError;

/// Parses `source` as an executable document.
pub fn parse_executable_document(source: &str) -> Result<ast::Document, GraphQLParseError> {
    GraphQLParser::new(source).parse_executable_document()
}

#[cfg(test)]
mod tests;
