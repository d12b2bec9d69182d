use crate::DefinitionKind;
use crate::ValueParsingError;

/// Categorizes parse errors for programmatic handling.
///
/// The `#[error(...)]` texts are terse; the human-readable message lives on
/// [`GraphQLParseError`](crate::GraphQLParseError).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphQLParseErrorKind {
    /// The grammar called for one of `expected` but `found` came next.
    ///
    /// ```text
    /// query { user(id 1) }
    ///                 ^ expected `:`, found `1`
    /// ```
    #[error("unexpected token: `{found}`")]
    UnexpectedToken {
        expected: Vec<String>,
        found: String,
    },

    /// The document ended in the middle of a construct.
    #[error("unexpected end of input")]
    UnexpectedEof {
        expected: Vec<String>,
    },

    /// The lexer produced an error token. Its message and notes are carried
    /// over onto the parse error.
    #[error("lexer error")]
    LexerError,

    /// A `{`, `(` or `[` was never closed. The opening location is attached
    /// as a note.
    #[error("unclosed delimiter: `{delimiter}`")]
    UnclosedDelimiter {
        delimiter: String,
    },

    /// A literal could not be converted into a value (overflowing `Int`,
    /// bad escape in a string, ...).
    #[error("invalid value")]
    InvalidValue(ValueParsingError),

    /// `on` used as a fragment name.
    #[error("reserved name: `{name}`")]
    ReservedName {
        name: String,
    },

    /// A type-system definition appeared in an executable document.
    #[error("wrong document kind")]
    WrongDocumentKind {
        found: DefinitionKind,
    },

    /// `{ }`, `()` and friends must not be empty.
    #[error("invalid empty construct: `{construct}`")]
    InvalidEmptyConstruct {
        construct: String,
    },

    /// Nesting exceeded the parser's recursion limit.
    #[error("maximum nesting depth exceeded")]
    MaxDepthExceeded,

    /// Anything else. The message says what went wrong.
    #[error("invalid syntax")]
    InvalidSyntax,
}
