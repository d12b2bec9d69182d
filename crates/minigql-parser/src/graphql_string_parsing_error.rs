/// Failure to unescape a string literal's raw source text.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GraphQLStringParsingError {
    #[error("Invalid escape sequence: `{0}`")]
    InvalidEscapeSequence(String),

    #[error("Unterminated string: missing closing quote")]
    UnterminatedString,

    #[error("Invalid unicode escape: `{0}`")]
    InvalidUnicodeEscape(String),
}
