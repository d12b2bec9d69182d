use crate::GraphQLStringParsingError;

/// Errors converting a literal token's raw text into a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueParsingError {
    #[error("Invalid GraphQL string: {0}")]
    String(#[from] GraphQLStringParsingError),

    /// GraphQL `Int` must fit in a signed 32-bit integer.
    #[error("Invalid GraphQL integer: {0}")]
    Int(String),

    /// GraphQL `Float` must be finite.
    #[error("Invalid GraphQL float: {0}")]
    Float(String),
}
