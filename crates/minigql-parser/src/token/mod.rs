mod graphql_token;
mod graphql_token_kind;
mod string_value;

pub use graphql_token::GraphQLToken;
pub use graphql_token_kind::GraphQLTokenKind;
