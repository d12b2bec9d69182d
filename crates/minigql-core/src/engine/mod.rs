//! The request-level entry point: parse, validate, then execute or
//! subscribe, reporting every failure in the standard response envelope.

#[allow(clippy::module_inception)]
mod engine;
mod graphql_error;
mod request;
mod response;
mod response_stream;

pub use engine::Engine;
pub use graphql_error::GraphQLError;
pub use graphql_error::Location;
pub use request::Request;
pub use response::Response;
pub use response_stream::ResponseStream;
