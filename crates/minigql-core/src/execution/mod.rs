//! Runs validated operations against a [`Schema`](crate::schema::Schema).
//!
//! Query fields and list items resolve concurrently and land in document
//! order; mutation root fields run one after another. A failing field is
//! recorded as a [`FieldError`] and nulls its nearest nullable ancestor.

mod execution_request;
mod execution_result;
pub(crate) mod executor;
mod field_error;
mod request_error;

pub use execution_request::ExecutionRequest;
pub use execution_result::ExecutionResult;
pub use executor::Executor;
pub use field_error::FieldError;
pub use field_error::PathSegment;
pub use request_error::RequestError;
