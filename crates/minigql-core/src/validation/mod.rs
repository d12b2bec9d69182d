//! Static checks run on a parsed document before it may execute.

mod fragment_cycles;
mod validation_error;
mod validator;

pub use validation_error::ValidationError;
pub use validation_error::ValidationErrorKind;

use crate::ast;
use crate::schema::Schema;

/// Checks `document` against `schema` and returns every problem found, in
/// one pass. An empty list means the document may be executed.
pub fn validate(document: &ast::Document, schema: &Schema) -> Vec<ValidationError> {
    let errors = validator::Validator::new(schema, document).validate();
    tracing::debug!(error_count = errors.len(), "validated document");
    errors
}

#[cfg(test)]
mod tests;
