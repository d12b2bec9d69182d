use crate::execution::FieldError;
use serde_json::Value;

/// The outcome of one execution pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecutionResult {
    /// `None` when a non-null error propagated all the way to the root,
    /// which serializes as `"data": null`.
    pub data: Option<Value>,
    pub errors: Vec<FieldError>,
}

impl ExecutionResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
