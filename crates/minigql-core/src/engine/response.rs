use crate::engine::GraphQLError;
use crate::execution::ExecutionResult;
use serde::Serialize;
use serde_json::Value;

/// The `{ "data": ..., "errors": [...] }` envelope.
///
/// `data` is tri-state: absent when nothing was executed (syntax and
/// request-level errors), `Some(Value::Null)` when validation failed or a
/// non-null error reached the root, and the result object otherwise.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl Response {
    /// A response with no `data` key.
    pub fn from_errors(errors: Vec<GraphQLError>) -> Self {
        Self { data: None, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<ExecutionResult> for Response {
    fn from(result: ExecutionResult) -> Self {
        Self {
            data: Some(result.data.unwrap_or(Value::Null)),
            errors: result.errors.into_iter().map(GraphQLError::from).collect(),
        }
    }
}
