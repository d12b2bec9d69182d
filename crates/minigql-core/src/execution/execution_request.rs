use crate::resolver::ContextData;
use serde_json::Map;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Per-invocation inputs to [`Executor::execute`](crate::execution::Executor::execute)
/// and [`Executor::subscribe`](crate::execution::Executor::subscribe).
#[derive(Clone, Debug, Default)]
pub struct ExecutionRequest {
    /// Required when the document holds more than one operation.
    pub operation_name: Option<String>,
    /// Raw JSON variables, coerced against the operation's definitions.
    pub variables: Map<String, Value>,
    /// Parent value of the root fields.
    pub root_value: Value,
    pub context: ContextData,
    pub cancellation_token: CancellationToken,
}

impl ExecutionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_root_value(mut self, root_value: Value) -> Self {
        self.root_value = root_value;
        self
    }

    pub fn with_context(mut self, context: ContextData) -> Self {
        self.context = context;
        self
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }
}
