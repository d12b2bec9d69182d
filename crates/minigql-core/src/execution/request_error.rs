use crate::OperationKind;

/// Request-level failures: nothing was executed, or execution was abandoned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("the document contains no operations")]
    NoOperation,

    #[error("an operation name is required when the document contains multiple operations")]
    AmbiguousOperation,

    #[error("unknown operation named `{name}`")]
    OperationNotFound { name: String },

    #[error("the schema does not support {operation} operations")]
    UnsupportedOperation { operation: OperationKind },

    #[error("invalid value for variable `${name}`: {reason}")]
    InvalidVariables { name: String, reason: String },

    #[error("{operation} operations cannot be subscribed to")]
    NotASubscription { operation: OperationKind },

    #[error("subscription operations must be run as subscriptions")]
    SubscriptionNotExecutable,

    #[error("subscription could not be started: {message}")]
    SubscriptionSetup { message: String },

    #[error("execution was cancelled")]
    Cancelled,
}
