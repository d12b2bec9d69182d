use crate::OperationKind;
use crate::ast;

/// One problem found by [`validate`](crate::validation::validate), with the
/// document positions it concerns.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct ValidationError {
    pub(crate) kind: ValidationErrorKind,
    pub(crate) locations: Vec<ast::AstPos>,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, locations: Vec<ast::AstPos>) -> Self {
        Self { kind, locations }
    }

    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }

    pub fn locations(&self) -> &[ast::AstPos] {
        &self.locations
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

fn operation_label(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("operation `{name}`"),
        None => "anonymous operation".to_string(),
    }
}

fn fragment_label(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("fragment `{name}`"),
        None => "inline fragment".to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationErrorKind {
    #[error("there can be only one operation named `{name}`")]
    DuplicateOperationName { name: String },

    #[error("an anonymous operation must be the only operation in its document")]
    AnonymousOperationNotAlone,

    #[error("the schema does not support {operation} operations")]
    UnsupportedOperation { operation: OperationKind },

    #[error("cannot query field `{field_name}` on type `{type_name}`")]
    UndefinedField {
        type_name: String,
        field_name: String,
    },

    #[error("field `{type_name}.{field_name}` of type `{field_type}` must not have a selection set")]
    LeafFieldWithSelection {
        type_name: String,
        field_name: String,
        field_type: String,
    },

    #[error("field `{type_name}.{field_name}` of type `{field_type}` must have a selection set")]
    MissingSubselection {
        type_name: String,
        field_name: String,
        field_type: String,
    },

    #[error("unknown argument `{argument}` on field `{type_name}.{field_name}`")]
    UnknownArgument {
        type_name: String,
        field_name: String,
        argument: String,
    },

    #[error("argument `{argument}` is given more than once")]
    DuplicateArgument { argument: String },

    #[error("field `{type_name}.{field_name}` requires argument `{argument}` of type `{argument_type}`")]
    MissingRequiredArgument {
        type_name: String,
        field_name: String,
        argument: String,
        argument_type: String,
    },

    #[error("invalid value for argument `{argument}`: {reason}")]
    InvalidArgumentValue { argument: String, reason: String },

    #[error("unknown type `{type_name}`")]
    UnknownType { type_name: String },

    #[error("there can be only one fragment named `{name}`")]
    DuplicateFragmentName { name: String },

    #[error("{} cannot condition on non-object type `{type_name}`", fragment_label(fragment))]
    FragmentOnNonObjectType {
        fragment: Option<String>,
        type_name: String,
    },

    #[error("fragment `{name}` is never used")]
    UnusedFragment { name: String },

    #[error("unknown fragment `{name}`")]
    UndefinedFragment { name: String },

    #[error("{} on type `{type_condition}` cannot be spread within type `{parent_type}`", fragment_label(fragment))]
    FragmentTypeMismatch {
        fragment: Option<String>,
        type_condition: String,
        parent_type: String,
    },

    #[error("cannot spread fragments in a cycle: {}", cycle_path.join(" -> "))]
    FragmentCycle { cycle_path: Vec<String> },

    #[error("there can be only one variable named `${name}`")]
    DuplicateVariable { name: String },

    #[error("variable `${name}` cannot be of non-input type `{var_type}`")]
    NonInputVariableType { name: String, var_type: String },

    #[error("invalid default value for variable `${name}`: {reason}")]
    InvalidVariableDefault { name: String, reason: String },

    #[error("variable `${name}` is not defined by {}", operation_label(operation))]
    UndefinedVariable {
        name: String,
        operation: Option<String>,
    },

    #[error("variable `${name}` is never used in {}", operation_label(operation))]
    UnusedVariable {
        name: String,
        operation: Option<String>,
    },

    #[error("variable `${name}` of type `{var_type}` used in position expecting `{expected_type}`")]
    VariableTypeMismatch {
        name: String,
        var_type: String,
        expected_type: String,
    },

    #[error("subscription {} must select exactly one top level field", operation_label(operation))]
    SubscriptionNotSingleRootField { operation: Option<String> },

    #[error("subscription {} must not select `__typename` as its root field", operation_label(operation))]
    SubscriptionTypenameRootField { operation: Option<String> },

    #[error("directive `@{name}` is not supported")]
    UnsupportedDirective { name: String },

    #[error("fields `{response_key}` conflict because {reason}")]
    FieldsConflict { response_key: String, reason: String },
}
