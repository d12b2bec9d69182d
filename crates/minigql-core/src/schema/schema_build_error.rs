use crate::OperationKind;
use crate::loc;
use std::path::PathBuf;

/// Why a [`SchemaBuilder`](crate::schema::SchemaBuilder) refused to load SDL
/// or build a schema. Building stops at the first problem.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SchemaBuildError {
    #[error("multiple `schema` definitions ({location})")]
    DuplicateSchemaDefinition { location: loc::SourceLocation },

    #[error("type `{type_name}` is defined twice ({def1} and {def2})")]
    DuplicateTypeDefinition {
        type_name: String,
        def1: loc::SourceLocation,
        def2: loc::SourceLocation,
    },

    #[error("field `{type_name}.{field_name}` is defined twice ({def1} and {def2})")]
    DuplicateFieldDefinition {
        type_name: String,
        field_name: String,
        def1: loc::SourceLocation,
        def2: loc::SourceLocation,
    },

    #[error("argument `{parameter_name}` of `{type_name}.{field_name}` is defined twice ({location})")]
    DuplicateParameterDefinition {
        type_name: String,
        field_name: String,
        parameter_name: String,
        location: loc::SourceLocation,
    },

    #[error("enum value `{type_name}.{value_name}` is defined twice ({location})")]
    DuplicateEnumValueDefinition {
        type_name: String,
        value_name: String,
        location: loc::SourceLocation,
    },

    #[error("enum `{type_name}` has no values ({location})")]
    EmptyEnumType {
        type_name: String,
        location: loc::SourceLocation,
    },

    #[error("`{name}` starts with `__`, which is reserved for introspection ({location})")]
    InvalidDunderPrefixedName {
        name: String,
        location: loc::SourceLocation,
    },

    #[error("type `{type_name}` referenced by `{referenced_by}` is not defined ({location})")]
    UndefinedTypeReference {
        type_name: String,
        referenced_by: String,
        location: loc::SourceLocation,
    },

    #[error("`{parameter}` has object type `{type_name}`, which cannot be used as an input ({location})")]
    OutputTypeUsedAsInput {
        type_name: String,
        parameter: String,
        location: loc::SourceLocation,
    },

    #[error("invalid default value for `{parameter}`: {reason}")]
    InvalidDefaultValue { parameter: String, reason: String },

    #[error("no `Query` root type is defined")]
    NoQueryOperationTypeDefined,

    #[error("{operation} root type `{type_name}` named by the schema definition is not defined ({location})")]
    UndefinedRootType {
        operation: OperationKind,
        type_name: String,
        location: loc::SourceLocation,
    },

    #[error("{operation} root type `{type_name}` must be an object type")]
    RootTypeNotObject {
        operation: OperationKind,
        type_name: String,
    },

    #[error("{operation} root type `{type_name}` must declare at least one field")]
    EmptyRootType {
        operation: OperationKind,
        type_name: String,
    },

    #[error("resolver bound to `{type_name}.{field_name}`, which is not a field of an object type")]
    ResolverForUndefinedField {
        type_name: String,
        field_name: String,
    },

    #[error("more than one resolver bound to `{type_name}.{field_name}`")]
    DuplicateResolverBinding {
        type_name: String,
        field_name: String,
    },

    #[error("subscription field `{type_name}.{field_name}` has no event stream resolver")]
    MissingStreamResolver {
        type_name: String,
        field_name: String,
    },

    #[error("event stream resolver bound to `{type_name}.{field_name}`, which is not a subscription root field")]
    StreamResolverOutsideSubscriptionRoot {
        type_name: String,
        field_name: String,
    },

    #[error("{kind} is not supported{} ({location})", name.as_ref().map(|n| format!(": `{n}`")).unwrap_or_default())]
    UnsupportedDefinition {
        kind: &'static str,
        name: Option<String>,
        location: loc::SourceLocation,
    },

    #[error("schema parse error{}: {err}", file.as_ref().map(|f| format!(" in {}", f.display())).unwrap_or_default())]
    ParseError {
        file: Option<PathBuf>,
        err: String,
    },

    #[error("failed to read schema file {}: {err}", path.display())]
    FileReadError { path: PathBuf, err: String },
}
