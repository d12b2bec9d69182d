mod enum_type;
mod field;
mod graphql_type;
mod graphql_type_kind;
mod list_type_annotation;
mod named_type_annotation;
mod object_type;
mod parameter;
mod scalar_type;
mod type_annotation;

pub use enum_type::EnumType;
pub use enum_type::EnumValue;
pub use field::Field;
pub use field::FieldResolverBinding;
pub use graphql_type::GraphQLType;
pub use graphql_type_kind::GraphQLTypeKind;
pub use list_type_annotation::ListTypeAnnotation;
pub use named_type_annotation::NamedTypeAnnotation;
pub use object_type::ObjectType;
pub use parameter::Parameter;
pub use scalar_type::ScalarType;
pub use type_annotation::TypeAnnotation;

#[cfg(test)]
mod tests;
