use crate::schema::Schema;
use crate::types::GraphQLType;

#[derive(Clone, Debug, PartialEq)]
pub struct NamedTypeAnnotation {
    pub(super) nullable: bool,
    pub(super) type_name: String,
}

impl NamedTypeAnnotation {
    /// `None` only if the name is not registered in `schema`, which a built
    /// schema rules out for its own annotations.
    pub fn graphql_type<'schema>(&self, schema: &'schema Schema) -> Option<&'schema GraphQLType> {
        schema.lookup_type(&self.type_name)
    }

    pub fn graphql_type_name(&self) -> &str {
        self.type_name.as_str()
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }
}
