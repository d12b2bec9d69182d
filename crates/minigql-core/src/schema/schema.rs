use crate::OperationKind;
use crate::types::Field;
use crate::types::GraphQLType;
use crate::types::ObjectType;
use indexmap::IndexMap;
use std::sync::Arc;

/// Every named type of a schema, built-in scalars first and then in
/// definition order.
pub type TypesMap = IndexMap<String, GraphQLType>;

/// An immutable, validated schema with its resolver bindings.
///
/// Build one with [`SchemaBuilder`](crate::schema::SchemaBuilder) and share
/// it as `Arc<Schema>`; nothing in it changes after construction.
#[derive(Debug)]
pub struct Schema {
    pub(crate) types: TypesMap,
    pub(crate) query_type: Arc<ObjectType>,
    pub(crate) mutation_type: Option<Arc<ObjectType>>,
    pub(crate) subscription_type: Option<Arc<ObjectType>>,
}

impl Schema {
    pub fn lookup_type(&self, name: &str) -> Option<&GraphQLType> {
        self.types.get(name)
    }

    pub fn lookup_object_type(&self, name: &str) -> Option<&ObjectType> {
        self.lookup_type(name).and_then(GraphQLType::as_object)
    }

    /// The field `field_name` of object type `type_name`, including the
    /// implicit `__typename`.
    pub fn lookup_field(&self, type_name: &str, field_name: &str) -> Option<&Field> {
        self.lookup_object_type(type_name)
            .and_then(|type_| type_.field(field_name))
    }

    pub fn query_type(&self) -> &ObjectType {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&ObjectType> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type(&self) -> Option<&ObjectType> {
        self.subscription_type.as_deref()
    }

    /// The root type for `kind`, if the schema supports that operation type.
    pub fn root_type(&self, kind: OperationKind) -> Option<&ObjectType> {
        match kind {
            OperationKind::Query => Some(self.query_type()),
            OperationKind::Mutation => self.mutation_type(),
            OperationKind::Subscription => self.subscription_type(),
        }
    }

    pub fn types(&self) -> &TypesMap {
        &self.types
    }
}
