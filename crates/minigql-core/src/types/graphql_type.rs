use crate::loc;
use crate::types::EnumType;
use crate::types::GraphQLTypeKind;
use crate::types::ObjectType;
use crate::types::ScalarType;
use std::sync::Arc;

static BUILTIN_LOCATION: loc::SourceLocation = loc::SourceLocation::Builtin;

/// A named type registered in a [`Schema`](crate::schema::Schema).
#[derive(Clone, Debug)]
pub enum GraphQLType {
    Bool,
    Enum(EnumType),
    Float,
    ID,
    Int,
    Object(Arc<ObjectType>),
    Scalar(ScalarType),
    String,
}

impl GraphQLType {
    pub fn as_enum(&self) -> Option<&EnumType> {
        if let Self::Enum(type_) = self {
            Some(type_)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        if let Self::Object(type_) = self {
            Some(type_)
        } else {
            None
        }
    }

    pub fn def_location(&self) -> &loc::SourceLocation {
        match self {
            Self::Bool | Self::Float | Self::ID | Self::Int | Self::String => {
                &BUILTIN_LOCATION
            },
            Self::Enum(type_) => type_.def_location(),
            Self::Object(type_) => type_.def_location(),
            Self::Scalar(type_) => type_.def_location(),
        }
    }

    /// Whether values of this type may appear in arguments and variables.
    pub fn is_input_type(&self) -> bool {
        !matches!(self, Self::Object(_))
    }

    /// Scalars and enums; these never take a sub-selection.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Object(_))
    }

    pub fn kind(&self) -> GraphQLTypeKind {
        self.into()
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bool => "Boolean",
            Self::Enum(type_) => type_.name(),
            Self::Float => "Float",
            Self::ID => "ID",
            Self::Int => "Int",
            Self::Object(type_) => type_.name(),
            Self::Scalar(type_) => type_.name(),
            Self::String => "String",
        }
    }
}
