use crate::loc;
use crate::resolver::FieldResolver;
use crate::resolver::StreamResolver;
use crate::types::Parameter;
use crate::types::TypeAnnotation;
use indexmap::IndexMap;
use std::sync::Arc;

/// How a field gets its value.
#[derive(Clone, Default)]
pub enum FieldResolverBinding {
    /// Look up the field name as a property of the parent JSON object.
    #[default]
    Default,

    /// The type's name; only used by `__typename`.
    TypeName,

    Value(Arc<dyn FieldResolver>),

    /// An event stream. Only valid on subscription root fields.
    Stream(Arc<dyn StreamResolver>),
}

impl std::fmt::Debug for FieldResolverBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Default => "Default",
            Self::TypeName => "TypeName",
            Self::Value(_) => "Value(..)",
            Self::Stream(_) => "Stream(..)",
        })
    }
}

/// A field of an [`ObjectType`](crate::types::ObjectType).
#[derive(Clone, Debug)]
pub struct Field {
    pub(crate) def_location: loc::SourceLocation,
    pub(crate) description: Option<String>,
    pub(crate) name: String,
    pub(crate) parameters: IndexMap<String, Parameter>,
    pub(crate) resolver: FieldResolverBinding,
    pub(crate) type_annotation: TypeAnnotation,
}

impl Field {
    pub(crate) fn typename() -> Self {
        Self {
            def_location: loc::SourceLocation::Builtin,
            description: None,
            name: "__typename".to_string(),
            parameters: IndexMap::new(),
            resolver: FieldResolverBinding::TypeName,
            type_annotation: TypeAnnotation::named("String", false),
        }
    }

    pub fn def_location(&self) -> &loc::SourceLocation {
        &self.def_location
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_typename(&self) -> bool {
        matches!(self.resolver, FieldResolverBinding::TypeName)
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Arguments in declaration order.
    pub fn parameters(&self) -> &IndexMap<String, Parameter> {
        &self.parameters
    }

    pub fn resolver(&self) -> &FieldResolverBinding {
        &self.resolver
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }
}
