use crate::types::ListTypeAnnotation;
use crate::types::NamedTypeAnnotation;
use graphql_parser::query::Type as AstType;

/// The declared type of a field, argument or variable: a named type wrapped
/// in any number of list and non-null modifiers.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotation {
    List(ListTypeAnnotation),
    Named(NamedTypeAnnotation),
}

impl TypeAnnotation {
    pub fn named(type_name: impl Into<String>, nullable: bool) -> Self {
        Self::Named(NamedTypeAnnotation {
            nullable,
            type_name: type_name.into(),
        })
    }

    pub fn list(inner: TypeAnnotation, nullable: bool) -> Self {
        Self::List(ListTypeAnnotation {
            inner_type_ref: Box::new(inner),
            nullable,
        })
    }

    /// Converts a parsed type reference (from SDL or from a variable
    /// definition).
    pub fn from_ast_type(ast_type: &AstType<'_, String>) -> Self {
        Self::from_ast_type_impl(ast_type, /* nullable = */ true)
    }

    fn from_ast_type_impl(ast_type: &AstType<'_, String>, nullable: bool) -> Self {
        match ast_type {
            AstType::ListType(inner) => Self::list(Self::from_ast_type_impl(inner, true), nullable),
            AstType::NamedType(name) => Self::named(name.clone(), nullable),
            AstType::NonNullType(inner) => Self::from_ast_type_impl(inner, false),
        }
    }

    pub fn as_list_annotation(&self) -> Option<&ListTypeAnnotation> {
        if let Self::List(annot) = self {
            Some(annot)
        } else {
            None
        }
    }

    pub fn as_named_annotation(&self) -> Option<&NamedTypeAnnotation> {
        if let Self::Named(annot) = self {
            Some(annot)
        } else {
            None
        }
    }

    /// Recursively unwrap list wrappers and return the inner-most
    /// [`NamedTypeAnnotation`].
    pub fn innermost_named_type_annotation(&self) -> &NamedTypeAnnotation {
        match self {
            Self::List(ListTypeAnnotation { inner_type_ref, .. }) => {
                inner_type_ref.innermost_named_type_annotation()
            },
            Self::Named(named_annot) => named_annot,
        }
    }

    pub fn innermost_type_name(&self) -> &str {
        self.innermost_named_type_annotation().graphql_type_name()
    }

    pub fn nullable(&self) -> bool {
        match self {
            Self::List(ListTypeAnnotation { nullable, .. }) => *nullable,
            Self::Named(NamedTypeAnnotation { nullable, .. }) => *nullable,
        }
    }

    /// This annotation with the outermost non-null modifier removed.
    pub fn to_nullable(&self) -> Self {
        let mut annot = self.clone();
        match &mut annot {
            Self::List(list) => list.nullable = true,
            Self::Named(named) => named.nullable = true,
        }
        annot
    }

    /// Whether a variable declared with this type may be used where
    /// `location` is expected.
    ///
    /// A non-null variable fits a nullable position but not the reverse;
    /// list depth and the named type must match exactly.
    pub fn is_usable_as(&self, location: &TypeAnnotation) -> bool {
        if !location.nullable() && self.nullable() {
            return false;
        }
        match (self, location) {
            (Self::List(var_list), Self::List(loc_list)) => var_list
                .inner_type_annotation()
                .is_usable_as(loc_list.inner_type_annotation()),
            (Self::Named(var_named), Self::Named(loc_named)) => {
                var_named.graphql_type_name() == loc_named.graphql_type_name()
            },
            _ => false,
        }
    }
}

impl std::convert::From<ListTypeAnnotation> for TypeAnnotation {
    fn from(value: ListTypeAnnotation) -> Self {
        Self::List(value)
    }
}

impl std::convert::From<NamedTypeAnnotation> for TypeAnnotation {
    fn from(value: NamedTypeAnnotation) -> Self {
        Self::Named(value)
    }
}

impl std::fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(list_annot) => write!(
                f,
                "[{}]{}",
                list_annot.inner_type_annotation(),
                if list_annot.nullable() { "" } else { "!" },
            ),

            Self::Named(named_annot) => write!(
                f,
                "{}{}",
                named_annot.graphql_type_name(),
                if named_annot.nullable() { "" } else { "!" },
            ),
        }
    }
}
