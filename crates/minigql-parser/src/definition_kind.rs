/// The kind of top-level definition the parser ran into.
///
/// Only [`DefinitionKind::Operation`] and [`DefinitionKind::Fragment`] are
/// accepted in executable documents; the rest are reported through
/// [`GraphQLParseErrorKind::WrongDocumentKind`](crate::GraphQLParseErrorKind::WrongDocumentKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// `schema { ... }` or any `extend ...`
    Schema,

    /// `type`, `interface`, `union`, `enum`, `scalar` or `input`
    TypeDefinition,

    /// `directive @name on ...`
    DirectiveDefinition,

    Operation,

    Fragment,
}

impl DefinitionKind {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Schema => "schema definition",
            Self::TypeDefinition => "type definition",
            Self::DirectiveDefinition => "directive definition",
            Self::Operation => "operation definition",
            Self::Fragment => "fragment definition",
        }
    }
}
