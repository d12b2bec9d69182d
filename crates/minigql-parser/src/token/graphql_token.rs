use crate::token::GraphQLTokenKind;
use crate::GraphQLSourceSpan;

/// A lexed token with its source span.
///
/// Comments, commas and whitespace are ignored tokens in GraphQL and never
/// surface here.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphQLToken<'src> {
    pub kind: GraphQLTokenKind<'src>,
    pub span: GraphQLSourceSpan,
}

impl<'src> GraphQLToken<'src> {
    pub fn new(kind: GraphQLTokenKind<'src>, span: GraphQLSourceSpan) -> Self {
        Self { kind, span }
    }
}
