use crate::token::GraphQLToken;

/// Anything that yields [`GraphQLToken`]s, ending with a single `Eof`.
///
/// The parser is generic over this so tests can feed it hand-built token
/// sequences.
pub trait GraphQLTokenSource<'src>: Iterator<Item = GraphQLToken<'src>> {}

impl<'src, T> GraphQLTokenSource<'src> for T
where
    T: Iterator<Item = GraphQLToken<'src>>,
{}
