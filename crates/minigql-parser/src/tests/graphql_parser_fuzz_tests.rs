//! Property tests: arbitrary input never panics the lexer or parser.

use crate::GraphQLParser;
use crate::token_source::StrGraphQLTokenSource;
use proptest::prelude::*;

proptest! {
    /// Any string either parses or yields an error with a sane location.
    #[test]
    fn parser_never_panics(source in "\\PC{0,200}") {
        if let Err(err) = GraphQLParser::new(&source).parse_executable_document() {
            prop_assert!(err.location().line >= 1);
            prop_assert!(err.byte_offset() <= source.len());
        }
    }

    /// Inputs assembled from GraphQL-ish fragments exercise deeper paths than
    /// random text.
    #[test]
    fn parser_never_panics_on_token_soup(
        parts in prop::collection::vec(
            prop::sample::select(vec![
                "{", "}", "(", ")", "[", "]", ":", "$", "@", "!", "=", "...",
                "query", "mutation", "fragment", "on", "a", "1", "-2.5", "\"s\"",
                "\"\"\"b\"\"\"", "true", "null", "#c\n", ",", "\n",
            ]),
            0..60,
        ),
    ) {
        let source = parts.join(" ");
        let _ = GraphQLParser::new(&source).parse_executable_document();
    }

    /// The lexer always terminates with exactly one `Eof`.
    #[test]
    fn lexer_ends_with_single_eof(source in "\\PC{0,200}") {
        let tokens: Vec<_> = StrGraphQLTokenSource::new(&source).collect();
        let eofs = tokens
            .iter()
            .filter(|t| matches!(t.kind, crate::token::GraphQLTokenKind::Eof))
            .count();
        prop_assert_eq!(eofs, 1);
        prop_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(crate::token::GraphQLTokenKind::Eof),
        ));
    }
}
