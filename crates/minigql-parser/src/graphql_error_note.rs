use crate::GraphQLSourceSpan;
use crate::SmallVec;

/// How an error note is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphQLErrorNoteKind {
    /// Rendered as `= note: ...`. Example: "opening `{` here".
    General,

    /// Rendered as `= help: ...`. An actionable suggestion.
    Help,

    /// Rendered as `= spec: ...`. A link into the GraphQL specification.
    Spec,
}

/// Extra context attached to a lexer or parser error, optionally pointing
/// at a related location (e.g. where a delimiter was opened).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLErrorNote {
    pub kind: GraphQLErrorNoteKind,
    pub message: String,
    pub span: Option<GraphQLSourceSpan>,
}

impl GraphQLErrorNote {
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            kind: GraphQLErrorNoteKind::General,
            message: message.into(),
            span: None,
        }
    }

    pub fn general_with_span(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
    ) -> Self {
        Self {
            kind: GraphQLErrorNoteKind::General,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn help(message: impl Into<String>) -> Self {
        Self {
            kind: GraphQLErrorNoteKind::Help,
            message: message.into(),
            span: None,
        }
    }

    pub fn spec(url: impl Into<String>) -> Self {
        Self {
            kind: GraphQLErrorNoteKind::Spec,
            message: url.into(),
            span: None,
        }
    }
}

/// Most errors carry zero to two notes, so these live inline.
pub type GraphQLErrorNotes = SmallVec<[GraphQLErrorNote; 2]>;
