use crate::ast;
use crate::execution::FieldError;
use crate::execution::PathSegment;
use crate::execution::RequestError;
use crate::validation::ValidationError;
use minigql_parser::GraphQLParseError;
use serde::Serialize;

/// One entry of a response's `errors` list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphQLError {
    pub message: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    /// Only field errors have a path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: None,
        }
    }
}

impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        if let Some(location) = self.locations.first() {
            write!(f, " at {}:{}", location.line, location.column)?;
        }
        if let Some(path) = &self.path {
            let path: Vec<_> = path.iter().map(ToString::to_string).collect();
            write!(f, " (path: {})", path.join("."))?;
        }
        Ok(())
    }
}

/// A 1-based position in the request document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<ast::AstPos> for Location {
    fn from(pos: ast::AstPos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl From<&GraphQLParseError> for GraphQLError {
    fn from(err: &GraphQLParseError) -> Self {
        Self {
            message: format!("syntax error: {}", err.message()),
            locations: vec![err.location().into()],
            path: None,
        }
    }
}

impl From<&ValidationError> for GraphQLError {
    fn from(err: &ValidationError) -> Self {
        Self {
            message: err.message(),
            locations: err.locations().iter().copied().map(Location::from).collect(),
            path: None,
        }
    }
}

impl From<RequestError> for GraphQLError {
    fn from(err: RequestError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<FieldError> for GraphQLError {
    fn from(err: FieldError) -> Self {
        Self {
            message: err.message,
            locations: err.locations.into_iter().map(Location::from).collect(),
            path: Some(err.path),
        }
    }
}
