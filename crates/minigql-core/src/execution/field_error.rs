use crate::ast;
use serde::Serialize;

/// A field that failed to resolve or produced a value its type rejects.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    pub message: String,
    pub locations: Vec<ast::AstPos>,
    /// Response path of the failed field, e.g. `["books", 1, "title"]`.
    pub path: Vec<PathSegment>,
}

/// One step of a response path: an object key or a list index.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}
