use crate::ast::AstPos;
use std::path::PathBuf;

/// Where a schema element was defined.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceLocation {
    /// Built-in scalars and the implicit `__typename` field.
    Builtin,

    /// A position within SDL text, and the file it was loaded from (if any).
    Sdl {
        file: Option<PathBuf>,
        position: AstPos,
    },
}

impl SourceLocation {
    pub(crate) fn sdl(file: Option<&PathBuf>, position: AstPos) -> Self {
        Self::Sdl {
            file: file.cloned(),
            position,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => write!(f, "<builtin>"),
            Self::Sdl { file, position } => write!(
                f,
                "{}:{}:{}",
                file.as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<schema>".to_string()),
                position.line,
                position.column,
            ),
        }
    }
}
