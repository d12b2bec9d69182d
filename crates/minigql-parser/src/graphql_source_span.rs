use crate::SourcePosition;
use std::path::PathBuf;

/// A half-open `[start_inclusive, end_exclusive)` span of source text,
/// optionally tagged with the file it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphQLSourceSpan {
    pub start_inclusive: SourcePosition,
    pub end_exclusive: SourcePosition,
    pub file_path: Option<PathBuf>,
}

impl GraphQLSourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
            file_path: None,
        }
    }

    pub fn with_file(
        start: SourcePosition,
        end: SourcePosition,
        file_path: PathBuf,
    ) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
            file_path: Some(file_path),
        }
    }

    /// Number of source bytes covered by this span.
    pub fn byte_len(&self) -> usize {
        self.end_exclusive
            .byte_offset()
            .saturating_sub(self.start_inclusive.byte_offset())
    }
}
