use crate::ast::AstPos;

/// A position within GraphQL source text.
///
/// All values are 0-based:
/// - `line`: 0 is the first line of the document
/// - `col_utf8`: characters (not bytes) from the start of the line
/// - `col_utf16`: UTF-16 code units from the start of the line
/// - `byte_offset`: bytes from the start of the document
///
/// For ASCII text both columns are equal. Characters outside the Basic
/// Multilingual Plane (e.g. emoji) advance `col_utf8` by 1 and `col_utf16`
/// by 2.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourcePosition {
    line: usize,
    col_utf8: usize,
    col_utf16: usize,
    byte_offset: usize,
}

impl SourcePosition {
    pub fn new(
        line: usize,
        col_utf8: usize,
        col_utf16: usize,
        byte_offset: usize,
    ) -> Self {
        Self {
            line,
            col_utf8,
            col_utf16,
            byte_offset,
        }
    }

    /// The 0-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The 0-based character column within the current line.
    pub fn col_utf8(&self) -> usize {
        self.col_utf8
    }

    /// The 0-based UTF-16 code unit column within the current line.
    ///
    /// Prefer this one when talking to LSP-style tooling.
    pub fn col_utf16(&self) -> usize {
        self.col_utf16
    }

    /// The 0-based byte offset from the start of the document.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Converts to the 1-based line/column pair stored on AST nodes and
    /// reported in response `locations`.
    pub fn to_ast_pos(&self) -> AstPos {
        AstPos {
            line: self.line + 1,
            column: self.col_utf8 + 1,
        }
    }
}
