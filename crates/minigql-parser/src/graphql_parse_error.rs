use crate::ast::AstPos;
use crate::GraphQLErrorNote;
use crate::GraphQLErrorNoteKind;
use crate::GraphQLErrorNotes;
use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;

/// A parse error with location information and contextual notes.
///
/// Parsing stops at the first error, so a failed parse yields exactly one of
/// these.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct GraphQLParseError {
    /// Human-readable primary message, e.g. "expected `:`, found `1`".
    message: String,

    /// Where the error was detected:
    /// - the offending token for "unexpected token" errors
    /// - where the closing delimiter was expected for unclosed delimiters
    span: GraphQLSourceSpan,

    kind: GraphQLParseErrorKind,

    notes: GraphQLErrorNotes,
}

impl GraphQLParseError {
    pub fn new(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
        kind: GraphQLParseErrorKind,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: GraphQLErrorNotes::new(),
        }
    }

    /// Converts a lexer error token into a parse error, keeping the lexer's
    /// message and notes.
    pub fn from_lexer_error(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
        lexer_notes: GraphQLErrorNotes,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind: GraphQLParseErrorKind::LexerError,
            notes: lexer_notes,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> &GraphQLSourceSpan {
        &self.span
    }

    pub fn kind(&self) -> &GraphQLParseErrorKind {
        &self.kind
    }

    pub fn notes(&self) -> &GraphQLErrorNotes {
        &self.notes
    }

    /// 1-based line/column of the error, as reported in response
    /// `locations`.
    pub fn location(&self) -> AstPos {
        self.span.start_inclusive.to_ast_pos()
    }

    /// 0-based byte offset of the error within the document.
    pub fn byte_offset(&self) -> usize {
        self.span.start_inclusive.byte_offset()
    }

    pub fn add_note(&mut self, message: impl Into<String>) {
        self.notes.push(GraphQLErrorNote::general(message));
    }

    pub fn add_note_with_span(
        &mut self,
        message: impl Into<String>,
        span: GraphQLSourceSpan,
    ) {
        self.notes.push(GraphQLErrorNote::general_with_span(message, span));
    }

    pub fn add_help(&mut self, message: impl Into<String>) {
        self.notes.push(GraphQLErrorNote::help(message));
    }

    pub fn add_spec(&mut self, url: impl Into<String>) {
        self.notes.push(GraphQLErrorNote::spec(url));
    }

    /// Formats this error as a multi-line diagnostic for terminal output.
    ///
    /// ```text
    /// error: expected `:`, found `1`
    ///   --> query.graphql:1:17
    ///    |
    ///  1 | query { user(id 1) }
    ///    |                 ^
    /// ```
    ///
    /// Snippets are omitted when `source` is `None`.
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        let mut output = String::new();

        output.push_str("error: ");
        output.push_str(&self.message);
        output.push('\n');

        let pos = self.location();
        output.push_str(&format!(
            "  --> {}:{}:{}\n",
            self.file_name(),
            pos.line,
            pos.column,
        ));

        if let Some(src) = source
            && let Some(snippet) = Self::format_snippet(src, &self.span, '^')
        {
            output.push_str(&snippet);
        }

        for note in &self.notes {
            let prefix = match note.kind {
                GraphQLErrorNoteKind::General => "note",
                GraphQLErrorNoteKind::Help => "help",
                GraphQLErrorNoteKind::Spec => "spec",
            };
            output.push_str(&format!("   = {prefix}: {}\n", note.message));

            if let (Some(note_span), Some(src)) = (&note.span, source)
                && let Some(snippet) = Self::format_snippet(src, note_span, '-')
            {
                output.push_str(&snippet);
            }
        }

        output
    }

    /// Formats this error on a single line:
    /// `<input>:1:17: error: expected `:`, found `1``
    pub fn format_oneline(&self) -> String {
        let pos = self.location();
        format!(
            "{}:{}:{}: error: {}",
            self.file_name(),
            pos.line,
            pos.column,
            self.message,
        )
    }

    fn file_name(&self) -> String {
        self.span
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<input>".to_string())
    }

    fn format_snippet(
        source: &str,
        span: &GraphQLSourceSpan,
        marker: char,
    ) -> Option<String> {
        let line_num = span.start_inclusive.line();
        let line_content = source.lines().nth(line_num)?;
        let display_line_num = line_num + 1;
        let width = display_line_num.to_string().len().max(2);

        let col_start = span.start_inclusive.col_utf8();
        let col_end = if span.end_exclusive.line() == line_num {
            span.end_exclusive.col_utf8()
        } else {
            col_start + 1
        };
        let underline_len = col_end.saturating_sub(col_start).max(1);

        let mut output = String::new();
        output.push_str(&format!("{:>width$} |\n", ""));
        output.push_str(&format!("{display_line_num:>width$} | {line_content}\n"));
        output.push_str(&format!(
            "{:>width$} | {:>col_start$}{}\n",
            "",
            "",
            marker.to_string().repeat(underline_len),
        ));
        Some(output)
    }
}
