//! A [`GraphQLTokenSource`](super::GraphQLTokenSource) that lexes a `&str`.
//!
//! Token payloads borrow from the input (`Cow::Borrowed`), so lexing does
//! not allocate for names, numbers or strings. Ignored tokens (whitespace,
//! line terminators, commas, comments and byte order marks) are skipped.
//! Invalid input produces an `Error` token rather than a panic.
//!
//! ```rust
//! use minigql_parser::token::GraphQLTokenKind;
//! use minigql_parser::token_source::StrGraphQLTokenSource;
//!
//! let kinds: Vec<_> = StrGraphQLTokenSource::new("{ books, # all\n }")
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(kinds, vec![
//!     GraphQLTokenKind::CurlyBraceOpen,
//!     GraphQLTokenKind::name_borrowed("books"),
//!     GraphQLTokenKind::CurlyBraceClose,
//!     GraphQLTokenKind::Eof,
//! ]);
//! ```

use crate::smallvec;
use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::GraphQLErrorNote;
use crate::GraphQLSourceSpan;
use crate::SourcePosition;
use std::path::Path;

pub struct StrGraphQLTokenSource<'src> {
    source: &'src str,

    /// The remaining text to lex is `&source[curr_byte_offset..]`.
    curr_byte_offset: usize,

    curr_line: usize,
    curr_col_utf8: usize,
    curr_col_utf16: usize,

    /// Set after a `\r` so that a following `\n` does not count as a second
    /// line break.
    last_char_was_cr: bool,

    finished: bool,

    file_path: Option<&'src Path>,
}

impl<'src> StrGraphQLTokenSource<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            curr_byte_offset: 0,
            curr_line: 0,
            curr_col_utf8: 0,
            curr_col_utf16: 0,
            last_char_was_cr: false,
            finished: false,
            file_path: None,
        }
    }

    /// Like [`StrGraphQLTokenSource::new`], but every span carries `path`.
    pub fn with_file_path(source: &'src str, path: &'src Path) -> Self {
        Self {
            file_path: Some(path),
            ..Self::new(source)
        }
    }

    // =========================================================================
    // Position and scanning helpers
    // =========================================================================

    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    fn curr_position(&self) -> SourcePosition {
        SourcePosition::new(
            self.curr_line,
            self.curr_col_utf8,
            self.curr_col_utf16,
            self.curr_byte_offset,
        )
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_char_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consumes one character, keeping line and column tracking current.
    /// `\n`, `\r` and `\r\n` each count as one line break.
    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_char()?;

        match ch {
            '\n' if self.last_char_was_cr => {
                self.last_char_was_cr = false;
            },
            '\n' | '\r' => {
                self.curr_line += 1;
                self.curr_col_utf8 = 0;
                self.curr_col_utf16 = 0;
                self.last_char_was_cr = ch == '\r';
            },
            _ => {
                self.curr_col_utf8 += 1;
                self.curr_col_utf16 += ch.len_utf16();
                self.last_char_was_cr = false;
            },
        }

        self.curr_byte_offset += ch.len_utf8();
        Some(ch)
    }

    /// Consumes `text`, which must be a prefix of the remaining input that
    /// contains no line terminators.
    fn consume_within_line(&mut self, text: &str) {
        for ch in text.chars() {
            self.curr_col_utf8 += 1;
            self.curr_col_utf16 += ch.len_utf16();
        }
        self.curr_byte_offset += text.len();
        self.last_char_was_cr = false;
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            self.consume();
        }
    }

    fn make_span(&self, start: SourcePosition) -> GraphQLSourceSpan {
        let end = self.curr_position();
        match self.file_path {
            Some(path) => GraphQLSourceSpan::with_file(start, end, path.to_path_buf()),
            None => GraphQLSourceSpan::new(start, end),
        }
    }

    fn make_token(
        &self,
        kind: GraphQLTokenKind<'src>,
        start: SourcePosition,
    ) -> GraphQLToken<'src> {
        GraphQLToken::new(kind, self.make_span(start))
    }

    fn punctuator(
        &mut self,
        kind: GraphQLTokenKind<'src>,
        start: SourcePosition,
    ) -> GraphQLToken<'src> {
        self.consume();
        self.make_token(kind, start)
    }

    // =========================================================================
    // Lexer main loop
    // =========================================================================

    fn next_token(&mut self) -> GraphQLToken<'src> {
        loop {
            self.skip_ignored();
            let start = self.curr_position();

            return match self.peek_char() {
                None => self.make_token(GraphQLTokenKind::Eof, start),

                Some('#') => {
                    self.skip_comment();
                    continue;
                },

                Some('!') => self.punctuator(GraphQLTokenKind::Bang, start),
                Some('$') => self.punctuator(GraphQLTokenKind::Dollar, start),
                Some('&') => self.punctuator(GraphQLTokenKind::Ampersand, start),
                Some('(') => self.punctuator(GraphQLTokenKind::ParenOpen, start),
                Some(')') => self.punctuator(GraphQLTokenKind::ParenClose, start),
                Some(':') => self.punctuator(GraphQLTokenKind::Colon, start),
                Some('=') => self.punctuator(GraphQLTokenKind::Equals, start),
                Some('@') => self.punctuator(GraphQLTokenKind::At, start),
                Some('[') => self.punctuator(GraphQLTokenKind::SquareBracketOpen, start),
                Some(']') => self.punctuator(GraphQLTokenKind::SquareBracketClose, start),
                Some('{') => self.punctuator(GraphQLTokenKind::CurlyBraceOpen, start),
                Some('}') => self.punctuator(GraphQLTokenKind::CurlyBraceClose, start),
                Some('|') => self.punctuator(GraphQLTokenKind::Pipe, start),

                Some('.') => self.lex_ellipsis(start),
                Some('"') => self.lex_string(start),
                Some(c) if is_name_start(c) => self.lex_name(start),
                Some(c) if c == '-' || c.is_ascii_digit() => self.lex_number(start),
                Some(_) => self.lex_invalid_character(start),
            };
        }
    }

    // =========================================================================
    // Ignored tokens
    // =========================================================================

    /// Skips whitespace, line terminators, commas and BOMs.
    fn skip_ignored(&mut self) {
        self.consume_while(|ch| matches!(ch, ' ' | '\t' | '\n' | '\r' | ',' | '\u{FEFF}'));
    }

    /// Skips a `#` comment up to (not including) the next line terminator.
    fn skip_comment(&mut self) {
        let rest = self.remaining();
        let len = memchr::memchr2(b'\n', b'\r', rest.as_bytes()).unwrap_or(rest.len());
        self.consume_within_line(&rest[..len]);
    }

    // =========================================================================
    // Ellipsis
    // =========================================================================

    /// Lexes `...`. Anything shorter is an error, with a hint when the dots
    /// look like a misspelled spread.
    fn lex_ellipsis(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        if self.remaining().starts_with("...") {
            self.consume_within_line("...");
            return self.make_token(GraphQLTokenKind::Ellipsis, start);
        }

        if self.remaining().starts_with("..") {
            self.consume_within_line("..");
            return self.make_token(
                GraphQLTokenKind::error(
                    "Unexpected `..` (use `...` for spread operator)",
                    smallvec![GraphQLErrorNote::help(
                        "Add one more `.` to form the spread operator `...`",
                    )],
                ),
                start,
            );
        }

        self.consume();
        let notes = if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            smallvec![GraphQLErrorNote::help(
                "Float values must have a digit before the `.` (e.g. `0.5`)",
            )]
        } else {
            smallvec![]
        };
        self.make_token(GraphQLTokenKind::error("Unexpected `.`", notes), start)
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Lexes `/[_A-Za-z][_0-9A-Za-z]*/`. `true`, `false` and `null` get their
    /// own token kinds.
    fn lex_name(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let rest = self.remaining();
        let len = rest
            .bytes()
            .position(|b| !(b == b'_' || b.is_ascii_alphanumeric()))
            .unwrap_or(rest.len());
        let name = &rest[..len];
        self.consume_within_line(name);

        let kind = match name {
            "true" => GraphQLTokenKind::True,
            "false" => GraphQLTokenKind::False,
            "null" => GraphQLTokenKind::Null,
            _ => GraphQLTokenKind::name_borrowed(name),
        };
        self.make_token(kind, start)
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    /// Lexes `-? (0 | [1-9][0-9]*) (\.[0-9]+)? ([eE][+-]?[0-9]+)?`.
    ///
    /// A number directly followed by a name character or `.` is an error,
    /// so `123abc` and `1.2.3` never lex as two tokens.
    fn lex_number(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let num_start = self.curr_byte_offset;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            self.consume();
        }

        match self.peek_char() {
            Some('0') => {
                self.consume();
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    return self.lex_number_error(
                        start,
                        num_start,
                        "Invalid number: leading zeros are not allowed",
                        Some("https://spec.graphql.org/October2021/#sec-Int-Value"),
                    );
                }
            },
            Some(c) if c.is_ascii_digit() => {
                self.consume_while(|c| c.is_ascii_digit());
            },
            _ => {
                return self.make_token(
                    GraphQLTokenKind::error("Unexpected `-`", smallvec![]),
                    start,
                );
            },
        }

        if self.peek_char() == Some('.') {
            if !self.peek_char_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                return self.lex_number_error(
                    start,
                    num_start,
                    "Invalid number: expected a digit after `.`",
                    Some("https://spec.graphql.org/October2021/#sec-Float-Value"),
                );
            }
            is_float = true;
            self.consume();
            self.consume_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_float = true;
            self.consume();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.consume();
            }
            if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                return self.lex_number_error(
                    start,
                    num_start,
                    "Invalid number: exponent must have at least one digit",
                    Some("https://spec.graphql.org/October2021/#sec-Float-Value"),
                );
            }
            self.consume_while(|c| c.is_ascii_digit());
        }

        if self.peek_char().is_some_and(|c| c == '.' || is_name_start(c)) {
            return self.lex_number_error(
                start,
                num_start,
                "Invalid number: a number cannot be directly followed by a name or `.`",
                None,
            );
        }

        let text = &self.source[num_start..self.curr_byte_offset];
        let kind = if is_float {
            GraphQLTokenKind::float_value_borrowed(text)
        } else {
            GraphQLTokenKind::int_value_borrowed(text)
        };
        self.make_token(kind, start)
    }

    fn lex_number_error(
        &mut self,
        start: SourcePosition,
        num_start: usize,
        message: &str,
        spec_url: Option<&str>,
    ) -> GraphQLToken<'src> {
        // Swallow the rest of the malformed literal.
        self.consume_while(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')
        });

        let invalid_text = &self.source[num_start..self.curr_byte_offset];
        let mut error_notes = smallvec![];
        if let Some(url) = spec_url {
            error_notes.push(GraphQLErrorNote::spec(url));
        }
        self.make_token(
            GraphQLTokenKind::error(format!("{message}: `{invalid_text}`"), error_notes),
            start,
        )
    }

    // =========================================================================
    // Strings
    // =========================================================================

    fn lex_string(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let str_start = self.curr_byte_offset;
        if self.remaining().starts_with("\"\"\"") {
            return self.lex_block_string(start, str_start);
        }

        self.consume();
        loop {
            match self.peek_char() {
                None => {
                    let opener = self.make_span(start.clone());
                    return self.make_token(
                        GraphQLTokenKind::error(
                            "Unterminated string literal",
                            smallvec![
                                GraphQLErrorNote::general_with_span("String started here", opener),
                                GraphQLErrorNote::help("Add closing `\"`"),
                            ],
                        ),
                        start,
                    );
                },
                Some('\n' | '\r') => {
                    return self.make_token(
                        GraphQLTokenKind::error(
                            "Unterminated string literal",
                            smallvec![
                                GraphQLErrorNote::general(
                                    "Single-line strings cannot contain unescaped newlines",
                                ),
                                GraphQLErrorNote::help(
                                    "Use a block string (triple quotes) for multi-line \
                                     strings, or escape the newline with `\\n`",
                                ),
                            ],
                        ),
                        start,
                    );
                },
                Some('"') => {
                    self.consume();
                    break;
                },
                Some('\\') => {
                    self.consume();
                    if self.peek_char().is_some_and(|c| c != '\n' && c != '\r') {
                        self.consume();
                    }
                },
                Some(_) => {
                    self.consume();
                },
            }
        }

        let text = &self.source[str_start..self.curr_byte_offset];
        self.make_token(GraphQLTokenKind::string_value_borrowed(text), start)
    }

    fn lex_block_string(
        &mut self,
        start: SourcePosition,
        str_start: usize,
    ) -> GraphQLToken<'src> {
        self.consume_within_line("\"\"\"");

        loop {
            let rest = self.remaining();
            if rest.is_empty() {
                let opener = self.make_span(start.clone());
                return self.make_token(
                    GraphQLTokenKind::error(
                        "Unterminated block string",
                        smallvec![
                            GraphQLErrorNote::general_with_span("Block string started here", opener),
                            GraphQLErrorNote::help("Add closing `\"\"\"`"),
                        ],
                    ),
                    start,
                );
            }
            if rest.starts_with("\\\"\"\"") {
                self.consume_within_line("\\\"\"\"");
            } else if rest.starts_with("\"\"\"") {
                self.consume_within_line("\"\"\"");
                break;
            } else {
                self.consume();
            }
        }

        let text = &self.source[str_start..self.curr_byte_offset];
        self.make_token(GraphQLTokenKind::string_value_borrowed(text), start)
    }

    // =========================================================================
    // Invalid characters
    // =========================================================================

    fn lex_invalid_character(&mut self, start: SourcePosition) -> GraphQLToken<'src> {
        let Some(ch) = self.consume() else {
            return self.make_token(GraphQLTokenKind::Eof, start);
        };

        let mut notes = smallvec![];
        if matches!(ch, '\'' | '\u{201C}' | '\u{201D}') {
            notes.push(GraphQLErrorNote::help("GraphQL strings use double quotes (`\"`)"));
        }
        self.make_token(
            GraphQLTokenKind::error(
                format!("Unexpected character {}", describe_char(ch)),
                notes,
            ),
            start,
        )
    }
}

impl<'src> Iterator for StrGraphQLTokenSource<'src> {
    type Item = GraphQLToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        if matches!(token.kind, GraphQLTokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

/// Printable characters render as `` `c` ``; invisible ones also show their
/// code point so that e.g. a stray zero-width space is identifiable.
fn describe_char(ch: char) -> String {
    if ch.is_control() || (ch.is_whitespace() && ch != ' ') || is_invisible_format_char(ch) {
        format!("`{}` (U+{:04X})", ch.escape_default(), ch as u32)
    } else {
        format!("`{ch}`")
    }
}

fn is_invisible_format_char(ch: char) -> bool {
    matches!(ch, '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}')
}
