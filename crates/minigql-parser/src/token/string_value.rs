//! Unescaping of string literal source text.

use crate::GraphQLStringParsingError;
use std::iter::Peekable;
use std::str::Chars;

pub(super) fn unescape(raw: &str) -> Result<String, GraphQLStringParsingError> {
    if raw.starts_with("\"\"\"") {
        unescape_block_string(raw)
    } else {
        unescape_single_line_string(raw)
    }
}

fn unescape_single_line_string(raw: &str) -> Result<String, GraphQLStringParsingError> {
    if raw.len() < 2 || !raw.starts_with('"') || !raw.ends_with('"') {
        return Err(GraphQLStringParsingError::UnterminatedString);
    }
    let content = &raw[1..raw.len() - 1];

    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('/') => result.push('/'),
            Some('b') => result.push('\u{0008}'),
            Some('f') => result.push('\u{000C}'),
            Some('u') => result.push(unescape_unicode(&mut chars)?),
            Some(other) => {
                return Err(GraphQLStringParsingError::InvalidEscapeSequence(
                    format!("\\{other}"),
                ));
            },
            None => {
                return Err(GraphQLStringParsingError::InvalidEscapeSequence(
                    "\\".to_string(),
                ));
            },
        }
    }

    Ok(result)
}

/// Decodes the remainder of a `\u` escape. A fixed-width leading surrogate
/// must be followed by a fixed-width `\uXXXX` trailing surrogate, and the
/// pair decodes to one scalar value.
fn unescape_unicode(chars: &mut Peekable<Chars>) -> Result<char, GraphQLStringParsingError> {
    let (value, display, braced) = read_unicode_escape(chars)?;
    if let Some(c) = char::from_u32(value) {
        return Ok(c);
    }
    if braced || !(0xD800..=0xDBFF).contains(&value) {
        return Err(GraphQLStringParsingError::InvalidUnicodeEscape(display));
    }

    let mut lookahead = chars.clone();
    if lookahead.next() != Some('\\')
        || lookahead.next() != Some('u')
        || lookahead.peek() == Some(&'{')
    {
        return Err(GraphQLStringParsingError::InvalidUnicodeEscape(display));
    }
    let (trailing, trailing_display, _) = read_unicode_escape(&mut lookahead)?;
    if !(0xDC00..=0xDFFF).contains(&trailing) {
        return Err(GraphQLStringParsingError::InvalidUnicodeEscape(
            format!("{display}{trailing_display}"),
        ));
    }
    *chars = lookahead;
    let combined = 0x10000 + ((value - 0xD800) << 10) + (trailing - 0xDC00);
    char::from_u32(combined).ok_or(GraphQLStringParsingError::InvalidUnicodeEscape(
        format!("{display}{trailing_display}"),
    ))
}

/// Reads `XXXX` or `{X...}` after a `\u`. Returns the code point, the
/// escape as written, and whether it was braced.
fn read_unicode_escape(
    chars: &mut Peekable<Chars>,
) -> Result<(u32, String, bool), GraphQLStringParsingError> {
    let mut hex = String::new();
    let braced = chars.peek() == Some(&'{');
    if braced {
        chars.next();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) => {
                    return Err(GraphQLStringParsingError::InvalidUnicodeEscape(
                        format!("\\u{{{hex}{c}"),
                    ));
                },
                None => {
                    return Err(GraphQLStringParsingError::InvalidUnicodeEscape(
                        format!("\\u{{{hex}"),
                    ));
                },
            }
        }
    } else {
        for _ in 0..4 {
            match chars.next() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) => {
                    return Err(GraphQLStringParsingError::InvalidUnicodeEscape(
                        format!("\\u{hex}{c}"),
                    ));
                },
                None => {
                    return Err(GraphQLStringParsingError::InvalidUnicodeEscape(
                        format!("\\u{hex}"),
                    ));
                },
            }
        }
    }

    let display = if braced {
        format!("\\u{{{hex}}}")
    } else {
        format!("\\u{hex}")
    };
    if hex.is_empty() || hex.len() > 8 {
        return Err(GraphQLStringParsingError::InvalidUnicodeEscape(display));
    }
    match u32::from_str_radix(&hex, 16) {
        Ok(value) => Ok((value, display, braced)),
        Err(_) => Err(GraphQLStringParsingError::InvalidUnicodeEscape(display)),
    }
}

/// Applies the `BlockStringValue()` algorithm: strip the common indentation
/// of all lines but the first, then drop leading and trailing blank lines.
fn unescape_block_string(raw: &str) -> Result<String, GraphQLStringParsingError> {
    if raw.len() < 6 || !raw.ends_with("\"\"\"") {
        return Err(GraphQLStringParsingError::UnterminatedString);
    }
    let content = raw[3..raw.len() - 3].replace("\\\"\"\"", "\"\"\"");

    let lines: Vec<&str> = split_lines(&content);
    let indent_of = |line: &str| line.len() - line.trim_start_matches([' ', '\t']).len();
    let is_blank = |line: &str| line.chars().all(|c| c == ' ' || c == '\t');

    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !is_blank(line))
        .map(|line| indent_of(line))
        .min()
        .unwrap_or(0);

    let mut stripped: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.len() < common_indent {
                *line
            } else {
                &line[common_indent..]
            }
        })
        .collect();

    while stripped.first().is_some_and(|l| is_blank(l)) {
        stripped.remove(0);
    }
    while stripped.last().is_some_and(|l| is_blank(l)) {
        stripped.pop();
    }

    Ok(stripped.join("\n"))
}

/// Splits on `\r\n`, `\n` and `\r`, keeping empty lines.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            },
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            },
            _ => {},
        }
        i += 1;
    }
    lines.push(&text[start..]);
    lines
}
