//! Comment stripping and separator validation, run before any expansion.

use crate::error::ShellError;
use crate::lexer;

/// Cut the line at the first comment.
///
/// A `#` starts a comment at the very beginning of the line or right after a
/// space, tab or `;`. Returns `None` when the whole line is a comment, so the
/// caller can skip it without touching the command counter.
pub fn strip_comment(line: &str) -> Option<&str> {
    let mut prev = None;
    for (i, c) in line.char_indices() {
        if c == '#' {
            match prev {
                None => return None,
                Some(' ' | '\t' | ';') => return Some(&line[..i]),
                _ => {}
            }
        }
        prev = Some(c);
    }
    Some(line)
}

/// Reject malformed separator sequences.
///
/// Only `;`, `&&` and `||` are separators and each one must follow some
/// command text, meaning anything the tokenizer keeps as an argument. Operators are read greedily, so `&&&` is `&&` followed by a
/// lone `&`, and `;;` is reported as a unit.
pub fn check_syntax(line: &str) -> Result<(), ShellError> {
    let bytes = line.as_bytes();
    let mut have_command = false;
    let mut i = 0;
    while i < bytes.len() {
        let doubled = bytes.get(i + 1) == Some(&bytes[i]);
        let token = match (bytes[i], doubled) {
            (b';', true) => ";;",
            (b';', false) => ";",
            (b'&', true) => "&&",
            (b'&', false) => "&",
            (b'|', true) => "||",
            (b'|', false) => "|",
            (c, _) => {
                if !lexer::is_delimiter(char::from(c)) {
                    have_command = true;
                }
                i += 1;
                continue;
            }
        };
        if !have_command || matches!(token, ";;" | "&" | "|") {
            return Err(ShellError::Syntax(token.to_string()));
        }
        have_command = false;
        i += token.len();
    }
    Ok(())
}
