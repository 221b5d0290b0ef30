//! Escaping for serialized profiles embedded in g-code comments.
//!
//! A g-code comment ends at the line break, so newlines inside the serialized
//! profile are written as the two characters `\n`. Carriage returns become
//! `\r` and the backslash itself becomes `\\`. Any other backslash is left
//! as-is when unescaping.

/// Backslash-prefixed escape codes and the raw characters they stand for.
const ESCAPES: [(char, char); 3] = [('\\', '\\'), ('n', '\n'), ('r', '\r')];

/// The character introducing an escape sequence.
pub const ESCAPE_CHAR: char = '\\';

/// Reverse the comment escaping in a single left-to-right pass.
///
/// `\\` becomes `\`, `\n` becomes a newline and `\r` a carriage return.
/// Escape sequences never overlap: once a backslash starts a sequence, the
/// following character belongs to it.
#[must_use]
pub fn unescape(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len());
    let mut chars = payload.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ESCAPE_CHAR {
            out.push(c);
            continue;
        }
        let raw = chars
            .peek()
            .and_then(|next| ESCAPES.iter().find(|(code, _)| code == next))
            .map(|&(_, raw)| raw);
        match raw {
            Some(raw) => {
                chars.next();
                out.push(raw);
            }
            // Lone or unknown escape: keep the backslash.
            None => out.push(c),
        }
    }
    out
}

/// Escape `serialized` so it fits on g-code comment lines.
///
/// Inverse of [`unescape`]: `unescape(&escape(s)) == s` for every `s`.
#[must_use]
pub fn escape(serialized: &str) -> String {
    let mut out = String::with_capacity(serialized.len());
    for c in serialized.chars() {
        match ESCAPES.iter().find(|(_, raw)| *raw == c) {
            Some(&(code, _)) => {
                out.push(ESCAPE_CHAR);
                out.push(code);
            }
            None => out.push(c),
        }
    }
    out
}
