//! String literal scanning and decoding

use std::fmt;

use crate::syntax::token_type::TokenType;

use super::Lexer;

impl Lexer {
    /// Read a quoted string. Escapes are only skipped here; they are checked
    /// and decoded by [`decode_string_literal`].
    pub(super) fn read_short_string(&mut self) -> TokenType {
        let quote = self.current_byte();
        self.read_char(); // opening quote

        loop {
            match self.current_byte() {
                None | Some(b'\n') | Some(b'\r') => return TokenType::UnterminatedString,
                Some(b) if Some(b) == quote => {
                    self.read_char();
                    return TokenType::String;
                }
                Some(b'\\') => {
                    self.read_char();
                    match self.current_byte() {
                        None => return TokenType::UnterminatedString,
                        Some(b'\r') if self.peek_byte() == Some(b'\n') => {
                            self.read_char();
                            self.read_char();
                        }
                        Some(b'z') => {
                            self.read_char();
                            while self.current_byte().is_some_and(|b| b.is_ascii_whitespace()) {
                                self.read_char();
                            }
                        }
                        Some(_) => self.read_char(),
                    }
                }
                Some(_) => self.read_char(),
            }
        }
    }

    pub(super) fn read_long_string(&mut self) -> TokenType {
        let level = self.at_long_bracket_open().unwrap_or(0);
        if self.skip_long_bracket(level) {
            TokenType::String
        } else {
            TokenType::UnterminatedLongString
        }
    }
}

/// An escape sequence that is not valid in a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeError {
    /// Character offset of the backslash inside the raw literal.
    pub offset: usize,
    pub sequence: String,
}

impl fmt::Display for EscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.sequence)
    }
}

/// Decodes the raw text of a string token (quotes or long brackets
/// included) into the bytes it denotes.
pub fn decode_string_literal(raw: &str) -> Result<Vec<u8>, EscapeError> {
    let bytes = raw.as_bytes();
    match bytes.first() {
        Some(b'[') => Ok(decode_long_string(bytes)),
        Some(_) if bytes.len() >= 2 => decode_short_string(&bytes[1..bytes.len() - 1], raw),
        _ => Ok(Vec::new()),
    }
}

fn decode_long_string(bytes: &[u8]) -> Vec<u8> {
    let level = bytes[1..].iter().take_while(|b| **b == b'=').count();
    let open = level + 2;
    let close = bytes.len().saturating_sub(level + 2).max(open);
    let mut body = &bytes[open..close];

    // A newline right after the opening bracket is not part of the string.
    body = match body {
        [b'\r', b'\n', rest @ ..] | [b'\n', b'\r', rest @ ..] => rest,
        [b'\n' | b'\r', rest @ ..] => rest,
        _ => body,
    };

    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        match (body[i], body.get(i + 1)) {
            (b'\r', Some(b'\n')) | (b'\n', Some(b'\r')) => {
                out.push(b'\n');
                i += 2;
            }
            (b'\r', _) => {
                out.push(b'\n');
                i += 1;
            }
            (b, _) => {
                out.push(b);
                i += 1;
            }
        }
    }
    out
}

fn decode_short_string(body: &[u8], raw: &str) -> Result<Vec<u8>, EscapeError> {
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;

    let error = |start: usize, end: usize| {
        let start = start + 1;
        let end = (end + 1).min(raw.len());
        EscapeError {
            offset: raw[..start].chars().count(),
            sequence: String::from_utf8_lossy(&raw.as_bytes()[start..end]).into_owned(),
        }
    };

    while i < body.len() {
        if body[i] != b'\\' {
            out.push(body[i]);
            i += 1;
            continue;
        }

        let start = i;
        i += 1;
        let Some(&escape) = body.get(i) else {
            return Err(error(start, i));
        };
        i += 1;

        match escape {
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0b),
            b'\\' => out.push(b'\\'),
            b'"' => out.push(b'"'),
            b'\'' => out.push(b'\''),
            b'\n' | b'\r' => {
                if matches!(
                    (escape, body.get(i)),
                    (b'\n', Some(b'\r')) | (b'\r', Some(b'\n'))
                ) {
                    i += 1;
                }
                out.push(b'\n');
            }
            b'z' => {
                while body.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
                    i += 1;
                }
            }
            b'x' => {
                let hex = body.get(i..i + 2).filter(|h| h.iter().all(u8::is_ascii_hexdigit));
                let Some(hex) = hex else {
                    return Err(error(start, (i + 2).min(body.len())));
                };
                out.push((hex_value(hex[0]) << 4) | hex_value(hex[1]));
                i += 2;
            }
            b'0'..=b'9' => {
                let mut value = u32::from(escape - b'0');
                let mut digits = 1;
                while digits < 3 && body.get(i).is_some_and(u8::is_ascii_digit) {
                    value = value * 10 + u32::from(body[i] - b'0');
                    i += 1;
                    digits += 1;
                }
                let Ok(byte) = u8::try_from(value) else {
                    return Err(error(start, i));
                };
                out.push(byte);
            }
            b'u' => {
                if body.get(i) != Some(&b'{') {
                    return Err(error(start, i));
                }
                i += 1;
                let digits_start = i;
                let mut value: u64 = 0;
                while let Some(b) = body.get(i).filter(|b| b.is_ascii_hexdigit()) {
                    value = (value << 4) | u64::from(hex_value(*b));
                    if value > 0x7FFF_FFFF {
                        return Err(error(start, i + 1));
                    }
                    i += 1;
                }
                if i == digits_start || body.get(i) != Some(&b'}') {
                    return Err(error(start, (i + 1).min(body.len())));
                }
                i += 1;
                encode_utf8_extended(value as u32, &mut out);
            }
            _ => return Err(error(start, i)),
        }
    }

    Ok(out)
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// UTF-8 encoding extended to 31-bit values, as accepted by `\u{...}`.
fn encode_utf8_extended(value: u32, out: &mut Vec<u8>) {
    if value < 0x80 {
        out.push(value as u8);
        return;
    }

    let mut buffer = [0u8; 6];
    let mut n = 0;
    let mut remaining = value;
    // Largest value that fits in the first byte for the current length.
    let mut first_max = 0x3f;
    loop {
        buffer[5 - n] = 0x80 | (remaining & 0x3f) as u8;
        n += 1;
        remaining >>= 6;
        first_max >>= 1;
        if remaining <= first_max {
            break;
        }
    }
    let lead_mark = !((first_max << 1) | 1) as u8;
    buffer[5 - n] = lead_mark | remaining as u8;
    n += 1;
    out.extend_from_slice(&buffer[6 - n..]);
}
