//! Numeral scanning

use crate::syntax::token_type::TokenType;

use super::Lexer;

impl Lexer {
    /// Reads a numeral greedily: digits, letters, dots, and a sign right
    /// after an exponent marker. The text is then checked as a whole, so
    /// `3..2` or `0xg` come back as a single `MalformedNumber` token.
    pub(super) fn read_number(&mut self) -> TokenType {
        let start = self.current_index();
        let is_hex = self.current_byte() == Some(b'0')
            && matches!(self.peek_byte(), Some(b'x' | b'X'));
        let exponent: &[u8] = if is_hex { b"pP" } else { b"eE" };

        loop {
            match self.current_byte() {
                Some(b) if exponent.contains(&b) => {
                    self.read_char();
                    if matches!(self.current_byte(), Some(b'+' | b'-')) {
                        self.read_char();
                    }
                }
                Some(b) if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' => {
                    self.read_char()
                }
                _ => break,
            }
        }

        if is_well_formed_numeral(self.slice(start, self.current_index())) {
            TokenType::Number
        } else {
            TokenType::MalformedNumber
        }
    }
}

/// Checks decimal (`3`, `3.`, `.5`, `1e-3`) and hexadecimal (`0xff`,
/// `0x1p4`, `0x.8`) numerals.
pub fn is_well_formed_numeral(text: &str) -> bool {
    let bytes = text.as_bytes();
    let hex = bytes.len() > 1 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X');
    let digits = if hex { &bytes[2..] } else { bytes };
    let exponent: &[u8] = if hex { b"pP" } else { b"eE" };
    let is_digit = |b: &u8| {
        if hex {
            b.is_ascii_hexdigit()
        } else {
            b.is_ascii_digit()
        }
    };

    let mut index = 0;
    let mut mantissa_digits = 0;
    let mut seen_dot = false;
    while let Some(b) = digits.get(index) {
        if is_digit(b) {
            mantissa_digits += 1;
        } else if *b == b'.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
        index += 1;
    }
    if mantissa_digits == 0 {
        return false;
    }

    match digits.get(index) {
        None => true,
        Some(b) if exponent.contains(b) => {
            index += 1;
            if matches!(digits.get(index), Some(b'+' | b'-')) {
                index += 1;
            }
            let rest = &digits[index..];
            !rest.is_empty() && rest.iter().all(u8::is_ascii_digit)
        }
        Some(_) => false,
    }
}
