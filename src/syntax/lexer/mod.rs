//! Lua tokenizer.
//!
//! Produces one [`Token`] at a time; comments and whitespace are skipped.
//! Malformed input never aborts the scan: it is reported as an `Illegal`,
//! `MalformedNumber` or `Unterminated*` token and left to the parser.

mod comments;
mod numbers;
mod strings;

pub use numbers::is_well_formed_numeral;
pub use strings::{EscapeError, decode_string_literal};

use crate::diagnostics::position::Position;
use crate::syntax::{
    token::Token,
    token_type::{TokenType, lookup_name},
};

#[derive(Debug, Clone)]
pub struct Lexer {
    source: String,
    index: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: impl Into<String>) -> Self {
        let mut lexer = Self {
            source: source.into(),
            index: 0,
            line: 1,
            column: 0,
        };
        lexer.skip_shebang();
        lexer
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.skip_trivia() {
            return token;
        }

        let start = self.cursor_position();
        let start_index = self.index;

        let Some(byte) = self.current_byte() else {
            return Token::new(TokenType::Eof, "", start, start);
        };

        let token_type = match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.read_name();
                lookup_name(&self.source[start_index..self.index])
            }
            b'0'..=b'9' => self.read_number(),
            b'.' if self.peek_byte().is_some_and(|b| b.is_ascii_digit()) => self.read_number(),
            b'"' | b'\'' => self.read_short_string(),
            b'[' if self.at_long_bracket_open().is_some() => self.read_long_string(),
            _ => self.read_symbol(),
        };

        Token::new(
            token_type,
            &self.source[start_index..self.index],
            start,
            self.cursor_position(),
        )
    }

    /// Lexes the whole input, including the trailing `Eof` token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.token_type == TokenType::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn read_name(&mut self) {
        while self
            .current_byte()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.read_char();
        }
    }

    fn read_symbol(&mut self) -> TokenType {
        let two = (self.current_byte(), self.peek_byte());
        let (token_type, width) = match two {
            (Some(b'.'), Some(b'.')) if self.byte_at(self.index + 2) == Some(b'.') => {
                (TokenType::Ellipsis, 3)
            }
            (Some(b'.'), Some(b'.')) => (TokenType::Concat, 2),
            (Some(b'/'), Some(b'/')) => (TokenType::DoubleSlash, 2),
            (Some(b'='), Some(b'=')) => (TokenType::Eq, 2),
            (Some(b'~'), Some(b'=')) => (TokenType::NotEq, 2),
            (Some(b'<'), Some(b'=')) => (TokenType::Lte, 2),
            (Some(b'>'), Some(b'=')) => (TokenType::Gte, 2),
            (Some(b'<'), Some(b'<')) => (TokenType::ShiftLeft, 2),
            (Some(b'>'), Some(b'>')) => (TokenType::ShiftRight, 2),
            (Some(b':'), Some(b':')) => (TokenType::DoubleColon, 2),
            (Some(b'+'), _) => (TokenType::Plus, 1),
            (Some(b'-'), _) => (TokenType::Minus, 1),
            (Some(b'*'), _) => (TokenType::Star, 1),
            (Some(b'/'), _) => (TokenType::Slash, 1),
            (Some(b'%'), _) => (TokenType::Percent, 1),
            (Some(b'^'), _) => (TokenType::Caret, 1),
            (Some(b'#'), _) => (TokenType::Hash, 1),
            (Some(b'&'), _) => (TokenType::Ampersand, 1),
            (Some(b'~'), _) => (TokenType::Tilde, 1),
            (Some(b'|'), _) => (TokenType::Bar, 1),
            (Some(b'<'), _) => (TokenType::Lt, 1),
            (Some(b'>'), _) => (TokenType::Gt, 1),
            (Some(b'='), _) => (TokenType::Assign, 1),
            (Some(b'('), _) => (TokenType::LParen, 1),
            (Some(b')'), _) => (TokenType::RParen, 1),
            (Some(b'{'), _) => (TokenType::LBrace, 1),
            (Some(b'}'), _) => (TokenType::RBrace, 1),
            (Some(b'['), _) => (TokenType::LBracket, 1),
            (Some(b']'), _) => (TokenType::RBracket, 1),
            (Some(b';'), _) => (TokenType::Semicolon, 1),
            (Some(b':'), _) => (TokenType::Colon, 1),
            (Some(b','), _) => (TokenType::Comma, 1),
            (Some(b'.'), _) => (TokenType::Dot, 1),
            _ => (TokenType::Illegal, 1),
        };
        for _ in 0..width {
            self.read_char();
        }
        // Keep multi-byte characters whole so the token text stays valid UTF-8.
        while self.current_byte().is_some_and(|b| (b & 0xC0) == 0x80) {
            self.read_char();
        }
        token_type
    }

    /// Skips whitespace and comments. Returns a token only when a comment
    /// runs into the end of the input.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            match self.current_byte() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c) => self.read_char(),
                Some(b'-') if self.peek_byte() == Some(b'-') => {
                    if let Some(token) = self.skip_comment() {
                        return Some(token);
                    }
                }
                _ => return None,
            }
        }
    }

    fn skip_shebang(&mut self) {
        if self.source.starts_with('#') {
            while self.current_byte().is_some_and(|b| b != b'\n') {
                self.read_char();
            }
        }
    }

    // ── cursor ──────────────────────────────────────────────────────────────

    pub(super) fn cursor_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub(super) fn current_index(&self) -> usize {
        self.index
    }

    pub(super) fn current_byte(&self) -> Option<u8> {
        self.byte_at(self.index)
    }

    pub(super) fn peek_byte(&self) -> Option<u8> {
        self.byte_at(self.index + 1)
    }

    pub(super) fn byte_at(&self, index: usize) -> Option<u8> {
        self.source.as_bytes().get(index).copied()
    }

    pub(super) fn slice(&self, start: usize, end: usize) -> &str {
        &self.source[start..end]
    }

    /// Advances one byte. Columns count characters, so UTF-8 continuation
    /// bytes do not move the column.
    pub(super) fn read_char(&mut self) {
        let Some(byte) = self.current_byte() else {
            return;
        };
        self.index += 1;
        match byte {
            b'\n' => {
                self.line += 1;
                self.column = 0;
            }
            b if (b & 0xC0) == 0x80 => {}
            _ => self.column += 1,
        }
    }
}
