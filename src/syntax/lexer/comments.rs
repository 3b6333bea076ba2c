//! Comment handling (line comments and long comments)

use crate::syntax::token::Token;
use crate::syntax::token_type::TokenType;

use super::Lexer;

impl Lexer {
    /// Skip a comment starting at `--`.
    /// Returns an `UnterminatedComment` token when a long comment is never closed.
    pub(super) fn skip_comment(&mut self) -> Option<Token> {
        let start = self.cursor_position();
        let start_index = self.current_index();
        self.read_char(); // first -
        self.read_char(); // second -

        if let Some(level) = self.at_long_bracket_open() {
            if self.skip_long_bracket(level) {
                return None;
            }
            return Some(Token::new(
                TokenType::UnterminatedComment,
                self.slice(start_index, self.current_index()),
                start,
                self.cursor_position(),
            ));
        }

        while self.current_byte().is_some_and(|b| b != b'\n') {
            self.read_char();
        }
        None
    }

    /// If the cursor is on `[`, `[=`..., `[` return the number of `=` signs.
    pub(super) fn at_long_bracket_open(&self) -> Option<usize> {
        if self.current_byte() != Some(b'[') {
            return None;
        }
        let mut level = 0;
        loop {
            match self.byte_at(self.current_index() + 1 + level) {
                Some(b'=') => level += 1,
                Some(b'[') => return Some(level),
                _ => return None,
            }
        }
    }

    /// Consumes an opening long bracket of `level` and everything through the
    /// matching close. Returns false when the input ends first.
    pub(super) fn skip_long_bracket(&mut self, level: usize) -> bool {
        for _ in 0..level + 2 {
            self.read_char();
        }

        loop {
            match self.current_byte() {
                None => return false,
                Some(b']') if self.at_long_bracket_close(level) => {
                    for _ in 0..level + 2 {
                        self.read_char();
                    }
                    return true;
                }
                Some(_) => self.read_char(),
            }
        }
    }

    fn at_long_bracket_close(&self, level: usize) -> bool {
        let index = self.current_index();
        (1..=level).all(|offset| self.byte_at(index + offset) == Some(b'='))
            && self.byte_at(index + level + 1) == Some(b']')
    }
}
