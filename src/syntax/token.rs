use std::fmt;

use crate::diagnostics::position::{Position, Span};

use super::token_type::TokenType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    /// Raw source text of the token. String tokens keep their quotes or long
    /// brackets; the parser decodes them.
    pub literal: String,
    pub position: Position,
    pub end_position: Position,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        literal: impl Into<String>,
        position: Position,
        end_position: Position,
    ) -> Self {
        Self {
            token_type,
            literal: literal.into(),
            position,
            end_position,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.position, self.end_position)
    }

    /// Human readable description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self.token_type {
            TokenType::Name => format!("name `{}`", self.literal),
            TokenType::Number => format!("number `{}`", self.literal),
            TokenType::String => "string literal".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({:?}, {:?}, {})",
            self.token_type, self.literal, self.position
        )
    }
}
