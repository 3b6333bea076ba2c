use crate::syntax::{
    block::Block,
    diagnostics::{
        Diagnostic, EXPECTED_EXPRESSION, ILLEGAL_CHARACTER, MALFORMED_NUMBER, UNEXPECTED_TOKEN,
        UNTERMINATED_COMMENT, UNTERMINATED_STRING,
    },
    expression::Expression,
    position::{Position, Span},
    precedence::{Precedence, token_precedence},
    statement::Statement,
    token::Token,
    token_type::TokenType,
};

use super::Parser;

impl Parser {
    // Token navigation
    pub(super) fn next_token(&mut self) {
        self.current_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    pub(super) fn is_current_token(&self, token_type: TokenType) -> bool {
        self.current_token.token_type == token_type
    }

    pub(super) fn is_peek_token(&self, token_type: TokenType) -> bool {
        self.peek_token.token_type == token_type
    }

    pub(super) fn expect_peek(&mut self, token_type: TokenType) -> bool {
        if self.is_peek_token(token_type) {
            self.next_token();
            true
        } else {
            self.peek_error(&token_type.to_string());
            false
        }
    }

    /// Checks the token a block stopped at, e.g. the `end` closing a loop.
    pub(super) fn expect_current(&mut self, token_type: TokenType) -> bool {
        if self.is_current_token(token_type) {
            true
        } else {
            self.unexpected_current(&token_type.to_string());
            false
        }
    }

    pub(super) fn is_block_end(&self, token_type: TokenType) -> bool {
        matches!(
            token_type,
            TokenType::End
                | TokenType::Else
                | TokenType::ElseIf
                | TokenType::Until
                | TokenType::Eof
        )
    }

    // Span/position utilities
    pub(super) fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.current_token.end_position)
    }

    // Precedence helpers
    pub(super) fn peek_precedence(&self) -> Precedence {
        token_precedence(self.peek_token.token_type)
    }

    // Complex parsing helpers

    /// Parses statements up to `end`, `else`, `elseif`, `until` or the end of
    /// input. Entry: the token before the block. Exit: the terminator.
    pub(super) fn parse_block(&mut self) -> Block {
        let start = self.current_token.end_position;
        let mut statements = Vec::new();
        self.next_token();

        while !self.is_block_end(self.current_token.token_type) {
            if self.is_current_token(TokenType::Semicolon) {
                self.next_token();
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                self.push_statement(&mut statements, statement);
            }
            self.next_token();
        }

        Block {
            statements,
            span: Span::new(start, self.current_token.position),
        }
    }

    /// `return` must be the last statement of its block.
    pub(super) fn push_statement(&mut self, statements: &mut Vec<Statement>, statement: Statement) {
        if let Some(Statement::Return { .. }) = statements.last() {
            self.errors.push(Diagnostic::make_error(
                &UNEXPECTED_TOKEN,
                &["end of block after `return`", "another statement"],
                String::new(),
                statement.span(),
            ));
        }
        statements.push(statement);
    }

    /// Parses `exp {, exp}` starting at the current token.
    pub(super) fn parse_expression_list(&mut self) -> Option<Vec<Expression>> {
        let mut list = vec![self.parse_expression(Precedence::Lowest)?];

        while self.is_peek_token(TokenType::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        Some(list)
    }

    pub(super) fn parse_name(&self) -> String {
        self.current_token.literal.clone()
    }

    // Error handling
    pub(super) fn synchronize(&mut self) {
        while !matches!(
            self.peek_token.token_type,
            TokenType::Local
                | TokenType::Function
                | TokenType::If
                | TokenType::While
                | TokenType::For
                | TokenType::Repeat
                | TokenType::Do
                | TokenType::Return
                | TokenType::Break
                | TokenType::Goto
                | TokenType::DoubleColon
                | TokenType::Semicolon
                | TokenType::End
                | TokenType::Else
                | TokenType::ElseIf
                | TokenType::Until
                | TokenType::Eof
        ) {
            self.next_token();
        }
    }

    pub(super) fn no_prefix_parse_error(&mut self) {
        if let Some(diag) = lexical_error(&self.current_token) {
            self.errors.push(diag);
            return;
        }
        let diag = Diagnostic::make_error(
            &EXPECTED_EXPRESSION,
            &[&self.current_token.describe()],
            String::new(), // No file context in parser
            self.current_token.span(),
        );
        self.errors.push(diag);
    }

    pub(super) fn peek_error(&mut self, expected: &str) {
        let diag = lexical_error(&self.peek_token).unwrap_or_else(|| {
            Diagnostic::make_error(
                &UNEXPECTED_TOKEN,
                &[expected, &self.peek_token.describe()],
                String::new(),
                self.peek_token.span(),
            )
        });
        self.errors.push(diag);
    }

    pub(super) fn unexpected_current(&mut self, expected: &str) {
        let diag = lexical_error(&self.current_token).unwrap_or_else(|| {
            Diagnostic::make_error(
                &UNEXPECTED_TOKEN,
                &[expected, &self.current_token.describe()],
                String::new(),
                self.current_token.span(),
            )
        });
        self.errors.push(diag);
    }
}

/// Diagnostics for the token types the lexer uses to flag malformed input.
fn lexical_error(token: &Token) -> Option<Diagnostic> {
    let diag = match token.token_type {
        TokenType::UnterminatedString => Diagnostic::make_error(
            &UNTERMINATED_STRING,
            &[],
            String::new(),
            Span::new(token.end_position, token.end_position),
        ),
        TokenType::UnterminatedLongString => Diagnostic::make_error(
            &UNTERMINATED_COMMENT,
            &["string"],
            String::new(),
            Span::new(token.position, token.position),
        ),
        TokenType::UnterminatedComment => Diagnostic::make_error(
            &UNTERMINATED_COMMENT,
            &["comment"],
            String::new(),
            Span::new(token.position, token.position),
        ),
        TokenType::MalformedNumber => Diagnostic::make_error(
            &MALFORMED_NUMBER,
            &[&token.literal],
            String::new(),
            token.span(),
        ),
        TokenType::Illegal => Diagnostic::make_error(
            &ILLEGAL_CHARACTER,
            &[&token.literal],
            String::new(),
            token.span(),
        ),
        _ => return None,
    };
    Some(diag)
}
