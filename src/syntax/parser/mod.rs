use crate::syntax::{
    diagnostics::Diagnostic,
    lexer::Lexer,
    position::{Position, Span},
    program::Program,
    token::Token,
    token_type::TokenType,
};

mod expression;
mod helpers;
mod statement;

/// Recursive-descent parser for Lua chunks.
///
/// Syntax errors are collected in `errors`; the parser resynchronizes at the
/// next statement keyword and keeps going, so one pass reports every error
/// of a file.
pub struct Parser {
    pub(super) lexer: Lexer,
    pub(super) current_token: Token,
    pub(super) peek_token: Token,
    pub errors: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        let eof = Token::new(TokenType::Eof, "", Position::default(), Position::default());
        let mut parser = Parser {
            lexer,
            current_token: eof.clone(),
            peek_token: eof,
            errors: Vec::new(),
        };
        parser.next_token();
        parser.next_token();
        parser
    }

    pub fn parse_program(&mut self) -> Program {
        let start = self.current_token.position;
        let mut program = Program::new();

        while !self.is_current_token(TokenType::Eof) {
            if self.is_block_end(self.current_token.token_type) {
                self.unexpected_current("a statement");
                self.next_token();
                continue;
            }
            if self.is_current_token(TokenType::Semicolon) {
                self.next_token();
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                self.push_statement(&mut program.statements, statement);
            }
            self.next_token();
        }

        program.span = Span::new(start, self.current_token.end_position);
        program
    }
}

/// Parses `source` into a program, returning every syntax error otherwise.
pub fn parse_source(source: &str) -> Result<Program, Vec<Diagnostic>> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}
