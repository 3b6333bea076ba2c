use crate::syntax::{
    diagnostics::{Diagnostic, INVALID_ESCAPE},
    expression::{Expression, FunctionBody, TableField},
    lexer::decode_string_literal,
    position::{Position, Span},
    precedence::{Precedence, infix_op, prefix_op, rhs_precedence},
    token_type::TokenType,
};

use super::Parser;

impl Parser {
    pub(super) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = match prefix_op(self.current_token.token_type) {
            Some(operator) => {
                let start = self.current_token.position;
                self.next_token();
                let operand = self.parse_expression(Precedence::Unary)?;
                Expression::Unary {
                    operator,
                    operand: Box::new(operand),
                    span: self.span_from(start),
                }
            }
            None => self.parse_simple_expression()?,
        };

        while precedence < self.peek_precedence() {
            self.next_token();
            let Some(info) = infix_op(self.current_token.token_type) else {
                break;
            };
            self.next_token();
            let right = self.parse_expression(rhs_precedence(info))?;
            let span = left.span().merge(right.span());
            left = Expression::Binary {
                left: Box::new(left),
                operator: info.operator,
                right: Box::new(right),
                span,
            };
        }

        Some(left)
    }

    fn parse_simple_expression(&mut self) -> Option<Expression> {
        let span = self.current_token.span();
        match self.current_token.token_type {
            TokenType::Nil => Some(Expression::Nil { span }),
            TokenType::True => Some(Expression::Boolean { value: true, span }),
            TokenType::False => Some(Expression::Boolean { value: false, span }),
            TokenType::Number => Some(Expression::Number {
                text: self.current_token.literal.clone(),
                span,
            }),
            TokenType::String => self.parse_string(),
            TokenType::Ellipsis => Some(Expression::Vararg { span }),
            TokenType::Function => {
                let start = self.current_token.position;
                let body = self.parse_function_body()?;
                Some(Expression::Function {
                    body,
                    span: self.span_from(start),
                })
            }
            TokenType::LBrace => self.parse_table(),
            _ => self.parse_suffixed_expression(),
        }
    }

    pub(super) fn parse_string(&mut self) -> Option<Expression> {
        let token = &self.current_token;
        match decode_string_literal(&token.literal) {
            Ok(value) => Some(Expression::String {
                value,
                span: token.span(),
            }),
            Err(err) => {
                let at = Position::new(token.position.line, token.position.column + err.offset);
                let end = Position::new(at.line, at.column + err.sequence.chars().count());
                self.errors.push(Diagnostic::make_error(
                    &INVALID_ESCAPE,
                    &[&err.to_string()],
                    String::new(),
                    Span::new(at, end),
                ));
                None
            }
        }
    }

    fn parse_primary_expression(&mut self) -> Option<Expression> {
        match self.current_token.token_type {
            TokenType::Name => Some(Expression::Identifier {
                name: self.parse_name(),
                span: self.current_token.span(),
            }),
            TokenType::LParen => {
                let start = self.current_token.position;
                self.next_token();
                let expression = self.parse_expression(Precedence::Lowest)?;
                if !self.expect_peek(TokenType::RParen) {
                    return None;
                }
                Some(Expression::Parenthesized {
                    expression: Box::new(expression),
                    span: self.span_from(start),
                })
            }
            _ => {
                self.no_prefix_parse_error();
                None
            }
        }
    }

    /// `primary { .name | [exp] | :name args | args }`
    pub(super) fn parse_suffixed_expression(&mut self) -> Option<Expression> {
        let start = self.current_token.position;
        let mut expression = self.parse_primary_expression()?;

        loop {
            match self.peek_token.token_type {
                TokenType::Dot => {
                    self.next_token();
                    if !self.expect_peek(TokenType::Name) {
                        return None;
                    }
                    expression = Expression::Field {
                        object: Box::new(expression),
                        name: self.parse_name(),
                        span: self.span_from(start),
                    };
                }
                TokenType::LBracket => {
                    self.next_token();
                    self.next_token();
                    let key = self.parse_expression(Precedence::Lowest)?;
                    if !self.expect_peek(TokenType::RBracket) {
                        return None;
                    }
                    expression = Expression::Index {
                        object: Box::new(expression),
                        key: Box::new(key),
                        span: self.span_from(start),
                    };
                }
                TokenType::Colon => {
                    self.next_token();
                    if !self.expect_peek(TokenType::Name) {
                        return None;
                    }
                    let method = self.parse_name();
                    if !matches!(
                        self.peek_token.token_type,
                        TokenType::LParen | TokenType::String | TokenType::LBrace
                    ) {
                        self.peek_error("function arguments");
                        return None;
                    }
                    let arguments = self.parse_call_arguments()?;
                    expression = Expression::MethodCall {
                        object: Box::new(expression),
                        method,
                        arguments,
                        span: self.span_from(start),
                    };
                }
                TokenType::LParen | TokenType::String | TokenType::LBrace => {
                    let arguments = self.parse_call_arguments()?;
                    expression = Expression::Call {
                        function: Box::new(expression),
                        arguments,
                        span: self.span_from(start),
                    };
                }
                _ => return Some(expression),
            }
        }
    }

    /// Entry: the token before the arguments. Exit: their last token.
    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        self.next_token();
        match self.current_token.token_type {
            TokenType::String => Some(vec![self.parse_string()?]),
            TokenType::LBrace => Some(vec![self.parse_table()?]),
            _ => {
                if self.is_peek_token(TokenType::RParen) {
                    self.next_token();
                    return Some(Vec::new());
                }
                self.next_token();
                let arguments = self.parse_expression_list()?;
                if !self.expect_peek(TokenType::RParen) {
                    return None;
                }
                Some(arguments)
            }
        }
    }

    /// Entry: `{`. Exit: `}`.
    pub(super) fn parse_table(&mut self) -> Option<Expression> {
        let start = self.current_token.position;
        let mut fields = Vec::new();

        loop {
            if self.is_peek_token(TokenType::RBrace) {
                self.next_token();
                break;
            }
            self.next_token();

            let field = match self.current_token.token_type {
                TokenType::LBracket => {
                    self.next_token();
                    let key = self.parse_expression(Precedence::Lowest)?;
                    if !self.expect_peek(TokenType::RBracket) || !self.expect_peek(TokenType::Assign)
                    {
                        return None;
                    }
                    self.next_token();
                    let value = self.parse_expression(Precedence::Lowest)?;
                    TableField::Keyed { key, value }
                }
                TokenType::Name if self.is_peek_token(TokenType::Assign) => {
                    let name = self.parse_name();
                    self.next_token();
                    self.next_token();
                    let value = self.parse_expression(Precedence::Lowest)?;
                    TableField::Named { name, value }
                }
                _ => TableField::Positional(self.parse_expression(Precedence::Lowest)?),
            };
            fields.push(field);

            if self.is_peek_token(TokenType::Comma) || self.is_peek_token(TokenType::Semicolon) {
                self.next_token();
                continue;
            }
            if !self.expect_peek(TokenType::RBrace) {
                return None;
            }
            break;
        }

        Some(Expression::Table {
            fields,
            span: self.span_from(start),
        })
    }

    /// `( params ) block end`. Entry: the token before `(`. Exit: `end`.
    pub(super) fn parse_function_body(&mut self) -> Option<FunctionBody> {
        let start = self.current_token.position;
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }

        let mut parameters = Vec::new();
        let mut is_vararg = false;
        if !self.is_peek_token(TokenType::RParen) {
            loop {
                self.next_token();
                match self.current_token.token_type {
                    TokenType::Name => parameters.push(self.parse_name()),
                    TokenType::Ellipsis => {
                        is_vararg = true;
                        break;
                    }
                    _ => {
                        self.unexpected_current("parameter name");
                        return None;
                    }
                }
                if !self.is_peek_token(TokenType::Comma) {
                    break;
                }
                self.next_token();
            }
        }
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        let body = self.parse_block();
        if !self.expect_current(TokenType::End) {
            return None;
        }

        Some(FunctionBody {
            parameters,
            is_vararg,
            body,
            span: self.span_from(start),
        })
    }
}
