use crate::syntax::{
    diagnostics::{Diagnostic, UNEXPECTED_TOKEN},
    expression::Expression,
    precedence::Precedence,
    statement::{FunctionName, IfClause, LocalName, Statement},
    token_type::TokenType,
};

use super::Parser;

impl Parser {
    pub(super) fn parse_statement(&mut self) -> Option<Statement> {
        let statement = match self.current_token.token_type {
            TokenType::Local if self.is_peek_token(TokenType::Function) => {
                self.parse_local_function_statement()
            }
            TokenType::Local => self.parse_local_statement(),
            TokenType::If => self.parse_if_statement(),
            TokenType::While => self.parse_while_statement(),
            TokenType::Do => self.parse_do_statement(),
            TokenType::For => self.parse_for_statement(),
            TokenType::Repeat => self.parse_repeat_statement(),
            TokenType::Function => self.parse_function_statement(),
            TokenType::Return => self.parse_return_statement(),
            TokenType::Break => Some(Statement::Break {
                span: self.current_token.span(),
            }),
            TokenType::Goto => self.parse_goto_statement(),
            TokenType::DoubleColon => self.parse_label_statement(),
            _ => self.parse_expression_statement(),
        };

        if statement.is_none() {
            self.synchronize();
        }

        statement
    }

    /// A call statement, or an assignment `targets = values`.
    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        let first = self.parse_suffixed_expression()?;

        if !self.is_peek_token(TokenType::Assign) && !self.is_peek_token(TokenType::Comma) {
            if first.is_call() {
                return Some(Statement::Call {
                    call: first,
                    span: self.span_from(start),
                });
            }
            self.peek_error("`=` or a function call");
            return None;
        }

        let mut targets = vec![first];
        while self.is_peek_token(TokenType::Comma) {
            self.next_token();
            self.next_token();
            targets.push(self.parse_suffixed_expression()?);
        }

        if let Some(target) = targets.iter().find(|t| !is_assignable(t)) {
            let span = target.span();
            self.errors.push(Diagnostic::make_error(
                &UNEXPECTED_TOKEN,
                &["a variable or field to assign to", "an expression"],
                String::new(),
                span,
            ));
            return None;
        }

        if !self.expect_peek(TokenType::Assign) {
            return None;
        }
        self.next_token();
        let values = self.parse_expression_list()?;

        Some(Statement::Assign {
            targets,
            values,
            span: self.span_from(start),
        })
    }

    fn parse_local_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        let mut names = Vec::new();

        loop {
            if !self.expect_peek(TokenType::Name) {
                return None;
            }
            let name = self.parse_name();
            let attribute = if self.is_peek_token(TokenType::Lt) {
                self.next_token();
                if !self.expect_peek(TokenType::Name) {
                    return None;
                }
                let attribute = self.parse_name();
                if !self.expect_peek(TokenType::Gt) {
                    return None;
                }
                Some(attribute)
            } else {
                None
            };
            names.push(LocalName { name, attribute });

            if !self.is_peek_token(TokenType::Comma) {
                break;
            }
            self.next_token();
        }

        let values = if self.is_peek_token(TokenType::Assign) {
            self.next_token();
            self.next_token();
            self.parse_expression_list()?
        } else {
            Vec::new()
        };

        Some(Statement::Local {
            names,
            values,
            span: self.span_from(start),
        })
    }

    fn parse_local_function_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        self.next_token(); // function
        if !self.expect_peek(TokenType::Name) {
            return None;
        }
        let name = self.parse_name();
        let body = self.parse_function_body()?;

        Some(Statement::LocalFunction {
            name,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_function_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        if !self.expect_peek(TokenType::Name) {
            return None;
        }

        let mut path = vec![self.parse_name()];
        while self.is_peek_token(TokenType::Dot) {
            self.next_token();
            if !self.expect_peek(TokenType::Name) {
                return None;
            }
            path.push(self.parse_name());
        }

        let method = if self.is_peek_token(TokenType::Colon) {
            self.next_token();
            if !self.expect_peek(TokenType::Name) {
                return None;
            }
            Some(self.parse_name())
        } else {
            None
        };

        let body = self.parse_function_body()?;

        Some(Statement::Function {
            name: FunctionName { path, method },
            body,
            span: self.span_from(start),
        })
    }

    fn parse_if_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        let mut clauses = Vec::new();
        let mut else_body = None;

        loop {
            self.next_token();
            let condition = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenType::Then) {
                return None;
            }
            let body = self.parse_block();
            clauses.push(IfClause { condition, body });

            match self.current_token.token_type {
                TokenType::ElseIf => continue,
                TokenType::Else => {
                    else_body = Some(self.parse_block());
                    if !self.expect_current(TokenType::End) {
                        return None;
                    }
                    break;
                }
                _ => {
                    if !self.expect_current(TokenType::End) {
                        return None;
                    }
                    break;
                }
            }
        }

        Some(Statement::If {
            clauses,
            else_body,
            span: self.span_from(start),
        })
    }

    fn parse_while_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::Do) {
            return None;
        }
        let body = self.parse_block();
        if !self.expect_current(TokenType::End) {
            return None;
        }

        Some(Statement::While {
            condition,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_do_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        let body = self.parse_block();
        if !self.expect_current(TokenType::End) {
            return None;
        }

        Some(Statement::Do {
            body,
            span: self.span_from(start),
        })
    }

    fn parse_repeat_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        let body = self.parse_block();
        if !self.expect_current(TokenType::Until) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        Some(Statement::Repeat {
            body,
            condition,
            span: self.span_from(start),
        })
    }

    fn parse_for_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        if !self.expect_peek(TokenType::Name) {
            return None;
        }
        let first = self.parse_name();

        if self.is_peek_token(TokenType::Assign) {
            self.next_token();
            self.next_token();
            let begin = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenType::Comma) {
                return None;
            }
            self.next_token();
            let limit = self.parse_expression(Precedence::Lowest)?;
            let step = if self.is_peek_token(TokenType::Comma) {
                self.next_token();
                self.next_token();
                Some(self.parse_expression(Precedence::Lowest)?)
            } else {
                None
            };
            if !self.expect_peek(TokenType::Do) {
                return None;
            }
            let body = self.parse_block();
            if !self.expect_current(TokenType::End) {
                return None;
            }
            return Some(Statement::NumericFor {
                variable: first,
                start: begin,
                limit,
                step,
                body,
                span: self.span_from(start),
            });
        }

        let mut names = vec![first];
        while self.is_peek_token(TokenType::Comma) {
            self.next_token();
            if !self.expect_peek(TokenType::Name) {
                return None;
            }
            names.push(self.parse_name());
        }
        if !self.expect_peek(TokenType::In) {
            return None;
        }
        self.next_token();
        let expressions = self.parse_expression_list()?;
        if !self.expect_peek(TokenType::Do) {
            return None;
        }
        let body = self.parse_block();
        if !self.expect_current(TokenType::End) {
            return None;
        }

        Some(Statement::GenericFor {
            names,
            expressions,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;

        let values = if self.is_block_end(self.peek_token.token_type)
            || self.is_peek_token(TokenType::Semicolon)
        {
            Vec::new()
        } else {
            self.next_token();
            self.parse_expression_list()?
        };

        if self.is_peek_token(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Return {
            values,
            span: self.span_from(start),
        })
    }

    fn parse_goto_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        if !self.expect_peek(TokenType::Name) {
            return None;
        }

        Some(Statement::Goto {
            label: self.parse_name(),
            span: self.span_from(start),
        })
    }

    fn parse_label_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.position;
        if !self.expect_peek(TokenType::Name) {
            return None;
        }
        let name = self.parse_name();
        if !self.expect_peek(TokenType::DoubleColon) {
            return None;
        }

        Some(Statement::Label {
            name,
            span: self.span_from(start),
        })
    }
}

fn is_assignable(expression: &Expression) -> bool {
    matches!(
        expression,
        Expression::Identifier { .. } | Expression::Index { .. } | Expression::Field { .. }
    )
}
