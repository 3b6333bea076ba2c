use crate::syntax::{
    expression::{BinaryOperator, UnaryOperator},
    token_type::TokenType,
};

/// Binding strength, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Or,         // or
    And,        // and
    Comparison, // < > <= >= ~= ==
    BitOr,      // |
    BitXor,     // ~
    BitAnd,     // &
    Shift,      // << >>
    Concat,     // .. (right associative)
    Sum,        // + -
    Product,    // * / // %
    Unary,      // not # - ~
    Power,      // ^ (right associative)
    Primary,    // literals, names, calls, parenthesized expressions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfixInfo {
    pub operator: BinaryOperator,
    pub precedence: Precedence,
    pub associativity: Assoc,
}

// Single source of truth for operator precedence + associativity.
pub const OPERATOR_TABLE: &[(TokenType, BinaryOperator)] = &[
    (TokenType::Or, BinaryOperator::Or),
    (TokenType::And, BinaryOperator::And),
    (TokenType::Lt, BinaryOperator::Lt),
    (TokenType::Gt, BinaryOperator::Gt),
    (TokenType::Lte, BinaryOperator::Lte),
    (TokenType::Gte, BinaryOperator::Gte),
    (TokenType::NotEq, BinaryOperator::NotEq),
    (TokenType::Eq, BinaryOperator::Eq),
    (TokenType::Bar, BinaryOperator::BitOr),
    (TokenType::Tilde, BinaryOperator::BitXor),
    (TokenType::Ampersand, BinaryOperator::BitAnd),
    (TokenType::ShiftLeft, BinaryOperator::ShiftLeft),
    (TokenType::ShiftRight, BinaryOperator::ShiftRight),
    (TokenType::Concat, BinaryOperator::Concat),
    (TokenType::Plus, BinaryOperator::Add),
    (TokenType::Minus, BinaryOperator::Sub),
    (TokenType::Star, BinaryOperator::Mul),
    (TokenType::Slash, BinaryOperator::Div),
    (TokenType::DoubleSlash, BinaryOperator::FloorDiv),
    (TokenType::Percent, BinaryOperator::Mod),
    (TokenType::Caret, BinaryOperator::Pow),
];

impl BinaryOperator {
    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOperator::Or => Precedence::Or,
            BinaryOperator::And => Precedence::And,
            BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::Lte
            | BinaryOperator::Gte
            | BinaryOperator::NotEq
            | BinaryOperator::Eq => Precedence::Comparison,
            BinaryOperator::BitOr => Precedence::BitOr,
            BinaryOperator::BitXor => Precedence::BitXor,
            BinaryOperator::BitAnd => Precedence::BitAnd,
            BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => Precedence::Shift,
            BinaryOperator::Concat => Precedence::Concat,
            BinaryOperator::Add | BinaryOperator::Sub => Precedence::Sum,
            BinaryOperator::Mul
            | BinaryOperator::Div
            | BinaryOperator::FloorDiv
            | BinaryOperator::Mod => Precedence::Product,
            BinaryOperator::Pow => Precedence::Power,
        }
    }

    pub fn associativity(self) -> Assoc {
        match self {
            BinaryOperator::Concat | BinaryOperator::Pow => Assoc::Right,
            _ => Assoc::Left,
        }
    }
}

pub fn infix_op(token_type: TokenType) -> Option<InfixInfo> {
    OPERATOR_TABLE
        .iter()
        .find(|(token, _)| *token == token_type)
        .map(|(_, operator)| InfixInfo {
            operator: *operator,
            precedence: operator.precedence(),
            associativity: operator.associativity(),
        })
}

pub fn prefix_op(token_type: TokenType) -> Option<UnaryOperator> {
    match token_type {
        TokenType::Not => Some(UnaryOperator::Not),
        TokenType::Minus => Some(UnaryOperator::Negate),
        TokenType::Hash => Some(UnaryOperator::Length),
        TokenType::Tilde => Some(UnaryOperator::BitNot),
        _ => None,
    }
}

pub fn token_precedence(token_type: TokenType) -> Precedence {
    infix_op(token_type).map_or(Precedence::Lowest, |op| op.precedence)
}

fn precedence_below(precedence: Precedence) -> Precedence {
    match precedence {
        Precedence::Lowest | Precedence::Or => Precedence::Lowest,
        Precedence::And => Precedence::Or,
        Precedence::Comparison => Precedence::And,
        Precedence::BitOr => Precedence::Comparison,
        Precedence::BitXor => Precedence::BitOr,
        Precedence::BitAnd => Precedence::BitXor,
        Precedence::Shift => Precedence::BitAnd,
        Precedence::Concat => Precedence::Shift,
        Precedence::Sum => Precedence::Concat,
        Precedence::Product => Precedence::Sum,
        Precedence::Unary => Precedence::Product,
        Precedence::Power => Precedence::Unary,
        Precedence::Primary => Precedence::Power,
    }
}

/// Precedence at which the right operand of `info` is parsed.
pub fn rhs_precedence(info: InfixInfo) -> Precedence {
    match info.associativity {
        Assoc::Left => info.precedence,
        Assoc::Right => precedence_below(info.precedence),
    }
}
