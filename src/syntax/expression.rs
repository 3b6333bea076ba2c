use std::fmt;

use crate::{
    diagnostics::position::Span,
    syntax::{Identifier, block::Block},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    Lt,
    Gt,
    Lte,
    Gte,
    NotEq,
    Eq,
    BitOr,
    BitXor,
    BitAnd,
    ShiftLeft,
    ShiftRight,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gte => ">=",
            BinaryOperator::NotEq => "~=",
            BinaryOperator::Eq => "==",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "~",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Concat => "..",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::FloorDiv => "//",
            BinaryOperator::Mod => "%",
            BinaryOperator::Pow => "^",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Negate,
    Length,
    BitNot,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Not => "not",
            UnaryOperator::Negate => "-",
            UnaryOperator::Length => "#",
            UnaryOperator::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter list and body shared by function expressions and declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub parameters: Vec<Identifier>,
    pub is_vararg: bool,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableField {
    /// `value`
    Positional(Expression),
    /// `name = value`
    Named { name: Identifier, value: Expression },
    /// `[key] = value`
    Keyed { key: Expression, value: Expression },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Nil {
        span: Span,
    },
    Boolean {
        value: bool,
        span: Span,
    },
    /// Numerals keep their source text so hexadecimal and float spellings
    /// survive printing unchanged.
    Number {
        text: String,
        span: Span,
    },
    String {
        value: Vec<u8>,
        span: Span,
    },
    Vararg {
        span: Span,
    },
    Function {
        body: FunctionBody,
        span: Span,
    },
    Table {
        fields: Vec<TableField>,
        span: Span,
    },
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
        span: Span,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
        span: Span,
    },
    Identifier {
        name: Identifier,
        span: Span,
    },
    /// `object[key]`
    Index {
        object: Box<Expression>,
        key: Box<Expression>,
        span: Span,
    },
    /// `object.name`
    Field {
        object: Box<Expression>,
        name: Identifier,
        span: Span,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
        span: Span,
    },
    /// `object:method(arguments)`
    MethodCall {
        object: Box<Expression>,
        method: Identifier,
        arguments: Vec<Expression>,
        span: Span,
    },
    /// `(expression)`, kept because it truncates multiple results to one.
    Parenthesized {
        expression: Box<Expression>,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Nil { span }
            | Expression::Boolean { span, .. }
            | Expression::Number { span, .. }
            | Expression::String { span, .. }
            | Expression::Vararg { span }
            | Expression::Function { span, .. }
            | Expression::Table { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Unary { span, .. }
            | Expression::Identifier { span, .. }
            | Expression::Index { span, .. }
            | Expression::Field { span, .. }
            | Expression::Call { span, .. }
            | Expression::MethodCall { span, .. }
            | Expression::Parenthesized { span, .. } => *span,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Expression::Call { .. } | Expression::MethodCall { .. })
    }

    /// Expressions that may stand before `(`, `[`, `.` or `:` without
    /// parentheses.
    pub fn is_prefix_expression(&self) -> bool {
        matches!(
            self,
            Expression::Identifier { .. }
                | Expression::Index { .. }
                | Expression::Field { .. }
                | Expression::Call { .. }
                | Expression::MethodCall { .. }
                | Expression::Parenthesized { .. }
        )
    }

    /// The name of a plain global/local callee: `name(...)`.
    pub fn called_name(&self) -> Option<&str> {
        match self {
            Expression::Call { function, .. } => match function.as_ref() {
                Expression::Identifier { name, .. } => Some(name),
                _ => None,
            },
            _ => None,
        }
    }
}
