//! Lowering of staged values into literal expressions.

use std::fmt;

use crate::{
    diagnostics::position::Span,
    stage::{StagedTable, StagedValue},
    syntax::{
        expression::{BinaryOperator, Expression, TableField, UnaryOperator},
        token_type::is_keyword,
    },
};

/// Why a staged value has no literal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub reason: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Builds an expression that evaluates to `value`. The outermost node gets
/// `span`; nested nodes are synthesized.
pub fn lower_value(value: &StagedValue, span: Span) -> Result<Expression, LiteralError> {
    let expression = match value {
        StagedValue::Nil => Expression::Nil { span },
        StagedValue::Boolean(value) => Expression::Boolean {
            value: *value,
            span,
        },
        StagedValue::Integer(value) => lower_integer(*value, span),
        StagedValue::Number(value) => lower_float(*value, span),
        StagedValue::String(value) => Expression::String {
            value: value.clone(),
            span,
        },
        StagedValue::Table(table) => lower_table(table, span)?,
        StagedValue::Opaque { type_name } => {
            return Err(LiteralError {
                reason: format!("a {type_name} value has no literal form"),
            });
        }
    };
    Ok(expression)
}

fn number(text: String, span: Span) -> Expression {
    Expression::Number { text, span }
}

fn negate(operand: Expression, span: Span) -> Expression {
    Expression::Unary {
        operator: UnaryOperator::Negate,
        operand: Box::new(operand),
        span,
    }
}

fn math_field(name: &str, span: Span) -> Expression {
    Expression::Field {
        object: Box::new(Expression::Identifier {
            name: "math".to_string(),
            span: Span::default(),
        }),
        name: name.to_string(),
        span,
    }
}

fn lower_integer(value: i64, span: Span) -> Expression {
    if value == i64::MIN {
        // The positive counterpart does not fit in an integer literal.
        return math_field("mininteger", span);
    }
    if value < 0 {
        return negate(number(value.unsigned_abs().to_string(), Span::default()), span);
    }
    number(value.to_string(), span)
}

fn lower_float(value: f64, span: Span) -> Expression {
    if value.is_nan() {
        return Expression::Parenthesized {
            expression: Box::new(Expression::Binary {
                left: Box::new(number("0".to_string(), Span::default())),
                operator: BinaryOperator::Div,
                right: Box::new(number("0".to_string(), Span::default())),
                span: Span::default(),
            }),
            span,
        };
    }

    let magnitude = if value.is_infinite() {
        math_field("huge", Span::default())
    } else {
        // `{:?}` is the shortest text that reads back as the same float, and
        // always carries a `.` or an exponent so it stays a float in Lua.
        number(format!("{:?}", value.abs()), Span::default())
    };

    if value.is_sign_negative() {
        negate(magnitude, span)
    } else {
        match magnitude {
            Expression::Number { text, .. } => number(text, span),
            other => other,
        }
    }
}

fn lower_table(table: &StagedTable, span: Span) -> Result<Expression, LiteralError> {
    let mut fields = Vec::with_capacity(table.len());

    for value in &table.array {
        fields.push(TableField::Positional(lower_value(value, Span::default())?));
    }

    for (key, value) in &table.hash {
        let value = lower_value(value, Span::default())?;
        let field = match key {
            StagedValue::String(bytes) if is_identifier(bytes) => TableField::Named {
                name: String::from_utf8_lossy(bytes).into_owned(),
                value,
            },
            StagedValue::Boolean(_)
            | StagedValue::Integer(_)
            | StagedValue::Number(_)
            | StagedValue::String(_) => TableField::Keyed {
                key: lower_value(key, Span::default())?,
                value,
            },
            other => {
                return Err(LiteralError {
                    reason: format!("a table uses a {} value as a key", other.type_name()),
                });
            }
        };
        fields.push(field);
    }

    Ok(Expression::Table { fields, span })
}

fn is_identifier(bytes: &[u8]) -> bool {
    let Some(first) = bytes.first() else {
        return false;
    };
    (first.is_ascii_alphabetic() || *first == b'_')
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
        && std::str::from_utf8(bytes).is_ok_and(|name| !is_keyword(name))
}
