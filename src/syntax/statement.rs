use crate::{
    diagnostics::position::{Position, Span},
    syntax::{
        Identifier,
        block::Block,
        expression::{Expression, FunctionBody},
    },
};

/// A name introduced by `local`, with its optional `<const>`/`<close>`
/// attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalName {
    pub name: Identifier,
    pub attribute: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfClause {
    pub condition: Expression,
    pub body: Block,
}

/// `a.b.c` or `a.b:c` in `function a.b:c() ... end`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionName {
    pub path: Vec<Identifier>,
    pub method: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Local {
        names: Vec<LocalName>,
        values: Vec<Expression>,
        span: Span,
    },
    Assign {
        targets: Vec<Expression>,
        values: Vec<Expression>,
        span: Span,
    },
    /// A function or method call used as a statement.
    Call {
        call: Expression,
        span: Span,
    },
    Do {
        body: Block,
        span: Span,
    },
    While {
        condition: Expression,
        body: Block,
        span: Span,
    },
    Repeat {
        body: Block,
        condition: Expression,
        span: Span,
    },
    If {
        clauses: Vec<IfClause>,
        else_body: Option<Block>,
        span: Span,
    },
    NumericFor {
        variable: Identifier,
        start: Expression,
        limit: Expression,
        step: Option<Expression>,
        body: Block,
        span: Span,
    },
    GenericFor {
        names: Vec<Identifier>,
        expressions: Vec<Expression>,
        body: Block,
        span: Span,
    },
    Function {
        name: FunctionName,
        body: FunctionBody,
        span: Span,
    },
    LocalFunction {
        name: Identifier,
        body: FunctionBody,
        span: Span,
    },
    Return {
        values: Vec<Expression>,
        span: Span,
    },
    Break {
        span: Span,
    },
    Goto {
        label: Identifier,
        span: Span,
    },
    Label {
        name: Identifier,
        span: Span,
    },
}

impl Statement {
    pub fn position(&self) -> Position {
        self.span().start
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::Local { span, .. }
            | Statement::Assign { span, .. }
            | Statement::Call { span, .. }
            | Statement::Do { span, .. }
            | Statement::While { span, .. }
            | Statement::Repeat { span, .. }
            | Statement::If { span, .. }
            | Statement::NumericFor { span, .. }
            | Statement::GenericFor { span, .. }
            | Statement::Function { span, .. }
            | Statement::LocalFunction { span, .. }
            | Statement::Return { span, .. }
            | Statement::Break { span }
            | Statement::Goto { span, .. }
            | Statement::Label { span, .. } => *span,
        }
    }
}
