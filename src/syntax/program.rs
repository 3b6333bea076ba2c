use crate::{diagnostics::position::Span, syntax::statement::Statement};

/// A parsed chunk: the top-level statements of one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Program {
    pub fn new() -> Self {
        Self {
            statements: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn from_statements(statements: Vec<Statement>) -> Self {
        Self {
            statements,
            span: Span::default(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
