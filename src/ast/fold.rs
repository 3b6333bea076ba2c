use crate::syntax::{
    Identifier,
    block::Block,
    expression::{Expression, FunctionBody, TableField},
    program::Program,
    statement::{FunctionName, IfClause, LocalName, Statement},
};

/// AST folder (rewriter).
///
/// Every `fold_*` method receives an owned node and returns a (possibly
/// rewritten) owned node. Defaults call the corresponding `fold_*` free
/// function which reconstructs the node after folding its children in
/// source order.
pub trait Folder {
    fn fold_program(&mut self, program: Program) -> Program {
        fold_program(self, program)
    }

    fn fold_block(&mut self, block: Block) -> Block {
        fold_block(self, block)
    }

    fn fold_stmt(&mut self, stmt: Statement) -> Statement {
        fold_stmt(self, stmt)
    }

    fn fold_expr(&mut self, expr: Expression) -> Expression {
        fold_expr(self, expr)
    }

    fn fold_function_body(&mut self, body: FunctionBody) -> FunctionBody {
        fold_function_body(self, body)
    }

    fn fold_table_field(&mut self, field: TableField) -> TableField {
        fold_table_field(self, field)
    }

    fn fold_identifier(&mut self, ident: Identifier) -> Identifier {
        ident
    }
}

// ---------------------------------------------------------------------------
// fold_* free functions – exhaustive destructuring so that adding a new
// field or variant causes a compile error until this code is updated.
// ---------------------------------------------------------------------------

pub fn fold_program<F: Folder + ?Sized>(folder: &mut F, program: Program) -> Program {
    let Program { statements, span } = program;
    Program {
        statements: fold_stmts(folder, statements),
        span,
    }
}

pub fn fold_block<F: Folder + ?Sized>(folder: &mut F, block: Block) -> Block {
    let Block { statements, span } = block;
    Block {
        statements: fold_stmts(folder, statements),
        span,
    }
}

fn fold_stmts<F: Folder + ?Sized>(folder: &mut F, statements: Vec<Statement>) -> Vec<Statement> {
    statements
        .into_iter()
        .map(|s| folder.fold_stmt(s))
        .collect()
}

fn fold_exprs<F: Folder + ?Sized>(folder: &mut F, exprs: Vec<Expression>) -> Vec<Expression> {
    exprs.into_iter().map(|e| folder.fold_expr(e)).collect()
}

fn fold_identifiers<F: Folder + ?Sized>(
    folder: &mut F,
    identifiers: Vec<Identifier>,
) -> Vec<Identifier> {
    identifiers
        .into_iter()
        .map(|i| folder.fold_identifier(i))
        .collect()
}

pub fn fold_stmt<F: Folder + ?Sized>(folder: &mut F, stmt: Statement) -> Statement {
    match stmt {
        Statement::Local {
            names,
            values,
            span,
        } => Statement::Local {
            names: names
                .into_iter()
                .map(|LocalName { name, attribute }| LocalName {
                    name: folder.fold_identifier(name),
                    attribute,
                })
                .collect(),
            values: fold_exprs(folder, values),
            span,
        },
        Statement::Assign {
            targets,
            values,
            span,
        } => Statement::Assign {
            targets: fold_exprs(folder, targets),
            values: fold_exprs(folder, values),
            span,
        },
        Statement::Call { call, span } => Statement::Call {
            call: folder.fold_expr(call),
            span,
        },
        Statement::Do { body, span } => Statement::Do {
            body: folder.fold_block(body),
            span,
        },
        Statement::While {
            condition,
            body,
            span,
        } => Statement::While {
            condition: folder.fold_expr(condition),
            body: folder.fold_block(body),
            span,
        },
        Statement::Repeat {
            body,
            condition,
            span,
        } => {
            let body = folder.fold_block(body);
            Statement::Repeat {
                body,
                condition: folder.fold_expr(condition),
                span,
            }
        }
        Statement::If {
            clauses,
            else_body,
            span,
        } => Statement::If {
            clauses: clauses
                .into_iter()
                .map(|IfClause { condition, body }| IfClause {
                    condition: folder.fold_expr(condition),
                    body: folder.fold_block(body),
                })
                .collect(),
            else_body: else_body.map(|b| folder.fold_block(b)),
            span,
        },
        Statement::NumericFor {
            variable,
            start,
            limit,
            step,
            body,
            span,
        } => Statement::NumericFor {
            variable: folder.fold_identifier(variable),
            start: folder.fold_expr(start),
            limit: folder.fold_expr(limit),
            step: step.map(|s| folder.fold_expr(s)),
            body: folder.fold_block(body),
            span,
        },
        Statement::GenericFor {
            names,
            expressions,
            body,
            span,
        } => Statement::GenericFor {
            names: fold_identifiers(folder, names),
            expressions: fold_exprs(folder, expressions),
            body: folder.fold_block(body),
            span,
        },
        Statement::Function {
            name: FunctionName { path, method },
            body,
            span,
        } => Statement::Function {
            name: FunctionName {
                path: fold_identifiers(folder, path),
                method: method.map(|m| folder.fold_identifier(m)),
            },
            body: folder.fold_function_body(body),
            span,
        },
        Statement::LocalFunction { name, body, span } => Statement::LocalFunction {
            name: folder.fold_identifier(name),
            body: folder.fold_function_body(body),
            span,
        },
        Statement::Return { values, span } => Statement::Return {
            values: fold_exprs(folder, values),
            span,
        },
        Statement::Break { span } => Statement::Break { span },
        Statement::Goto { label, span } => Statement::Goto { label, span },
        Statement::Label { name, span } => Statement::Label { name, span },
    }
}

pub fn fold_expr<F: Folder + ?Sized>(folder: &mut F, expr: Expression) -> Expression {
    match expr {
        Expression::Nil { .. }
        | Expression::Boolean { .. }
        | Expression::Number { .. }
        | Expression::String { .. }
        | Expression::Vararg { .. } => expr,
        Expression::Function { body, span } => Expression::Function {
            body: folder.fold_function_body(body),
            span,
        },
        Expression::Table { fields, span } => Expression::Table {
            fields: fields
                .into_iter()
                .map(|f| folder.fold_table_field(f))
                .collect(),
            span,
        },
        Expression::Binary {
            left,
            operator,
            right,
            span,
        } => {
            let left = folder.fold_expr(*left);
            Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(folder.fold_expr(*right)),
                span,
            }
        }
        Expression::Unary {
            operator,
            operand,
            span,
        } => Expression::Unary {
            operator,
            operand: Box::new(folder.fold_expr(*operand)),
            span,
        },
        Expression::Identifier { name, span } => Expression::Identifier {
            name: folder.fold_identifier(name),
            span,
        },
        Expression::Index { object, key, span } => {
            let object = folder.fold_expr(*object);
            Expression::Index {
                object: Box::new(object),
                key: Box::new(folder.fold_expr(*key)),
                span,
            }
        }
        Expression::Field { object, name, span } => Expression::Field {
            object: Box::new(folder.fold_expr(*object)),
            name,
            span,
        },
        Expression::Call {
            function,
            arguments,
            span,
        } => {
            let function = folder.fold_expr(*function);
            Expression::Call {
                function: Box::new(function),
                arguments: fold_exprs(folder, arguments),
                span,
            }
        }
        Expression::MethodCall {
            object,
            method,
            arguments,
            span,
        } => {
            let object = folder.fold_expr(*object);
            Expression::MethodCall {
                object: Box::new(object),
                method,
                arguments: fold_exprs(folder, arguments),
                span,
            }
        }
        Expression::Parenthesized { expression, span } => Expression::Parenthesized {
            expression: Box::new(folder.fold_expr(*expression)),
            span,
        },
    }
}

pub fn fold_function_body<F: Folder + ?Sized>(folder: &mut F, body: FunctionBody) -> FunctionBody {
    let FunctionBody {
        parameters,
        is_vararg,
        body,
        span,
    } = body;
    FunctionBody {
        parameters: fold_identifiers(folder, parameters),
        is_vararg,
        body: folder.fold_block(body),
        span,
    }
}

pub fn fold_table_field<F: Folder + ?Sized>(folder: &mut F, field: TableField) -> TableField {
    match field {
        TableField::Positional(value) => TableField::Positional(folder.fold_expr(value)),
        TableField::Named { name, value } => TableField::Named {
            name: folder.fold_identifier(name),
            value: folder.fold_expr(value),
        },
        TableField::Keyed { key, value } => {
            let key = folder.fold_expr(key);
            TableField::Keyed {
                key,
                value: folder.fold_expr(value),
            }
        }
    }
}
