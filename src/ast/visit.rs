use crate::syntax::{
    Identifier,
    block::Block,
    expression::{Expression, FunctionBody, TableField},
    program::Program,
    statement::{FunctionName, IfClause, LocalName, Statement},
};

/// Read-only AST visitor.
///
/// Every `visit_*` method has a default that calls the corresponding `walk_*`
/// free function, which recurses into child nodes in source order. Override
/// a method to intercept a node; call `walk_*` from within your override to
/// continue the traversal.
pub trait Visitor<'ast> {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &'ast Statement) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expression) {
        walk_expr(self, expr);
    }

    fn visit_function_body(&mut self, body: &'ast FunctionBody) {
        walk_function_body(self, body);
    }

    fn visit_table_field(&mut self, field: &'ast TableField) {
        walk_table_field(self, field);
    }

    fn visit_identifier(&mut self, _ident: &'ast Identifier) {}
}

// ---------------------------------------------------------------------------
// walk_* free functions – exhaustive destructuring so that adding a new
// field or variant causes a compile error until this code is updated.
// ---------------------------------------------------------------------------

pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, program: &'ast Program) {
    let Program {
        statements,
        span: _,
    } = program;
    for stmt in statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, block: &'ast Block) {
    let Block {
        statements,
        span: _,
    } = block;
    for stmt in statements {
        visitor.visit_stmt(stmt);
    }
}

fn walk_exprs<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, exprs: &'ast [Expression]) {
    for expr in exprs {
        visitor.visit_expr(expr);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Statement) {
    match stmt {
        Statement::Local {
            names,
            values,
            span: _,
        } => {
            for LocalName { name, attribute: _ } in names {
                visitor.visit_identifier(name);
            }
            walk_exprs(visitor, values);
        }
        Statement::Assign {
            targets,
            values,
            span: _,
        } => {
            walk_exprs(visitor, targets);
            walk_exprs(visitor, values);
        }
        Statement::Call { call, span: _ } => visitor.visit_expr(call),
        Statement::Do { body, span: _ } => visitor.visit_block(body),
        Statement::While {
            condition,
            body,
            span: _,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_block(body);
        }
        Statement::Repeat {
            body,
            condition,
            span: _,
        } => {
            visitor.visit_block(body);
            visitor.visit_expr(condition);
        }
        Statement::If {
            clauses,
            else_body,
            span: _,
        } => {
            for IfClause { condition, body } in clauses {
                visitor.visit_expr(condition);
                visitor.visit_block(body);
            }
            if let Some(else_body) = else_body {
                visitor.visit_block(else_body);
            }
        }
        Statement::NumericFor {
            variable,
            start,
            limit,
            step,
            body,
            span: _,
        } => {
            visitor.visit_identifier(variable);
            visitor.visit_expr(start);
            visitor.visit_expr(limit);
            if let Some(step) = step {
                visitor.visit_expr(step);
            }
            visitor.visit_block(body);
        }
        Statement::GenericFor {
            names,
            expressions,
            body,
            span: _,
        } => {
            for name in names {
                visitor.visit_identifier(name);
            }
            walk_exprs(visitor, expressions);
            visitor.visit_block(body);
        }
        Statement::Function {
            name: FunctionName { path, method },
            body,
            span: _,
        } => {
            for segment in path {
                visitor.visit_identifier(segment);
            }
            if let Some(method) = method {
                visitor.visit_identifier(method);
            }
            visitor.visit_function_body(body);
        }
        Statement::LocalFunction {
            name,
            body,
            span: _,
        } => {
            visitor.visit_identifier(name);
            visitor.visit_function_body(body);
        }
        Statement::Return { values, span: _ } => walk_exprs(visitor, values),
        Statement::Break { span: _ } => {}
        Statement::Goto { label: _, span: _ } => {}
        Statement::Label { name: _, span: _ } => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expression) {
    match expr {
        Expression::Nil { span: _ }
        | Expression::Boolean { .. }
        | Expression::Number { .. }
        | Expression::String { .. }
        | Expression::Vararg { span: _ } => {}
        Expression::Function { body, span: _ } => visitor.visit_function_body(body),
        Expression::Table { fields, span: _ } => {
            for field in fields {
                visitor.visit_table_field(field);
            }
        }
        Expression::Binary {
            left,
            operator: _,
            right,
            span: _,
        } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expression::Unary {
            operator: _,
            operand,
            span: _,
        } => visitor.visit_expr(operand),
        Expression::Identifier { name, span: _ } => visitor.visit_identifier(name),
        Expression::Index {
            object,
            key,
            span: _,
        } => {
            visitor.visit_expr(object);
            visitor.visit_expr(key);
        }
        Expression::Field {
            object,
            name: _,
            span: _,
        } => visitor.visit_expr(object),
        Expression::Call {
            function,
            arguments,
            span: _,
        } => {
            visitor.visit_expr(function);
            walk_exprs(visitor, arguments);
        }
        Expression::MethodCall {
            object,
            method: _,
            arguments,
            span: _,
        } => {
            visitor.visit_expr(object);
            walk_exprs(visitor, arguments);
        }
        Expression::Parenthesized {
            expression,
            span: _,
        } => visitor.visit_expr(expression),
    }
}

pub fn walk_function_body<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    body: &'ast FunctionBody,
) {
    let FunctionBody {
        parameters,
        is_vararg: _,
        body,
        span: _,
    } = body;
    for parameter in parameters {
        visitor.visit_identifier(parameter);
    }
    visitor.visit_block(body);
}

pub fn walk_table_field<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, field: &'ast TableField) {
    match field {
        TableField::Positional(value) => visitor.visit_expr(value),
        TableField::Named { name, value } => {
            visitor.visit_identifier(name);
            visitor.visit_expr(value);
        }
        TableField::Keyed { key, value } => {
            visitor.visit_expr(key);
            visitor.visit_expr(value);
        }
    }
}
