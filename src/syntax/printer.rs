//! Turns a syntax tree back into Lua source.
//!
//! Output is canonical rather than a copy of the input: four-space
//! indentation, one statement per line, strings in double quotes. Grouping
//! parentheses are emitted wherever precedence or syntax demands them, so a
//! tree built by hand (a spliced literal in a call position, a negative
//! number under `^`) still prints to code that reads back the same.

use crate::syntax::{
    block::Block,
    diagnostics::position::Position,
    expression::{Expression, FunctionBody, TableField, UnaryOperator},
    precedence::{Assoc, Precedence},
    program::Program,
    statement::{IfClause, LocalName, Statement},
};

const INDENT: &str = "    ";

pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::new(false);
    printer.statements(&program.statements);
    printer.finish()
}

/// Like [`print_program`], but pads with blank lines so that each statement
/// starts on the line it had in the source. Statements sharing a source line
/// share an output line.
pub fn print_program_preserving_lines(program: &Program) -> String {
    let mut printer = Printer::new(true);
    printer.statements(&program.statements);
    printer.finish()
}

pub fn print_expression(expression: &Expression) -> String {
    let mut printer = Printer::new(false);
    printer.expression(expression);
    printer.out
}

/// Quotes a byte string as a Lua string literal.
pub fn quote_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    match std::str::from_utf8(bytes) {
        Ok(text) => {
            for ch in text.chars() {
                if ch.is_ascii() {
                    push_escaped_ascii(&mut out, ch as u8);
                } else {
                    out.push(ch);
                }
            }
        }
        Err(_) => {
            for &byte in bytes {
                if byte.is_ascii() {
                    push_escaped_ascii(&mut out, byte);
                } else {
                    out.push_str(&format!("\\{:03}", byte));
                }
            }
        }
    }
    out.push('"');
    out
}

fn push_escaped_ascii(out: &mut String, byte: u8) {
    match byte {
        b'"' => out.push_str("\\\""),
        b'\\' => out.push_str("\\\\"),
        b'\n' => out.push_str("\\n"),
        b'\r' => out.push_str("\\r"),
        b'\t' => out.push_str("\\t"),
        0x07 => out.push_str("\\a"),
        0x08 => out.push_str("\\b"),
        0x0b => out.push_str("\\v"),
        0x0c => out.push_str("\\f"),
        // Always three digits so a following digit is not absorbed.
        b if b < 0x20 || b == 0x7f => out.push_str(&format!("\\{:03}", b)),
        b => out.push(b as char),
    }
}

fn precedence_of(expression: &Expression) -> Precedence {
    match expression {
        Expression::Binary { operator, .. } => operator.precedence(),
        Expression::Unary { .. } => Precedence::Unary,
        _ => Precedence::Primary,
    }
}

struct Printer {
    out: String,
    indent: usize,
    /// 1-based line the cursor is on.
    line: usize,
    preserve_lines: bool,
}

impl Printer {
    fn new(preserve_lines: bool) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            line: 1,
            preserve_lines,
        }
    }

    fn finish(mut self) -> String {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.line += 1;
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn begin_statement(&mut self, position: Position) {
        if self.preserve_lines {
            if position.is_known() && position.line > self.line {
                while self.line < position.line {
                    self.newline();
                }
                self.write_indent();
            } else if !self.at_line_start() {
                self.write(" ");
            }
            return;
        }

        if !self.out.is_empty() {
            self.newline();
        }
        self.write_indent();
    }

    /// Separator before `end`, `else`, `elseif` and `until`.
    fn begin_keyword(&mut self) {
        if self.preserve_lines {
            self.write(" ");
        } else {
            self.newline();
            self.write_indent();
        }
    }

    // ── statements ──────────────────────────────────────────────────────────

    fn statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.statement(statement);
        }
    }

    fn block(&mut self, block: &Block) {
        self.indent += 1;
        self.statements(&block.statements);
        self.indent -= 1;
    }

    /// Block followed by `keyword`; empty blocks stay on one line.
    fn block_then(&mut self, block: &Block, keyword: &str) {
        if block.is_empty() {
            self.write(" ");
        } else {
            self.block(block);
            self.begin_keyword();
        }
        self.write(keyword);
    }

    fn statement(&mut self, statement: &Statement) {
        self.begin_statement(statement.position());
        let start = self.out.len();

        match statement {
            Statement::Local { names, values, .. } => {
                self.write("local ");
                self.local_names(names);
                if !values.is_empty() {
                    self.write(" = ");
                    self.expression_list(values);
                }
            }
            Statement::Assign {
                targets, values, ..
            } => {
                self.expression_list(targets);
                self.write(" = ");
                self.expression_list(values);
                self.guard_leading_paren(start);
            }
            Statement::Call { call, .. } => {
                self.expression(call);
                self.guard_leading_paren(start);
            }
            Statement::Do { body, .. } => {
                self.write("do");
                self.block_then(body, "end");
            }
            Statement::While {
                condition, body, ..
            } => {
                self.write("while ");
                self.expression(condition);
                self.write(" do");
                self.block_then(body, "end");
            }
            Statement::Repeat {
                body, condition, ..
            } => {
                self.write("repeat");
                self.block_then(body, "until ");
                self.expression(condition);
            }
            Statement::If {
                clauses, else_body, ..
            } => self.if_statement(clauses, else_body.as_ref()),
            Statement::NumericFor {
                variable,
                start: first,
                limit,
                step,
                body,
                ..
            } => {
                self.write("for ");
                self.write(variable);
                self.write(" = ");
                self.expression(first);
                self.write(", ");
                self.expression(limit);
                if let Some(step) = step {
                    self.write(", ");
                    self.expression(step);
                }
                self.write(" do");
                self.block_then(body, "end");
            }
            Statement::GenericFor {
                names,
                expressions,
                body,
                ..
            } => {
                self.write("for ");
                self.write(&names.join(", "));
                self.write(" in ");
                self.expression_list(expressions);
                self.write(" do");
                self.block_then(body, "end");
            }
            Statement::Function { name, body, .. } => {
                self.write("function ");
                self.write(&name.path.join("."));
                if let Some(method) = &name.method {
                    self.write(":");
                    self.write(method);
                }
                self.function_body(body);
            }
            Statement::LocalFunction { name, body, .. } => {
                self.write("local function ");
                self.write(name);
                self.function_body(body);
            }
            Statement::Return { values, .. } => {
                self.write("return");
                if !values.is_empty() {
                    self.write(" ");
                    self.expression_list(values);
                }
            }
            Statement::Break { .. } => self.write("break"),
            Statement::Goto { label, .. } => {
                self.write("goto ");
                self.write(label);
            }
            Statement::Label { name, .. } => {
                self.write("::");
                self.write(name);
                self.write("::");
            }
        }
    }

    /// A statement starting with `(` would continue a call on the previous
    /// line, so it gets a leading `;`.
    fn guard_leading_paren(&mut self, start: usize) {
        if self.out[start..].starts_with('(') {
            self.out.insert(start, ';');
        }
    }

    fn local_names(&mut self, names: &[LocalName]) {
        for (index, local) in names.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            self.write(&local.name);
            if let Some(attribute) = &local.attribute {
                self.write(" <");
                self.write(attribute);
                self.write(">");
            }
        }
    }

    fn if_statement(&mut self, clauses: &[IfClause], else_body: Option<&Block>) {
        for (index, clause) in clauses.iter().enumerate() {
            if index == 0 {
                self.write("if ");
            } else {
                self.begin_keyword();
                self.write("elseif ");
            }
            self.expression(&clause.condition);
            self.write(" then");
            self.block(&clause.body);
        }
        if let Some(else_body) = else_body {
            self.begin_keyword();
            self.write("else");
            self.block(else_body);
        }
        self.begin_keyword();
        self.write("end");
    }

    fn function_body(&mut self, body: &FunctionBody) {
        self.write("(");
        self.write(&body.parameters.join(", "));
        if body.is_vararg {
            if !body.parameters.is_empty() {
                self.write(", ");
            }
            self.write("...");
        }
        self.write(")");
        self.block_then(&body.body, "end");
    }

    // ── expressions ─────────────────────────────────────────────────────────

    fn expression_list(&mut self, expressions: &[Expression]) {
        for (index, expression) in expressions.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            self.expression(expression);
        }
    }

    fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Nil { .. } => self.write("nil"),
            Expression::Boolean { value, .. } => self.write(if *value { "true" } else { "false" }),
            Expression::Number { text, .. } => self.write(text),
            Expression::String { value, .. } => self.write(&quote_string(value)),
            Expression::Vararg { .. } => self.write("..."),
            Expression::Function { body, .. } => {
                self.write("function");
                self.function_body(body);
            }
            Expression::Table { fields, .. } => self.table(fields),
            Expression::Binary {
                left,
                operator,
                right,
                ..
            } => {
                let precedence = operator.precedence();
                let assoc = operator.associativity();

                let left_precedence = precedence_of(left);
                let wrap_left = left_precedence < precedence
                    || (left_precedence == precedence && assoc == Assoc::Right);
                self.grouped(left, wrap_left);

                self.write(" ");
                self.write(operator.as_str());
                self.write(" ");

                let right_precedence = precedence_of(right);
                let wrap_right = !matches!(right.as_ref(), Expression::Unary { .. })
                    && (right_precedence < precedence
                        || (right_precedence == precedence && assoc == Assoc::Left));
                self.grouped(right, wrap_right);
            }
            Expression::Unary {
                operator, operand, ..
            } => {
                self.write(operator.as_str());
                if *operator == UnaryOperator::Not {
                    self.write(" ");
                }
                let start = self.out.len();
                self.grouped(operand, precedence_of(operand) < Precedence::Unary);
                // `- -x` must not print as the comment `--x`.
                if *operator == UnaryOperator::Negate && self.out[start..].starts_with('-') {
                    self.out.insert(start, ' ');
                }
            }
            Expression::Identifier { name, .. } => self.write(name),
            Expression::Index { object, key, .. } => {
                self.prefix(object);
                self.write("[");
                self.expression(key);
                self.write("]");
            }
            Expression::Field { object, name, .. } => {
                self.prefix(object);
                self.write(".");
                self.write(name);
            }
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                self.prefix(function);
                self.write("(");
                self.expression_list(arguments);
                self.write(")");
            }
            Expression::MethodCall {
                object,
                method,
                arguments,
                ..
            } => {
                self.prefix(object);
                self.write(":");
                self.write(method);
                self.write("(");
                self.expression_list(arguments);
                self.write(")");
            }
            Expression::Parenthesized { expression, .. } => self.grouped(expression, true),
        }
    }

    fn grouped(&mut self, expression: &Expression, wrap: bool) {
        if wrap {
            self.write("(");
            self.expression(expression);
            self.write(")");
        } else {
            self.expression(expression);
        }
    }

    /// Callee or indexed object: anything but a name, index, call or
    /// parenthesized expression needs parentheses here.
    fn prefix(&mut self, expression: &Expression) {
        self.grouped(expression, !expression.is_prefix_expression());
    }

    fn table(&mut self, fields: &[TableField]) {
        if fields.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        for (index, field) in fields.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            match field {
                TableField::Positional(value) => self.expression(value),
                TableField::Named { name, value } => {
                    self.write(name);
                    self.write(" = ");
                    self.expression(value);
                }
                TableField::Keyed { key, value } => {
                    self.write("[");
                    self.expression(key);
                    self.write("] = ");
                    self.expression(value);
                }
            }
        }
        self.write("}");
    }
}
