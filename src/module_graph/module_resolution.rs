use crate::{
    ast::{Visitor, walk_expr},
    diagnostics::{Diagnostic, ErrorCode, INVALID_MODULE_NAME, MALFORMED_REQUIRE, position::Span},
    store::SourceFile,
    syntax::{expression::Expression, program::Program},
};

use super::{ModuleId, RequireEdge};

/// Name of the runtime loader whose calls define the module graph.
pub const REQUIRE: &str = "require";

/// Scans every `require(...)` call of a module, in source order. Each call
/// must have exactly one string literal argument naming a valid module.
pub(super) fn resolve_requires(
    file: &SourceFile,
    program: &Program,
) -> (Vec<RequireEdge>, Vec<Diagnostic>) {
    let mut collector = RequireCollector {
        file,
        edges: Vec::new(),
        diagnostics: Vec::new(),
    };
    collector.visit_program(program);
    (collector.edges, collector.diagnostics)
}

/// The module named by a well-formed `require("a.b")` call.
pub fn required_module(expression: &Expression) -> Option<ModuleId> {
    if expression.called_name() != Some(REQUIRE) {
        return None;
    }
    match expression {
        Expression::Call { arguments, .. } => match arguments.as_slice() {
            [Expression::String { value, .. }] => {
                std::str::from_utf8(value).ok().and_then(ModuleId::parse)
            }
            _ => None,
        },
        _ => None,
    }
}

struct RequireCollector<'f> {
    file: &'f SourceFile,
    edges: Vec<RequireEdge>,
    diagnostics: Vec<Diagnostic>,
}

impl RequireCollector<'_> {
    fn error(&mut self, code: &'static ErrorCode, value: &str, span: Span) {
        self.diagnostics.push(Diagnostic::make_error(
            code,
            &[value],
            self.file.display_path.clone(),
            span,
        ));
    }
}

impl<'ast> Visitor<'ast> for RequireCollector<'_> {
    fn visit_expr(&mut self, expr: &'ast Expression) {
        if let Expression::Call {
            arguments, span, ..
        } = expr
            && expr.called_name() == Some(REQUIRE)
        {
            match arguments.as_slice() {
                [Expression::String { value, .. }] => {
                    let name = String::from_utf8_lossy(value).into_owned();
                    match ModuleId::parse(&name) {
                        Some(target) => self.edges.push(RequireEdge {
                            target,
                            span: *span,
                        }),
                        None => self.error(&INVALID_MODULE_NAME, &name, *span),
                    }
                }
                [_] => self.error(&MALFORMED_REQUIRE, "a non-literal argument", *span),
                [] => self.error(&MALFORMED_REQUIRE, "no arguments", *span),
                many => {
                    let found = format!("{} arguments", many.len());
                    self.error(&MALFORMED_REQUIRE, &found, *span);
                }
            }
        }
        walk_expr(self, expr);
    }
}
