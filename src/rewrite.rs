//! Tree rewriter: splices staged values into a runtime module.

use tracing::debug;

use crate::{
    ast::{Folder, fold_block, fold_expr, fold_program, lower_value, replace_call_sites},
    diagnostics::{Diagnostic, ORDINAL_MISMATCH, SERIALIZATION},
    module_graph::required_module,
    stage::StagedValue,
    store::SourceFile,
    syntax::{block::Block, expression::Expression, program::Program, statement::Statement},
};

#[derive(Debug, Clone)]
pub struct RewriteOptions {
    pub marker: String,
    /// Modules under this namespace never ship; requiring one at runtime
    /// yields `nil`.
    pub namespace: String,
}

/// Replaces call site `i` of `program` with the literal form of
/// `values[i - 1]` and strips compile-time requires.
pub fn rewrite(
    file: &SourceFile,
    program: Program,
    values: &[StagedValue],
    options: &RewriteOptions,
) -> Result<Program, Vec<Diagnostic>> {
    let module = file.id.as_str();
    let mut diagnostics = Vec::new();

    let (program, sites) = replace_call_sites(program, &options.marker, |site, call| {
        let Some(value) = values.get(site.ordinal - 1) else {
            return call;
        };
        match lower_value(value, site.span) {
            Ok(literal) => literal,
            Err(err) => {
                diagnostics.push(Diagnostic::make_error(
                    &SERIALIZATION,
                    &[&site.ordinal.to_string(), module, &err.reason],
                    file.display_path.clone(),
                    site.span,
                ));
                call
            }
        }
    });

    if sites.len() != values.len() {
        let span = sites.get(values.len()).map(|site| site.span).unwrap_or_default();
        diagnostics.push(Diagnostic::make_error(
            &ORDINAL_MISMATCH,
            &[module, &sites.len().to_string(), &values.len().to_string()],
            file.display_path.clone(),
            span,
        ));
    }
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let program = CompileTimePruner {
        namespace: &options.namespace,
    }
    .fold_program(program);
    debug!(module, sites = sites.len(), "module rewritten");
    Ok(program)
}

/// Drops what has no meaning at runtime: requires of compile-time modules
/// and call statements whose call was replaced by a value.
struct CompileTimePruner<'a> {
    namespace: &'a str,
}

impl CompileTimePruner<'_> {
    fn is_compiletime_require(&self, expr: &Expression) -> bool {
        required_module(expr).is_some_and(|id| id.is_in_namespace(self.namespace))
    }

    fn keeps(&self, stmt: &Statement) -> bool {
        match stmt {
            Statement::Call { call, .. } => call.is_call() && !self.is_compiletime_require(call),
            _ => true,
        }
    }

    fn prune(&self, statements: Vec<Statement>) -> Vec<Statement> {
        statements.into_iter().filter(|stmt| self.keeps(stmt)).collect()
    }
}

impl Folder for CompileTimePruner<'_> {
    fn fold_program(&mut self, program: Program) -> Program {
        let Program { statements, span } = program;
        let statements = self.prune(statements);
        fold_program(self, Program { statements, span })
    }

    fn fold_block(&mut self, block: Block) -> Block {
        let Block { statements, span } = block;
        let statements = self.prune(statements);
        fold_block(self, Block { statements, span })
    }

    fn fold_expr(&mut self, expr: Expression) -> Expression {
        if self.is_compiletime_require(&expr) {
            return Expression::Nil { span: expr.span() };
        }
        fold_expr(self, expr)
    }
}

#[cfg(test)]
mod rewrite_test;
