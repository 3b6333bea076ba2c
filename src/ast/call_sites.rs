//! Compile-time call sites.
//!
//! A call site is an outermost call `marker(...)` in a module, numbered from
//! 1 in depth-first, left-to-right source order. Calls nested inside a
//! site's arguments belong to that site. [`replace_call_sites`] is the only
//! place ordinals are assigned: the stage evaluator uses it to instrument a
//! module before running it and the rewriter uses it to splice in values,
//! so both always agree on which ordinal names which call.

use crate::{
    diagnostics::position::Span,
    syntax::{expression::Expression, program::Program},
};

use super::fold::{Folder, fold_expr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// 1-based position among the module's call sites.
    pub ordinal: usize,
    pub span: Span,
    pub argument_count: usize,
}

/// True for `marker(...)`, including the `marker "s"` and `marker {...}` forms.
pub fn is_marker_call(expression: &Expression, marker: &str) -> bool {
    expression.called_name() == Some(marker)
}

/// Rebuilds `program`, handing every call site to `replace` together with
/// the call expression it stands for. Returns the new tree and the sites in
/// ordinal order.
pub fn replace_call_sites<F>(program: Program, marker: &str, replace: F) -> (Program, Vec<CallSite>)
where
    F: FnMut(&CallSite, Expression) -> Expression,
{
    let mut replacer = CallSiteReplacer {
        marker,
        sites: Vec::new(),
        replace,
    };
    let program = replacer.fold_program(program);
    (program, replacer.sites)
}

/// Lists the call sites of `program` without changing it.
pub fn call_sites(program: &Program, marker: &str) -> Vec<CallSite> {
    let (_, sites) = replace_call_sites(program.clone(), marker, |_, call| call);
    sites
}

struct CallSiteReplacer<'m, F> {
    marker: &'m str,
    sites: Vec<CallSite>,
    replace: F,
}

impl<F> Folder for CallSiteReplacer<'_, F>
where
    F: FnMut(&CallSite, Expression) -> Expression,
{
    fn fold_expr(&mut self, expr: Expression) -> Expression {
        if !is_marker_call(&expr, self.marker) {
            return fold_expr(self, expr);
        }

        let argument_count = match &expr {
            Expression::Call { arguments, .. } => arguments.len(),
            _ => 0,
        };
        let site = CallSite {
            ordinal: self.sites.len() + 1,
            span: expr.span(),
            argument_count,
        };
        let replaced = (self.replace)(&site, expr);
        self.sites.push(site);
        replaced
    }
}
