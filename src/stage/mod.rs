//! Stage evaluator: runs compile-time code and collects the staged values.
//!
//! Runtime modules are executed in instrumented form, where call site `i`
//! of module `m` reports its value as `(m, i)`. Ordinals come from
//! [`crate::ast::replace_call_sites`], the same traversal the rewriter
//! uses, so a recorded value always belongs to the site that produced it
//! no matter when or from where that site ran.

mod instrument;
mod interpreter;
mod value;

use std::{collections::HashMap, path::PathBuf};

use tracing::{info, warn};

use crate::{
    diagnostics::{Diagnostic, REPEATED_CALL_SITE, UNEVALUATED_CALL_SITE},
    module_graph::{ModuleGraph, ModuleKind},
    store::ModuleStore,
};

pub use instrument::{InstrumentedModule, STAGE_FUNCTION, instrument};
pub use interpreter::{Chunk, Interpreter};
pub use value::{StagedModule, StagedResultTable, StagedTable, StagedValue};

#[derive(Debug, Clone)]
pub struct StageOptions {
    pub src_dir: PathBuf,
    pub dst_dir: PathBuf,
    /// Name of the compile-time marker function, `compiletime` by default.
    pub marker: String,
}

/// Runs the build's compile-time code and returns the staged values of
/// every runtime module, in module discovery order.
pub fn evaluate(
    graph: &ModuleGraph,
    store: &ModuleStore,
    options: &StageOptions,
) -> Result<StagedResultTable, Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();
    let mut chunks = HashMap::new();
    let mut instrumented = Vec::new();

    for node in graph.discovery_order() {
        if node.kind == ModuleKind::CompileTime {
            chunks.insert(
                node.id.to_string(),
                Chunk {
                    display_path: node.file.display_path.clone(),
                    source: node.file.source.clone(),
                },
            );
            continue;
        }

        match instrument(node, &options.marker) {
            Ok(module) => {
                chunks.insert(
                    module.id.to_string(),
                    Chunk {
                        display_path: module.display_path.clone(),
                        source: module.source.clone(),
                    },
                );
                instrumented.push(module);
            }
            Err(diags) => diagnostics.extend(diags),
        }
    }
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let interpreter = Interpreter::new(
        &options.src_dir,
        &options.dst_dir,
        &options.marker,
        store.clone(),
        chunks,
    )
    .map_err(|diag| vec![*diag])?;

    for node in graph.compiletime_modules() {
        interpreter.run_module(&node.id).map_err(|diag| vec![*diag])?;
    }
    interpreter
        .run_module(graph.entry_id())
        .map_err(|diag| vec![*diag])?;
    for node in graph.runtime_modules() {
        if !interpreter.is_loaded(&node.id) {
            warn!(module = %node.id, "module never required at compile time, running it directly");
            interpreter.run_module(&node.id).map_err(|diag| vec![*diag])?;
        }
    }
    interpreter.finalize().map_err(|diag| vec![*diag])?;

    let table = collect(&interpreter, &instrumented)?;
    info!(
        modules = table.len(),
        values = table.modules().map(|(_, values)| values.len()).sum::<usize>(),
        "compile-time evaluation finished"
    );
    Ok(table)
}

/// Reads every site's value after all compile-time code has finished.
/// Each site must have run exactly once.
fn collect(
    interpreter: &Interpreter,
    modules: &[InstrumentedModule],
) -> Result<StagedResultTable, Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();
    let mut table = StagedResultTable::new();

    for module in modules {
        let name = module.id.as_str();
        let mut values = Vec::with_capacity(module.sites.len());
        for site in &module.sites {
            let ordinal = site.ordinal.to_string();
            match interpreter.evaluation_count(name, site.ordinal) {
                0 => diagnostics.push(Diagnostic::make_error(
                    &UNEVALUATED_CALL_SITE,
                    &[&ordinal, name],
                    module.display_path.clone(),
                    site.span,
                )),
                1 => match interpreter.staged_value(name, site.ordinal) {
                    Ok(value) => values.push(value),
                    Err(diag) => diagnostics.push(*diag),
                },
                count => diagnostics.push(Diagnostic::make_error(
                    &REPEATED_CALL_SITE,
                    &[&ordinal, name, &count.to_string()],
                    module.display_path.clone(),
                    site.span,
                )),
            }
        }
        table.insert(name, values);
    }

    if diagnostics.is_empty() {
        Ok(table)
    } else {
        Err(diagnostics)
    }
}

#[cfg(test)]
mod stage_test;
