//! One full build: resolve, evaluate, rewrite, wrap, link, write.

use std::{collections::HashMap, fs, path::PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{
    config::BuildConfig,
    diagnostics::{Diagnostic, rendering::render_diagnostics},
    ice,
    link::{link, require_shim, wrap, write_artifact},
    module_graph::{ModuleGraph, ModuleId, ModuleKind},
    rewrite::{RewriteOptions, rewrite},
    stage::{StageOptions, evaluate},
    store::ModuleStore,
    syntax::print_program,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleReport {
    pub id: ModuleId,
    pub kind: ModuleKind,
    pub path: String,
    pub call_sites: usize,
}

/// Summary of a successful build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub entry: ModuleId,
    /// Every module of the graph, in discovery order.
    pub modules: Vec<ModuleReport>,
    /// Wrapped modules in the order they appear in the artifact.
    pub link_order: Vec<ModuleId>,
    pub output: PathBuf,
    pub bytes: usize,
    pub sha256: String,
}

/// Runs the whole build. Nothing is written unless every stage succeeded.
pub fn compile(config: &BuildConfig) -> Result<BuildReport, Vec<Diagnostic>> {
    config.validate()?;
    let entry = config.entry_module().map_err(|diag| vec![*diag])?;
    let store = ModuleStore::new(&config.src_dir, &config.extension);

    info!(entry = %entry, src = %config.src_dir.display(), "resolving modules");
    let graph = ModuleGraph::build(&entry, &store, &config.compiletime_namespace)?;
    info!(
        modules = graph.len(),
        compiletime = graph.compiletime_modules().count(),
        "module graph ready"
    );

    let staged = evaluate(
        &graph,
        &store,
        &StageOptions {
            src_dir: config.src_dir.clone(),
            dst_dir: config.dst_dir.clone(),
            marker: config.compiletime_marker.clone(),
        },
    )?;

    let options = RewriteOptions {
        marker: config.compiletime_marker.clone(),
        namespace: config.compiletime_namespace.clone(),
    };
    let mut diagnostics = Vec::new();
    let mut wrapped = Vec::new();
    let mut link_order = Vec::new();
    let mut entry_program = None;

    for node in graph.topo_order() {
        if node.kind == ModuleKind::CompileTime {
            continue;
        }
        let values = staged.values(node.id.as_str());
        let program = match rewrite(&node.file, node.program.clone(), values, &options) {
            Ok(program) => program,
            Err(diags) => {
                diagnostics.extend(diags);
                continue;
            }
        };

        if node.kind == ModuleKind::Entry {
            entry_program = Some(wrap(&node.id, program, true));
        } else {
            wrapped.push(wrap(&node.id, program, false));
            link_order.push(node.id.clone());
        }
    }
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let entry_program =
        entry_program.ok_or_else(|| vec![ice!("entry module missing from the link order")])?;
    let shim = require_shim().map_err(|diag| vec![*diag])?;
    let text = print_program(&link(shim, wrapped, entry_program));

    let output = write_artifact(&config.dst_dir, &config.output_name, &text)
        .map_err(|diag| vec![*diag])?;
    info!(output = %output.display(), bytes = text.len(), "build finished");

    let modules = graph
        .discovery_order()
        .map(|node| ModuleReport {
            id: node.id.clone(),
            kind: node.kind,
            path: node.file.display_path.clone(),
            call_sites: staged.values(node.id.as_str()).len(),
        })
        .collect();

    Ok(BuildReport {
        entry,
        modules,
        link_order,
        output,
        bytes: text.len(),
        sha256: to_hex(&hash_bytes(text.as_bytes())),
    })
}

pub fn hash_bytes(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Renders a failed build's diagnostics with snippets from the source tree.
pub fn render_failure(config: &BuildConfig, diagnostics: &[Diagnostic]) -> String {
    let sources: HashMap<&str, String> = diagnostics
        .iter()
        .filter_map(|diag| diag.file())
        .filter_map(|file| {
            let text = fs::read_to_string(config.src_dir.join(file)).ok()?;
            Some((file, text))
        })
        .collect();
    render_diagnostics(diagnostics, |file| sources.get(file).map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_input() {
        assert_eq!(
            to_hex(&hash_bytes(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
