//! The require graph of a project.
//!
//! Discovery starts at the entry module and follows every `require("x")`
//! call found anywhere in a module's syntax tree. Modules under the
//! compile-time namespace are part of the graph like any other; the
//! pipeline later decides which ones run at build time and which ones are
//! linked into the artifact.

mod module_name;
mod module_order;
mod module_resolution;


use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, MODULE_NOT_FOUND, position::Span},
    store::{ModuleStore, SourceFile},
    syntax::program::Program,
};

pub use module_name::{ModuleId, is_valid_module_name};
pub use module_resolution::{REQUIRE, required_module};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Entry,
    Runtime,
    #[serde(rename = "compiletime")]
    CompileTime,
}

/// One `require("target")` call inside a module.
#[derive(Debug, Clone, PartialEq)]
pub struct RequireEdge {
    pub target: ModuleId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ModuleNode {
    pub id: ModuleId,
    pub kind: ModuleKind,
    pub file: SourceFile,
    pub program: Program,
    pub requires: Vec<RequireEdge>,
}

impl ModuleNode {
    /// Distinct required modules, first occurrence first.
    pub fn dependencies(&self) -> Vec<&ModuleId> {
        let mut seen = HashSet::new();
        self.requires
            .iter()
            .map(|edge| &edge.target)
            .filter(|target| seen.insert(*target))
            .collect()
    }
}

#[derive(Debug)]
pub struct ModuleGraph {
    entry: ModuleId,
    /// Keyed in discovery (pre-order) order.
    nodes: IndexMap<ModuleId, ModuleNode>,
    order: Vec<ModuleId>,
}

impl ModuleGraph {
    /// Loads and parses the entry and everything it transitively requires.
    /// All problems found along the way are reported together.
    pub fn build(
        entry: &ModuleId,
        store: &ModuleStore,
        namespace: &str,
    ) -> Result<ModuleGraph, Vec<Diagnostic>> {
        let mut builder = GraphBuilder {
            store,
            entry,
            namespace,
            nodes: IndexMap::new(),
            failed: HashSet::new(),
            diagnostics: Vec::new(),
        };
        builder.discover(entry);

        let GraphBuilder {
            nodes, diagnostics, ..
        } = builder;
        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }

        let order = module_order::topo_order(&nodes, entry).map_err(|diag| vec![*diag])?;
        debug!(modules = nodes.len(), "require graph resolved");

        Ok(ModuleGraph {
            entry: entry.clone(),
            nodes,
            order,
        })
    }

    pub fn entry(&self) -> &ModuleNode {
        &self.nodes[&self.entry]
    }

    pub fn entry_id(&self) -> &ModuleId {
        &self.entry
    }

    pub fn node(&self, id: &ModuleId) -> Option<&ModuleNode> {
        self.nodes.get(id)
    }

    pub fn kind(&self, id: &ModuleId) -> Option<ModuleKind> {
        self.nodes.get(id).map(|node| node.kind)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every module, each exactly once, in the order it was first reached.
    pub fn discovery_order(&self) -> impl Iterator<Item = &ModuleNode> {
        self.nodes.values()
    }

    /// Dependencies before dependents; the entry is last.
    pub fn topo_order(&self) -> impl Iterator<Item = &ModuleNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Modules under the compile-time namespace, in discovery order.
    pub fn compiletime_modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.discovery_order()
            .filter(|node| node.kind == ModuleKind::CompileTime)
    }

    /// Modules that end up in the artifact (the entry included), in
    /// discovery order.
    pub fn runtime_modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.discovery_order()
            .filter(|node| node.kind != ModuleKind::CompileTime)
    }
}

struct GraphBuilder<'a> {
    store: &'a ModuleStore,
    entry: &'a ModuleId,
    namespace: &'a str,
    nodes: IndexMap<ModuleId, ModuleNode>,
    failed: HashSet<ModuleId>,
    diagnostics: Vec<Diagnostic>,
}

impl GraphBuilder<'_> {
    fn kind_of(&self, id: &ModuleId) -> ModuleKind {
        if id == self.entry {
            ModuleKind::Entry
        } else if id.is_in_namespace(self.namespace) {
            ModuleKind::CompileTime
        } else {
            ModuleKind::Runtime
        }
    }

    fn discover(&mut self, id: &ModuleId) {
        if self.nodes.contains_key(id) || self.failed.contains(id) {
            return;
        }

        let file = match self.store.load(id) {
            Ok(file) => file,
            Err(diag) => {
                self.failed.insert(id.clone());
                self.diagnostics.push(*diag);
                return;
            }
        };

        let program = match self.store.parse(&file) {
            Ok(program) => program,
            Err(diags) => {
                self.failed.insert(id.clone());
                self.diagnostics.extend(diags);
                return;
            }
        };

        let (requires, diags) = module_resolution::resolve_requires(&file, &program);
        self.diagnostics.extend(diags);

        let mut targets = Vec::new();
        for edge in &requires {
            if self.store.contains(&edge.target) {
                if !targets.contains(&edge.target) {
                    targets.push(edge.target.clone());
                }
                continue;
            }
            if self.failed.insert(edge.target.clone()) {
                let expected = self.store.path_for(&edge.target);
                self.diagnostics.push(Diagnostic::make_error(
                    &MODULE_NOT_FOUND,
                    &[
                        id.as_str(),
                        edge.target.as_str(),
                        &expected.display().to_string(),
                    ],
                    file.display_path.clone(),
                    edge.span,
                ));
            }
        }

        debug!(module = %id, requires = targets.len(), "discovered module");
        self.nodes.insert(
            id.clone(),
            ModuleNode {
                id: id.clone(),
                kind: self.kind_of(id),
                file,
                program,
                requires,
            },
        );

        for target in &targets {
            self.discover(target);
        }
    }
}
