mod common;

use common::Project;
use lunac::{
    diagnostics::Diagnostic,
    module_graph::{ModuleGraph, ModuleId, ModuleKind},
    store::ModuleStore,
};

fn build(project: &Project) -> Result<ModuleGraph, Vec<Diagnostic>> {
    let config = project.config();
    let store = ModuleStore::new(&config.src_dir, &config.extension);
    ModuleGraph::build(&config.entry_module().unwrap(), &store, "compiletime")
}

#[test]
fn diamond_graph_resolves_each_module_once() {
    let project = Project::new("graph_diamond")
        .file("war3map.lua", "local b = require('ui.b')\nlocal c = require('ui.c')\n")
        .file("ui/b.lua", "local d = require('core.d')\nreturn {}\n")
        .file("ui/c.lua", "local d = require('core.d')\nreturn {}\n")
        .file("core/d.lua", "return {}\n");

    let graph = build(&project).unwrap();
    let discovered: Vec<_> = graph.discovery_order().map(|n| n.id.to_string()).collect();
    assert_eq!(discovered, vec!["war3map", "ui.b", "core.d", "ui.c"]);
    assert_eq!(
        discovered.iter().filter(|id| id.as_str() == "core.d").count(),
        1
    );

    let topo: Vec<_> = graph.topo_order().map(|n| n.id.to_string()).collect();
    let position = |id: &str| topo.iter().position(|t| t == id).unwrap();
    assert!(position("core.d") < position("ui.b"));
    assert!(position("core.d") < position("ui.c"));
    assert_eq!(topo.last().map(String::as_str), Some("war3map"));
}

#[test]
fn compile_time_modules_share_the_traversal() {
    let project = Project::new("graph_kinds")
        .file("war3map.lua", "require('compiletime.data')\nrequire('units')\n")
        .file("compiletime/data.lua", "require('units')\nreturn {}\n")
        .file("units.lua", "return {}\n");

    let graph = build(&project).unwrap();
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.entry().kind, ModuleKind::Entry);
    assert_eq!(
        graph.compiletime_modules().map(|n| n.id.to_string()).collect::<Vec<_>>(),
        vec!["compiletime.data"]
    );
    assert_eq!(
        graph.runtime_modules().map(|n| n.id.to_string()).collect::<Vec<_>>(),
        vec!["war3map", "units"]
    );
    let data = graph.node(&ModuleId::parse("compiletime.data").unwrap()).unwrap();
    assert_eq!(data.dependencies().len(), 1);
}

#[test]
fn three_module_cycle_lists_the_path() {
    let project = Project::new("graph_cycle")
        .file("war3map.lua", "require('a')\n")
        .file("a.lua", "require('b')\n")
        .file("b.lua", "require('c')\n")
        .file("c.lua", "require('a')\n");

    let diags = build(&project).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code(), Some("E009"));
    assert!(diags[0].message().unwrap().contains("a -> b -> c -> a"));
}

#[test]
fn every_missing_module_is_reported() {
    let project = Project::new("graph_missing")
        .file("war3map.lua", "require('one')\nrequire('present')\n")
        .file("present.lua", "require('two')\n");

    let diags = build(&project).unwrap_err();
    let codes: Vec<_> = diags.iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, vec!["E001", "E001"]);
    assert_eq!(diags[0].file(), Some("war3map.lua"));
    assert_eq!(diags[1].file(), Some("present.lua"));
    assert!(diags[1].message().unwrap().contains("`present` requires `two`"));
}
