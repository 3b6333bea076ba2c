mod common;

use common::Project;
use lunac::{
    diagnostics::Diagnostic,
    module_graph::ModuleGraph,
    stage::{StageOptions, StagedResultTable, StagedValue, evaluate},
    store::ModuleStore,
};

fn stage(project: &Project) -> Result<StagedResultTable, Vec<Diagnostic>> {
    let config = project.config();
    let store = ModuleStore::new(&config.src_dir, &config.extension);
    let graph = ModuleGraph::build(&config.entry_module().unwrap(), &store, "compiletime")?;
    evaluate(
        &graph,
        &store,
        &StageOptions {
            src_dir: config.src_dir.clone(),
            dst_dir: config.dst_dir.clone(),
            marker: config.compiletime_marker.clone(),
        },
    )
}

fn text(value: &str) -> StagedValue {
    StagedValue::String(value.as_bytes().to_vec())
}

#[test]
fn sites_called_from_another_module_keep_their_ordinals() {
    // `units` defines three sites inside functions; the entry calls them in
    // reverse order, so execution order is 3, 2, 1.
    let project = Project::new("stage_cross_module")
        .file(
            "units.lua",
            r#"
local M = {}
function M.first() return compiletime("one") end
function M.second() return compiletime("two") end
function M.third() return compiletime("three") end
return M
"#,
        )
        .file(
            "war3map.lua",
            "local units = require('units')\nunits.third()\nunits.second()\nunits.first()\n",
        );

    let table = stage(&project).unwrap();
    assert_eq!(
        table.values("units"),
        &[text("one"), text("two"), text("three")]
    );
    assert!(table.values("war3map").is_empty());
}

#[test]
fn compile_time_module_reads_project_files() {
    let project = Project::new("stage_files")
        .file("data/names.txt", "footman\nknight\n")
        .file(
            "compiletime/names.lua",
            r#"
local names = {}
for line in io.lines(__src_dir .. "/data/names.txt") do
    names[#names + 1] = line
end
return names
"#,
        )
        .file(
            "war3map.lua",
            "local NAMES = compiletime(require('compiletime.names'))\n",
        );

    let table = stage(&project).unwrap();
    let [StagedValue::Table(names)] = table.values("war3map") else {
        panic!("expected one table");
    };
    assert_eq!(names.array, vec![text("footman"), text("knight")]);
}

#[test]
fn runtime_module_not_required_by_the_entry_still_runs() {
    let project = Project::new("stage_unreached")
        .file("war3map.lua", "if false then require('late') end\n")
        .file("late.lua", "return compiletime(7)\n");

    let table = stage(&project).unwrap();
    assert_eq!(table.values("late"), &[StagedValue::Integer(7)]);
}

#[test]
fn values_are_read_after_finalize_hooks() {
    let project = Project::new("stage_finalize")
        .file(
            "compiletime/registry.lua",
            r#"
Registry = { abilities = {} }
on_finalize(function()
    table.sort(Registry.abilities)
end)
"#,
        )
        .file(
            "war3map.lua",
            r#"
require('compiletime.registry')
local ALL = compiletime(Registry.abilities)
require('spells')
"#,
        )
        .file(
            "spells.lua",
            r#"
compiletime(function() table.insert(Registry.abilities, "storm") end)
compiletime(function() table.insert(Registry.abilities, "blink") end)
"#,
        );

    let table = stage(&project).unwrap();
    let [StagedValue::Table(all)] = table.values("war3map") else {
        panic!("expected one table");
    };
    assert_eq!(all.array, vec![text("blink"), text("storm")]);
    assert_eq!(table.values("spells"), &[StagedValue::Nil, StagedValue::Nil]);
}

#[test]
fn compile_time_require_cycle_is_an_evaluation_error() {
    let project = Project::new("stage_dynamic_cycle")
        .file("war3map.lua", "require('compiletime.a')\n")
        .file("compiletime/a.lua", "local load = require\nload('compiletime.b')\n")
        .file("compiletime/b.lua", "local load = require\nload('compiletime.a')\n");

    let diags = stage(&project).unwrap_err();
    assert_eq!(diags[0].code(), Some("E003"));
    assert!(diags[0].message().unwrap().contains("require cycle"));
}
