use std::path::{Path, PathBuf};

use crate::{
    diagnostics::Diagnostic,
    module_graph::{ModuleGraph, ModuleId},
    store::ModuleStore,
};

use super::{StageOptions, StagedResultTable, StagedValue, evaluate};

fn temp_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let pid = std::process::id();
    path.push(format!("lunac_stage_{}_{}_{}", name, pid, nanos));
    std::fs::create_dir_all(&path).unwrap();
    path
}

fn write(root: &Path, relative: &str, source: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, source).unwrap();
}

fn run(root: &Path) -> Result<StagedResultTable, Vec<Diagnostic>> {
    let store = ModuleStore::new(root, "lua");
    let entry = ModuleId::parse("war3map").unwrap();
    let graph = ModuleGraph::build(&entry, &store, "compiletime")?;
    let options = StageOptions {
        src_dir: root.to_path_buf(),
        dst_dir: root.join("out"),
        marker: "compiletime".to_string(),
    };
    evaluate(&graph, &store, &options)
}

fn string(text: &str) -> StagedValue {
    StagedValue::String(text.as_bytes().to_vec())
}

#[test]
fn values_follow_site_order_not_execution_order() {
    let root = temp_dir("order");
    write(
        &root,
        "war3map.lua",
        r#"
local function later() return compiletime(1 + 1) end
local a = compiletime("first")
local b = later()
"#,
    );

    let table = run(&root).unwrap();
    assert_eq!(
        table.values("war3map"),
        &[StagedValue::Integer(2), string("first")]
    );
}

#[test]
fn sites_in_required_modules_are_recorded_per_module() {
    let root = temp_dir("per_module");
    write(&root, "war3map.lua", "local lib = require('lib')\nlocal x = compiletime(10)\n");
    write(&root, "lib.lua", "return { value = compiletime(42) }\n");

    let table = run(&root).unwrap();
    assert_eq!(table.values("lib"), &[StagedValue::Integer(42)]);
    assert_eq!(table.values("war3map"), &[StagedValue::Integer(10)]);
}

#[test]
fn function_argument_is_called_and_nested_markers_run_inline() {
    let root = temp_dir("function_arg");
    write(
        &root,
        "war3map.lua",
        "local a = compiletime(function() return 'made' end)\nlocal b = compiletime(compiletime(2) + 1)\n",
    );

    let table = run(&root).unwrap();
    assert_eq!(
        table.values("war3map"),
        &[string("made"), StagedValue::Integer(3)]
    );
}

#[test]
fn finalize_hooks_run_before_values_are_read() {
    let root = temp_dir("finalize");
    write(
        &root,
        "compiletime/units.lua",
        "Units = { names = {} }\non_finalize(function() Units.count = #Units.names end)\n",
    );
    write(
        &root,
        "war3map.lua",
        r#"
require('compiletime.units')
local units = compiletime(function()
    table.insert(Units.names, "footman")
    return Units
end)
"#,
    );

    let table = run(&root).unwrap();
    let [StagedValue::Table(units)] = table.values("war3map") else {
        panic!("expected one table value");
    };
    assert!(
        units
            .hash
            .iter()
            .any(|(key, value)| *key == string("count") && *value == StagedValue::Integer(1))
    );
}

#[test]
fn build_directories_are_visible_to_compile_time_code() {
    let root = temp_dir("dirs");
    write(&root, "war3map.lua", "local src = compiletime(__src_dir)\n");

    let table = run(&root).unwrap();
    assert_eq!(
        table.values("war3map"),
        &[string(&root.to_string_lossy())]
    );
}

#[test]
fn site_that_never_runs_is_reported() {
    let root = temp_dir("unevaluated");
    write(&root, "war3map.lua", "if false then\n  local x = compiletime(1)\nend\n");

    let diags = run(&root).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code(), Some("E006"));
    assert_eq!(diags[0].file(), Some("war3map.lua"));
}

#[test]
fn site_that_runs_twice_is_reported() {
    let root = temp_dir("repeated");
    write(&root, "war3map.lua", "for i = 1, 2 do\n  local x = compiletime(i)\nend\n");

    let diags = run(&root).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code(), Some("E007"));
    assert!(diags[0].message().unwrap().contains("evaluated 2 times"));
}

#[test]
fn marker_with_two_arguments_is_rejected() {
    let root = temp_dir("malformed");
    write(&root, "war3map.lua", "local x = compiletime(1, 2)\n");

    let diags = run(&root).unwrap_err();
    assert_eq!(diags[0].code(), Some("E008"));
    assert!(diags[0].message().unwrap().contains("found 2"));
}

#[test]
fn errors_name_the_innermost_failing_module() {
    let root = temp_dir("eval_error");
    write(&root, "war3map.lua", "local a = require('a')\n");
    write(&root, "a.lua", "local x = 1\nerror('boom')\n");

    let diags = run(&root).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code(), Some("E003"));
    assert_eq!(diags[0].file(), Some("a.lua"));
    let message = diags[0].message().unwrap();
    assert!(message.contains("`a`"));
    assert!(message.contains("boom"));
}

#[test]
fn compile_time_module_errors_are_reported() {
    let root = temp_dir("ct_error");
    write(&root, "war3map.lua", "require('compiletime.bad')\n");
    write(&root, "compiletime/bad.lua", "local t = nil\nreturn t.field\n");

    let diags = run(&root).unwrap_err();
    assert_eq!(diags[0].code(), Some("E003"));
    assert_eq!(diags[0].file(), Some("compiletime/bad.lua"));
    assert!(diags[0].message().unwrap().contains("compiletime.bad"));
}
