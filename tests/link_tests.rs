use mlua::Lua;

use lunac::{
    link::{REQUIRE_SHIM, link, require_shim, wrap, write_artifact},
    module_graph::ModuleId,
    syntax::{parse_source, print_program},
};

fn module(name: &str, source: &str) -> lunac::syntax::program::Program {
    wrap(&ModuleId::parse(name).unwrap(), parse_source(source).unwrap(), false)
}

fn run(script: &str) -> Lua {
    let lua = Lua::new();
    lua.load(script).exec().unwrap();
    lua
}

#[test]
fn diamond_dependency_body_runs_once() {
    let modules = vec![
        module("d", "DRuns = (DRuns or 0) + 1\nreturn { value = 5 }\n"),
        module("b", "return require('d').value + 1\n"),
        module("c", "return require('d').value + 2\n"),
    ];
    let entry = parse_source("Result = require('b') + require('c')\n").unwrap();
    let script = print_program(&link(require_shim().unwrap(), modules, entry));

    let lua = run(&script);
    assert_eq!(lua.globals().get::<i64>("DRuns").unwrap(), 1);
    assert_eq!(lua.globals().get::<i64>("Result").unwrap(), 13);
}

#[test]
fn registration_order_does_not_run_bodies() {
    // A module registered before its dependency still works: bodies only
    // run on the first require.
    let modules = vec![
        module("top", "return require('bottom') .. '!'\n"),
        module("bottom", "return 'ok'\n"),
    ];
    let entry = parse_source("Out = require('top')\n").unwrap();
    let script = print_program(&link(require_shim().unwrap(), modules, entry));

    let lua = run(&script);
    assert_eq!(lua.globals().get::<String>("Out").unwrap(), "ok!");
}

#[test]
fn module_receives_its_name_and_varargs() {
    let modules = vec![module("named", "local name = ...\nreturn name\n")];
    let entry = parse_source("Name = require('named')\n").unwrap();
    let script = print_program(&link(require_shim().unwrap(), modules, entry));

    let lua = run(&script);
    assert_eq!(lua.globals().get::<String>("Name").unwrap(), "named");
}

#[test]
fn shim_template_is_plain_lua() {
    let lua = run(REQUIRE_SHIM);
    let loaded: mlua::Table = lua
        .globals()
        .get::<mlua::Table>("__require_data")
        .unwrap()
        .get("loaded")
        .unwrap();
    assert_eq!(loaded.raw_len(), 0);
}

#[test]
fn artifact_replaces_previous_output() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dst = std::env::temp_dir().join(format!("lunac_link_tests_{}_{}", std::process::id(), nanos));

    write_artifact(&dst, "war3map.lua", "old = true\n").unwrap();
    let path = write_artifact(&dst, "war3map.lua", "new = true\n").unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "new = true\n");
    let leftovers: Vec<_> = std::fs::read_dir(&dst).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}
