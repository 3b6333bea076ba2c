use mlua::Lua;

use crate::{
    module_graph::ModuleId,
    syntax::{parse_source, print_program},
};

use super::{link, require_shim, wrap, write_artifact};

fn id(name: &str) -> ModuleId {
    ModuleId::parse(name).unwrap()
}

fn linked(modules: &[(&str, &str)], entry: &str) -> String {
    let wrapped = modules
        .iter()
        .map(|(name, source)| wrap(&id(name), parse_source(source).unwrap(), false))
        .collect();
    let entry = wrap(&id("war3map"), parse_source(entry).unwrap(), true);
    print_program(&link(require_shim().unwrap(), wrapped, entry))
}

#[test]
fn shim_parses() {
    let shim = require_shim().unwrap();
    assert_eq!(shim.statements.len(), 2);
}

#[test]
fn entry_is_not_wrapped() {
    let program = parse_source("local x = 1\nprint(x)\n").unwrap();
    assert_eq!(wrap(&id("war3map"), program.clone(), true), program);
}

#[test]
fn modules_become_registrations() {
    let program = parse_source("local x = 1\nreturn x\n").unwrap();
    let out = print_program(&wrap(&id("util.math"), program, false));
    assert_eq!(
        out,
        "__require_data.module[\"util.math\"] = function(...)\n    local x = 1\n    return x\nend\n"
    );
}

#[test]
fn link_unit_is_shim_then_modules_then_entry() {
    let out = linked(&[("a", "A = 1"), ("b", "B = 2")], "main = 3");
    let a = out.find("__require_data.module[\"a\"]").unwrap();
    let b = out.find("__require_data.module[\"b\"]").unwrap();
    let shim = out.find("function require(name)").unwrap();
    let main = out.find("main = 3").unwrap();
    assert!(shim < a && a < b && b < main);
}

#[test]
fn module_bodies_run_once() {
    let out = linked(
        &[("counter", "Loads = (Loads or 0) + 1\nreturn { id = Loads }\n")],
        "local first = require('counter')\nlocal second = require('counter')\nSame = first == second\n",
    );

    let lua = Lua::new();
    lua.load(&out).exec().unwrap();
    assert_eq!(lua.globals().get::<i64>("Loads").unwrap(), 1);
    assert!(lua.globals().get::<bool>("Same").unwrap());
}

#[test]
fn nil_result_still_counts_as_loaded() {
    let out = linked(
        &[("side", "Runs = (Runs or 0) + 1\n")],
        "require('side')\nrequire('side')\n",
    );

    let lua = Lua::new();
    lua.load(&out).exec().unwrap();
    assert_eq!(lua.globals().get::<i64>("Runs").unwrap(), 1);
}

#[test]
fn unknown_module_raises() {
    let out = linked(&[], "require('ghost')\n");
    let lua = Lua::new();
    let err = lua.load(&out).exec().unwrap_err();
    assert!(err.to_string().contains("module 'ghost' not found"));
}

#[test]
fn artifact_is_written_in_place() {
    let mut dir = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!("lunac_link_{}_{}", std::process::id(), nanos));
    let dst = dir.join("nested").join("out");

    let path = write_artifact(&dst, "war3map.lua", "print(1)\n").unwrap();
    assert_eq!(path, dst.join("war3map.lua"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "print(1)\n");
    assert!(!dst.join(".war3map.lua.tmp").exists());
}
