use std::path::PathBuf;

use crate::{
    module_graph::ModuleId,
    stage::{StagedTable, StagedValue},
    store::SourceFile,
    syntax::{parse_source, print_program},
};

use super::{RewriteOptions, rewrite};

fn file(source: &str) -> SourceFile {
    SourceFile {
        id: ModuleId::parse("units.spawn").unwrap(),
        path: PathBuf::from("units/spawn.lua"),
        display_path: "units/spawn.lua".to_string(),
        source: source.to_string(),
    }
}

fn options() -> RewriteOptions {
    RewriteOptions {
        marker: "compiletime".to_string(),
        namespace: "compiletime".to_string(),
    }
}

fn rewritten(source: &str, values: &[StagedValue]) -> String {
    let file = file(source);
    let program = parse_source(source).unwrap();
    let program = rewrite(&file, program, values, &options()).unwrap();
    print_program(&program)
}

fn string(text: &str) -> StagedValue {
    StagedValue::String(text.as_bytes().to_vec())
}

#[test]
fn module_without_sites_is_unchanged() {
    let source = "local x = 1\nfunction f(a) return a + x end\n";
    let program = parse_source(source).unwrap();
    let out = rewrite(&file(source), program.clone(), &[], &options()).unwrap();
    assert_eq!(out, program);
}

#[test]
fn site_i_receives_value_i() {
    let out = rewritten(
        "local a = compiletime(1)\nlocal b = compiletime('x')\nprint(compiletime(f))\n",
        &[StagedValue::Integer(10), string("ten"), StagedValue::Boolean(true)],
    );
    assert_eq!(out, "local a = 10\nlocal b = \"ten\"\nprint(true)\n");
}

#[test]
fn nested_sites_are_part_of_the_outer_site() {
    let out = rewritten(
        "local t = { compiletime(compiletime(1) + 1), compiletime(3) }\n",
        &[StagedValue::Integer(2), StagedValue::Integer(3)],
    );
    assert_eq!(out, "local t = {2, 3}\n");
}

#[test]
fn tables_are_spliced_as_constructors() {
    let table = StagedTable::from_pairs(vec![
        (StagedValue::Integer(1), string("footman")),
        (string("hp"), StagedValue::Integer(420)),
    ]);
    let out = rewritten("Units = compiletime(build())\n", &[StagedValue::Table(table)]);
    assert_eq!(out, "Units = {\"footman\", hp = 420}\n");
}

#[test]
fn statement_sites_and_compiletime_requires_are_dropped() {
    let out = rewritten(
        "require('compiletime.setup')\nlocal cfg = require('compiletime.config')\ncompiletime(function() end)\nrequire('lib')\n",
        &[StagedValue::Nil],
    );
    assert_eq!(out, "local cfg = nil\nrequire(\"lib\")\n");
}

#[test]
fn unlowerable_value_is_a_serialization_error() {
    let source = "local f = compiletime(print)\n";
    let values = [StagedValue::Opaque {
        type_name: "function".to_string(),
    }];
    let diags = rewrite(&file(source), parse_source(source).unwrap(), &values, &options())
        .unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code(), Some("E004"));
    assert_eq!(diags[0].file(), Some("units/spawn.lua"));
    assert!(diags[0].message().unwrap().contains("#1 in module `units.spawn`"));
}

#[test]
fn value_count_must_match_site_count() {
    let source = "local a = compiletime(1)\nlocal b = compiletime(2)\n";
    let diags = rewrite(
        &file(source),
        parse_source(source).unwrap(),
        &[StagedValue::Integer(1)],
        &options(),
    )
    .unwrap_err();
    assert_eq!(diags[0].code(), Some("E005"));
    assert!(
        diags[0]
            .message()
            .unwrap()
            .contains("has 2 compile-time call site(s) but 1 staged value(s)")
    );
}
