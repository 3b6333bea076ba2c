use lunac::{
    link::{link, require_shim, wrap},
    module_graph::ModuleId,
    syntax::{parse_source, print_program, print_program_preserving_lines},
};

fn reprint(source: &str) -> String {
    print_program(&parse_source(source).unwrap())
}

#[test]
fn canonical_layout() {
    let out = reprint(
        "local  t = {1,2; x=3, ['y z']=4}\n\
         function M.f(a, ...) if a then return ... elseif a == nil then return nil else return 'q' end end\n\
         while true do break end\n\
         for i=1,10,2 do print(i) end\n",
    );
    insta::assert_snapshot!(out, @r#"
local t = {1, 2, x = 3, ["y z"] = 4}
function M.f(a, ...)
    if a then
        return ...
    elseif a == nil then
        return nil
    else
        return "q"
    end
end
while true do
    break
end
for i = 1, 10, 2 do
    print(i)
end
"#);
}

#[test]
fn preserved_lines_keep_statement_positions() {
    let program = parse_source("local a = 1\n\nlocal b = compiletime(2)\nif a then print(a) end\n").unwrap();
    insta::assert_snapshot!(print_program_preserving_lines(&program), @r#"
local a = 1

local b = compiletime(2)
if a then print(a) end
"#);
}

#[test]
fn linked_script() {
    let lib = wrap(
        &ModuleId::parse("lib").unwrap(),
        parse_source("local M = {}\nM.answer = 42\nreturn M\n").unwrap(),
        false,
    );
    let entry = parse_source("local lib = require('lib')\nprint(lib.answer)\n").unwrap();
    let out = print_program(&link(require_shim().unwrap(), vec![lib], entry));
    insta::assert_snapshot!(out, @r#"
__require_data = {module = {}, loaded = {}, result = {}}
function require(name)
    local data = __require_data
    if not data.loaded[name] then
        local body = data.module[name]
        if body == nil then
            error("module '" .. tostring(name) .. "' not found", 2)
        end
        data.result[name] = body(name)
        data.loaded[name] = true
    end
    return data.result[name]
end
__require_data.module["lib"] = function(...)
    local M = {}
    M.answer = 42
    return M
end
local lib = require("lib")
print(lib.answer)
"#);
}
