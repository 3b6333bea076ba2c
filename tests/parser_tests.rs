use lunac::syntax::{
    expression::Expression, parse_source, print_program, statement::Statement,
};

const MAP_SCRIPT: &str = r#"
local Units = require("units")
local SPAWN_POINTS <const> = compiletime(function()
    return { { x = 0, y = 0 }, { x = 128.5, y = -64 } }
end)

function InitTrig_Spawn()
    local trig = CreateTrigger()
    TriggerRegisterTimerEvent(trig, 30.0, true)
    TriggerAddAction(trig, function()
        for i, point in ipairs(SPAWN_POINTS) do
            Units.spawn(FourCC("hfoo"), point.x, point.y)
        end
    end)
end

local function clamp(v, lo, hi)
    if v < lo then return lo elseif v > hi then return hi end
    return v
end

repeat
    local n = clamp(#SPAWN_POINTS // 2, 1, 10) ~ 0x0F
until n > 0

goto done
::done::
"#;

#[test]
fn parses_a_map_script() {
    let program = parse_source(MAP_SCRIPT).unwrap();
    assert_eq!(program.statements.len(), 7);
    assert!(matches!(program.statements[2], Statement::Function { .. }));
    assert!(matches!(program.statements[3], Statement::LocalFunction { .. }));
    assert!(matches!(program.statements[5], Statement::Goto { .. }));
}

#[test]
fn printing_is_stable() {
    let first = print_program(&parse_source(MAP_SCRIPT).unwrap());
    let second = print_program(&parse_source(&first).unwrap());
    assert_eq!(first, second);
}

#[test]
fn marker_argument_is_a_function_expression() {
    let program = parse_source(MAP_SCRIPT).unwrap();
    let Statement::Local { values, .. } = &program.statements[1] else {
        panic!("expected a local statement");
    };
    let Expression::Call { arguments, .. } = &values[0] else {
        panic!("expected a call");
    };
    assert_eq!(values[0].called_name(), Some("compiletime"));
    assert!(matches!(arguments[0], Expression::Function { .. }));
}

#[test]
fn errors_render_with_location() {
    unsafe { std::env::set_var("NO_COLOR", "1") };
    let source = "local x = 1\nlocal y = (x +\n";
    let diags = parse_source(source).unwrap_err();
    let rendered = diags[0].render(Some(source), Some("broken.lua"));
    assert!(rendered.contains("[E021]"));
    assert!(rendered.contains("--> broken.lua:"));
}

#[test]
fn statements_after_return_are_rejected() {
    let diags = parse_source("return 1\nprint(2)\n").unwrap_err();
    assert_eq!(diags[0].code(), Some("E020"));
}
