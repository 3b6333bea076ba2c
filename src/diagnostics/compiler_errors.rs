use super::types::{ErrorCode, ErrorType};

// ---------------------------------------------------------------------------
// Module resolution
// ---------------------------------------------------------------------------

pub const MODULE_NOT_FOUND: ErrorCode = ErrorCode {
    code: "E001",
    title: "MODULE NOT FOUND",
    error_type: ErrorType::Compiler,
    message: "Module `{}` requires `{}`, but `{}` does not exist.",
    hint: Some("Module `a.b.c` is loaded from `a/b/c.lua` under the source directory."),
};

pub const MALFORMED_REQUIRE: ErrorCode = ErrorCode {
    code: "E002",
    title: "MALFORMED REQUIRE",
    error_type: ErrorType::Compiler,
    message: "`require` expects exactly one string literal argument, found {}.",
    hint: Some(
        "Modules are resolved before anything runs, so the module name must be written out: require(\"a.b\").",
    ),
};

pub const COMPILETIME_EVAL: ErrorCode = ErrorCode {
    code: "E003",
    title: "COMPILE-TIME EVALUATION FAILED",
    error_type: ErrorType::Evaluation,
    message: "Running module `{}` at compile time failed:\n{}",
    hint: None,
};

pub const SERIALIZATION: ErrorCode = ErrorCode {
    code: "E004",
    title: "VALUE CANNOT BE EMBEDDED",
    error_type: ErrorType::Evaluation,
    message: "Compile-time call #{} in module `{}` produced a value that cannot be written as a literal: {}.",
    hint: Some(
        "Only nil, booleans, numbers, strings and tables of those can be embedded in the output.",
    ),
};

pub const ORDINAL_MISMATCH: ErrorCode = ErrorCode {
    code: "E005",
    title: "ORDINAL MISMATCH",
    error_type: ErrorType::Compiler,
    message: "Module `{}` has {} compile-time call site(s) but {} staged value(s).",
    hint: None,
};

pub const UNEVALUATED_CALL_SITE: ErrorCode = ErrorCode {
    code: "E006",
    title: "UNEVALUATED COMPILE-TIME CALL",
    error_type: ErrorType::Evaluation,
    message: "Compile-time call #{} in module `{}` was never evaluated during the build.",
    hint: Some(
        "Compile-time calls are evaluated while the module's top-level code runs at build time. Move the call out of functions that are not called during the build.",
    ),
};

pub const REPEATED_CALL_SITE: ErrorCode = ErrorCode {
    code: "E007",
    title: "REPEATED COMPILE-TIME CALL",
    error_type: ErrorType::Evaluation,
    message: "Compile-time call #{} in module `{}` was evaluated {} times; it can only hold one value.",
    hint: Some("Move the call out of loops and functions that run more than once at build time."),
};

pub const MALFORMED_COMPILETIME: ErrorCode = ErrorCode {
    code: "E008",
    title: "MALFORMED COMPILE-TIME CALL",
    error_type: ErrorType::Compiler,
    message: "`{}` expects exactly one argument, found {}.",
    hint: Some("Pass a single value or a function producing the value."),
};

pub const IMPORT_CYCLE: ErrorCode = ErrorCode {
    code: "E009",
    title: "REQUIRE CYCLE",
    error_type: ErrorType::Compiler,
    message: "Modules require each other in a cycle: {}.",
    hint: Some("Break the cycle by moving the shared code into a separate module."),
};

pub const MODULE_READ_FAILED: ErrorCode = ErrorCode {
    code: "E010",
    title: "MODULE READ FAILED",
    error_type: ErrorType::Compiler,
    message: "Failed to read module file `{}`: {}.",
    hint: None,
};

pub const INVALID_MODULE_NAME: ErrorCode = ErrorCode {
    code: "E011",
    title: "INVALID MODULE NAME",
    error_type: ErrorType::Compiler,
    message: "Invalid module name: `{}`.",
    hint: Some(
        "Module names are dot-separated identifiers made of letters, digits and underscores.",
    ),
};

// ---------------------------------------------------------------------------
// Syntax
// ---------------------------------------------------------------------------

pub const UNEXPECTED_TOKEN: ErrorCode = ErrorCode {
    code: "E020",
    title: "UNEXPECTED TOKEN",
    error_type: ErrorType::Syntax,
    message: "Expected {}, found {}.",
    hint: None,
};

pub const EXPECTED_EXPRESSION: ErrorCode = ErrorCode {
    code: "E021",
    title: "EXPECTED EXPRESSION",
    error_type: ErrorType::Syntax,
    message: "Expected an expression, found {}.",
    hint: None,
};

pub const UNTERMINATED_STRING: ErrorCode = ErrorCode {
    code: "E022",
    title: "UNTERMINATED STRING",
    error_type: ErrorType::Syntax,
    message: "String literal is not closed before the end of the line.",
    hint: Some("Close the string with the same quote it was opened with, or use a long string [[...]]."),
};

pub const UNTERMINATED_COMMENT: ErrorCode = ErrorCode {
    code: "E023",
    title: "UNTERMINATED LONG BRACKET",
    error_type: ErrorType::Syntax,
    message: "Long {} is not closed before the end of the file.",
    hint: Some("Close it with a matching `]]` that has the same number of `=` signs."),
};

pub const INVALID_ESCAPE: ErrorCode = ErrorCode {
    code: "E024",
    title: "INVALID ESCAPE",
    error_type: ErrorType::Syntax,
    message: "Invalid escape sequence in string literal: {}.",
    hint: None,
};

pub const MALFORMED_NUMBER: ErrorCode = ErrorCode {
    code: "E025",
    title: "MALFORMED NUMBER",
    error_type: ErrorType::Syntax,
    message: "Malformed number near `{}`.",
    hint: None,
};

pub const ILLEGAL_CHARACTER: ErrorCode = ErrorCode {
    code: "E026",
    title: "ILLEGAL CHARACTER",
    error_type: ErrorType::Syntax,
    message: "Unexpected character `{}`.",
    hint: None,
};

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

pub const OUTPUT_WRITE_FAILED: ErrorCode = ErrorCode {
    code: "E030",
    title: "OUTPUT WRITE FAILED",
    error_type: ErrorType::Compiler,
    message: "Failed to write `{}`: {}.",
    hint: None,
};

pub const CONFIG_ERROR: ErrorCode = ErrorCode {
    code: "E031",
    title: "INVALID CONFIGURATION",
    error_type: ErrorType::Compiler,
    message: "{}",
    hint: None,
};

pub const INTERPRETER_INIT_FAILED: ErrorCode = ErrorCode {
    code: "E032",
    title: "INTERPRETER SETUP FAILED",
    error_type: ErrorType::Evaluation,
    message: "Failed to prepare the compile-time interpreter: {}.",
    hint: None,
};
