//! Module wrapper and linker.
//!
//! Every runtime module except the entry becomes one registration statement
//! in the require shim's table; the entry's statements run as the script's
//! main chunk after all registrations.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, OUTPUT_WRITE_FAILED, position::Span},
    ice,
    module_graph::ModuleId,
    syntax::{
        block::Block,
        expression::{Expression, FunctionBody},
        parse_source,
        program::Program,
        statement::Statement,
    },
};

/// Lua source of the runtime `require` that ships with every artifact.
pub const REQUIRE_SHIM: &str = include_str!("require_shim.lua");

/// Global table the shim keeps its registry in.
pub const REQUIRE_DATA: &str = "__require_data";

/// The parsed require shim.
pub fn require_shim() -> Result<Program, Box<Diagnostic>> {
    parse_source(REQUIRE_SHIM).map_err(|diags| {
        let detail = diags
            .first()
            .and_then(|diag| diag.message())
            .unwrap_or("unknown error")
            .to_string();
        Box::new(ice!(format!("the require shim does not parse: {detail}")))
    })
}

/// Wraps a module body as `__require_data.module["<id>"] = function(...) <body> end`.
/// The entry module is returned as is.
pub fn wrap(id: &ModuleId, program: Program, is_entry: bool) -> Program {
    if is_entry {
        return program;
    }

    let Program { statements, span } = program;
    let registry = Expression::Index {
        object: Box::new(Expression::Field {
            object: Box::new(Expression::Identifier {
                name: REQUIRE_DATA.to_string(),
                span: Span::default(),
            }),
            name: "module".to_string(),
            span: Span::default(),
        }),
        key: Box::new(Expression::String {
            value: id.as_str().as_bytes().to_vec(),
            span: Span::default(),
        }),
        span: Span::default(),
    };
    let body = Expression::Function {
        body: FunctionBody {
            parameters: Vec::new(),
            is_vararg: true,
            body: Block::new(statements, span),
            span,
        },
        span,
    };

    Program::from_statements(vec![Statement::Assign {
        targets: vec![registry],
        values: vec![body],
        span: Span::default(),
    }])
}

/// Builds the link unit: prelude, wrapped modules in the given order, then
/// the entry.
pub fn link(prelude: Program, wrapped: Vec<Program>, entry: Program) -> Program {
    let mut statements = prelude.statements;
    for module in wrapped {
        statements.extend(module.statements);
    }
    statements.extend(entry.statements);
    Program::from_statements(statements)
}

/// Writes the artifact to `dst_dir/name`. The text goes to a temporary
/// sibling first and is renamed into place.
pub fn write_artifact(dst_dir: &Path, name: &str, text: &str) -> Result<PathBuf, Box<Diagnostic>> {
    let path = dst_dir.join(name);
    let temp = dst_dir.join(format!(".{name}.tmp"));
    let write_failed = |target: &Path, err: std::io::Error| {
        Box::new(Diagnostic::make_global_error(
            &OUTPUT_WRITE_FAILED,
            &[&target.display().to_string(), &err.to_string()],
        ))
    };

    fs::create_dir_all(dst_dir).map_err(|err| write_failed(dst_dir, err))?;
    fs::write(&temp, text).map_err(|err| write_failed(&temp, err))?;
    if let Err(err) = fs::rename(&temp, &path) {
        let _ = fs::remove_file(&temp);
        return Err(write_failed(&path, err));
    }

    debug!(path = %path.display(), bytes = text.len(), "artifact written");
    Ok(path)
}

#[cfg(test)]
mod link_test;
