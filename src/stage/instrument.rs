use crate::{
    ast::{CallSite, replace_call_sites},
    diagnostics::{Diagnostic, MALFORMED_COMPILETIME},
    module_graph::{ModuleId, ModuleNode},
    syntax::{expression::Expression, print_program_preserving_lines},
};

/// Global installed by the interpreter that records one staged value.
pub const STAGE_FUNCTION: &str = "__lunac_stage";

/// A runtime module prepared for compile-time execution.
#[derive(Debug, Clone)]
pub struct InstrumentedModule {
    pub id: ModuleId,
    pub display_path: String,
    /// Lua source where site `i` reads `__lunac_stage("<module>", i, arg)`.
    /// Statements keep their source lines so interpreter errors point at
    /// the user's file.
    pub source: String,
    pub sites: Vec<CallSite>,
}

pub fn instrument(node: &ModuleNode, marker: &str) -> Result<InstrumentedModule, Vec<Diagnostic>> {
    let module = node.id.as_str();
    let (program, sites) = replace_call_sites(node.program.clone(), marker, |site, call| {
        match call {
            Expression::Call {
                function,
                mut arguments,
                span,
            } => {
                if arguments.len() != 1 {
                    return Expression::Call {
                        function,
                        arguments,
                        span,
                    };
                }
                let argument = arguments.remove(0);
                Expression::Call {
                    function: Box::new(Expression::Identifier {
                        name: STAGE_FUNCTION.to_string(),
                        span,
                    }),
                    arguments: vec![
                        Expression::String {
                            value: module.as_bytes().to_vec(),
                            span,
                        },
                        Expression::Number {
                            text: site.ordinal.to_string(),
                            span,
                        },
                        argument,
                    ],
                    span,
                }
            }
            other => other,
        }
    });

    let diagnostics: Vec<Diagnostic> = sites
        .iter()
        .filter(|site| site.argument_count != 1)
        .map(|site| {
            Diagnostic::make_error(
                &MALFORMED_COMPILETIME,
                &[marker, &site.argument_count.to_string()],
                node.file.display_path.clone(),
                site.span,
            )
        })
        .collect();
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    Ok(InstrumentedModule {
        id: node.id.clone(),
        display_path: node.file.display_path.clone(),
        source: print_program_preserving_lines(&program),
        sites,
    })
}
