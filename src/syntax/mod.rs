//! Lua source handling: tokens, syntax tree, parser and printer.

pub mod block;
pub mod expression;
pub mod lexer;
pub mod parser;
pub mod precedence;
pub mod printer;
pub mod program;
pub mod statement;
pub mod token;
pub mod token_type;

pub type Identifier = String;

pub use crate::diagnostics;
pub use crate::diagnostics::position;
pub use parser::{Parser, parse_source};
pub use printer::{print_expression, print_program, print_program_preserving_lines};
