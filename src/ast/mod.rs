pub mod call_sites;
pub mod fold;
pub mod literal;
pub mod visit;

pub use call_sites::{CallSite, call_sites, is_marker_call, replace_call_sites};
pub use fold::{Folder, fold_block, fold_expr, fold_function_body, fold_program, fold_stmt, fold_table_field};
pub use literal::{LiteralError, lower_value};
pub use visit::{
    Visitor, walk_block, walk_expr, walk_function_body, walk_program, walk_stmt, walk_table_field,
};

#[cfg(test)]
mod literal_test;
