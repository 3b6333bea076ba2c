pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod link;
pub mod module_graph;
pub mod pipeline;
pub mod rewrite;
pub mod stage;
pub mod store;
pub mod syntax;
