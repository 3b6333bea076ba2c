//! Error reporting shared by every compiler stage.
//!
//! Each failure is described by an [`ErrorCode`] constant and materialized
//! as a [`Diagnostic`] that carries the file and source span it refers to.

pub mod compiler_errors;
mod diagnostic;
mod format;
pub mod position;
pub mod rendering;
pub mod types;

pub use compiler_errors::*;
pub use diagnostic::Diagnostic;
pub use format::format_message;
pub use types::{ErrorCode, ErrorType, Severity};

/// Convenience alias for stage results that fail with a batch of diagnostics.
pub type DiagResult<T> = Result<T, Vec<Diagnostic>>;
