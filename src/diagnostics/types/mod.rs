//! Type definitions for the diagnostics system

mod error_code;
mod severity;

pub use error_code::{ErrorCode, ErrorType};
pub use severity::Severity;
