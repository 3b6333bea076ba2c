//! Error code types for the diagnostics system

/// Which pipeline stage an error code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Syntax,
    Compiler,
    Evaluation,
}

impl ErrorType {
    /// Returns the prefix string used in error headers
    pub fn prefix(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "Syntax error",
            ErrorType::Compiler => "Compiler error",
            ErrorType::Evaluation => "Compile-time evaluation error",
        }
    }
}

/// Error code with message template and optional hint
#[derive(Debug, Clone, Copy)]
pub struct ErrorCode {
    pub code: &'static str,
    pub title: &'static str,
    pub error_type: ErrorType,
    pub message: &'static str,
    pub hint: Option<&'static str>,
}
