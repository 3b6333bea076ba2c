//! Diagnostic severity levels

/// Severity level of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Error: the build cannot produce an artifact
    Error,
    /// Warning: suspicious input that does not stop the build
    Warning,
}
