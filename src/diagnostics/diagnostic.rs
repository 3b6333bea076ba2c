use std::env;

use super::{
    ErrorCode, ErrorType, Severity, format_message,
    position::{Position, Span},
    rendering::render_display_path,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub title: String,
    pub code: Option<String>,
    pub error_type: Option<ErrorType>,
    pub message: Option<String>,
    pub file: Option<String>,
    pub position: Option<Position>,
    pub span: Option<Span>,
    pub hints: Vec<String>,
}

// ICE = Internal Compiler Error (a compiler bug, not user code).
#[macro_export]
macro_rules! ice {
    ($msg:expr) => {
        $crate::diagnostics::Diagnostic::error("INTERNAL COMPILER ERROR")
            .with_message($msg)
            .with_hint(format!("{}:{} ({})", file!(), line!(), module_path!()))
    };
}

impl Diagnostic {
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            code: None,
            error_type: None,
            message: None,
            file: None,
            position: None,
            span: None,
            hints: Vec::new(),
        }
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(title)
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = Some(error_type);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self.span = Some(Span::new(position, position));
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        if span.start.is_known() {
            self.position = Some(span.start);
            self.span = Some(span);
        }
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn set_file(&mut self, file: impl Into<String>) {
        self.file = Some(file.into());
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Generic error builder using ErrorCode specification
    pub fn make_error(
        err_spec: &'static ErrorCode,
        values: &[&str],
        file: impl Into<String>,
        span: Span,
    ) -> Self {
        let message = format_message(err_spec.message, values);
        let hint = err_spec.hint.map(|h| format_message(h, values));

        let mut diag = Diagnostic::error(err_spec.title)
            .with_code(err_spec.code)
            .with_error_type(err_spec.error_type)
            .with_file(file)
            .with_span(span)
            .with_message(message);

        if let Some(hint_text) = hint {
            diag = diag.with_hint(hint_text);
        }

        diag
    }

    /// Same as [`Diagnostic::make_error`] for errors that have no source file.
    pub fn make_global_error(err_spec: &'static ErrorCode, values: &[&str]) -> Self {
        let mut diag = Self::make_error(err_spec, values, "", Span::default());
        diag.file = None;
        diag
    }

    pub fn render(&self, source: Option<&str>, default_file: Option<&str>) -> String {
        let mut out = String::new();
        let use_color = env::var_os("NO_COLOR").is_none();
        let yellow = "\u{1b}[33m";
        let red = "\u{1b}[31m";
        let reset = "\u{1b}[0m";
        let file = self
            .file
            .as_deref()
            .filter(|f| !f.is_empty())
            .or(default_file)
            .map(|f| render_display_path(f).into_owned())
            .unwrap_or_else(|| "<unknown>".to_string());
        let code = self.code.as_deref().unwrap_or("E000");

        let error_type_label = match (self.severity, self.error_type) {
            (Severity::Warning, _) => "Warning",
            (Severity::Error, Some(error_type)) => error_type.prefix(),
            (Severity::Error, None) => "Error",
        };

        // Header: -- Compiler error: module not found [E001]
        if use_color {
            out.push_str(yellow);
        }
        out.push_str(&format!(
            "-- {}: {} [{}]\n",
            error_type_label,
            self.title.to_lowercase(),
            code
        ));
        if use_color {
            out.push_str(reset);
        }

        if let Some(message) = &self.message {
            out.push('\n');
            out.push_str(message);
            out.push('\n');
        }

        // Location indicator: --> file:line:column
        if let Some(position) = self.position {
            out.push('\n');
            out.push_str(&format!(
                "  --> {}:{}:{}\n",
                file,
                position.line,
                position.column + 1
            ));

            let span = self.span.unwrap_or_else(|| Span::new(position, position));
            let start_line = span.start.line;
            let end_line = span.end.line.max(start_line);
            let line_width = end_line.to_string().len();

            out.push_str(&format!("{:>width$} |\n", "", width = line_width));

            for line_no in start_line..=end_line {
                let Some(line_text) = source.and_then(|src| get_source_line(src, line_no)) else {
                    continue;
                };
                let line_len = line_text.chars().count();
                let (caret_start, caret_end) = if line_no == start_line && line_no == end_line {
                    let start = span.start.column.min(line_len);
                    let end = span.end.column.min(line_len).max(start + 1);
                    (start, end)
                } else if line_no == start_line {
                    let start = span.start.column.min(line_len);
                    (start, line_len.max(start + 1))
                } else if line_no == end_line {
                    (0, span.end.column.min(line_len).max(1))
                } else {
                    (0, line_len.max(1))
                };

                out.push_str(&format!(
                    "{:>width$} | {}\n",
                    line_no,
                    line_text,
                    width = line_width
                ));
                out.push_str(&format!(
                    "{:>width$} | {}",
                    "",
                    " ".repeat(caret_start),
                    width = line_width
                ));
                if use_color {
                    out.push_str(red);
                }
                out.push_str(&"^".repeat(caret_end.saturating_sub(caret_start).max(1)));
                if use_color {
                    out.push_str(reset);
                }
                out.push('\n');
            }
        } else if self.file.as_deref().is_some_and(|f| !f.is_empty()) {
            out.push('\n');
            out.push_str(&format!("  --> {}\n", file));
        }

        if !self.hints.is_empty() {
            out.push_str("\nHint:\n");
            for hint in &self.hints {
                out.push_str(&format!("  {}\n", hint));
            }
        }

        out
    }
}

fn get_source_line(source: &str, line: usize) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source.lines().nth(line - 1)
}
