use std::borrow::Cow;
use std::path::Path;

use crate::diagnostics::{Diagnostic, Severity};

/// Renders a batch of diagnostics for the terminal. `source_for` supplies
/// the text of a diagnostic's file so the snippet can be shown.
pub fn render_diagnostics<'a>(
    diagnostics: &[Diagnostic],
    source_for: impl Fn(&str) -> Option<&'a str>,
) -> String {
    let mut out = diagnostics
        .iter()
        .map(|diag| {
            let source = diag.file().and_then(&source_for);
            diag.render(source, None)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if errors > 0 {
        out.push_str(&format!(
            "\nBuild failed with {} error{}.\n",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }
    out
}

/// Shortens absolute paths under the working directory for display.
pub fn render_display_path(file: &str) -> Cow<'_, str> {
    let path = Path::new(file);
    if path.is_absolute()
        && let Ok(cwd) = std::env::current_dir()
        && let Ok(stripped) = path.strip_prefix(&cwd)
    {
        return Cow::Owned(stripped.to_string_lossy().into_owned());
    }
    Cow::Borrowed(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_left_alone() {
        assert_eq!(render_display_path("src/main.lua"), "src/main.lua");
    }

    #[test]
    fn summary_counts_errors_only() {
        let diags = vec![
            Diagnostic::error("one").with_code("E001"),
            Diagnostic::warning("two"),
            Diagnostic::error("three").with_code("E002"),
        ];
        let rendered = render_diagnostics(&diags, |_| None);
        assert!(rendered.ends_with("Build failed with 2 errors.\n"));
    }
}
