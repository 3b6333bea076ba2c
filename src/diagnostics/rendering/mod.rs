mod formatter;

pub use formatter::{render_diagnostics, render_display_path};
