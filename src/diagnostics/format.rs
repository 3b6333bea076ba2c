/// Format error message by replacing {} placeholders with values
///
/// # Example
/// ```
/// use lunac::diagnostics::format_message;
/// let msg = format_message("Expected {}, got {}.", &["Name", "Number"]);
/// assert_eq!(msg, "Expected Name, got Number.");
/// ```
pub fn format_message(template: &str, values: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    let mut values = values.iter();
    while let Some(idx) = rest.find("{}") {
        result.push_str(&rest[..idx]);
        match values.next() {
            Some(value) => result.push_str(value),
            None => result.push_str("{}"),
        }
        rest = &rest[idx + 2..];
    }
    result.push_str(rest);
    result
}
