//! Item formatting for expandable detail lists

use serde_json::Value;

/// Escape `&`, `<` and `>` so the text can be dropped into markup as-is.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format one list item.
///
/// - string: escaped as-is
/// - non-empty array: `first: second`, extra elements ignored and a missing
///   second element printed empty
/// - object with non-empty `name` and `value`: `name: value (domain)`
/// - anything else: its JSON, escaped
pub fn format_item(item: &Value) -> String {
    match item {
        Value::String(s) => escape_html(s),
        Value::Array(items) if !items.is_empty() => {
            let value = items.get(1).map(text_of).unwrap_or_default();
            format!("{}: {}", escape_html(&text_of(&items[0])), escape_html(&value))
        }
        Value::Object(map) => {
            let name = map.get("name").map(text_of).unwrap_or_default();
            let value = map.get("value").map(text_of).unwrap_or_default();
            if name.is_empty() || value.is_empty() {
                return escape_html(&item.to_string());
            }
            let domain = map.get("domain").map(text_of).unwrap_or_default();
            format!(
                "{}: {} ({})",
                escape_html(&name),
                escape_html(&value),
                escape_html(&domain)
            )
        }
        other => escape_html(&other.to_string()),
    }
}

// Strings print bare, everything else as JSON.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
