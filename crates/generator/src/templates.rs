//! Template loading and management

use docgen_common::{DocGenError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("anchor", anchor_filter);
    tera.register_filter("capitalize", capitalize_filter);

    tera.add_raw_template("README.md", include_str!("../templates/README.md.tera"))
        .map_err(|e| DocGenError::Render(format!("Failed to load README.md template: {}", e)))?;

    Ok(tera)
}

/// Markdown heading anchor: lowercase, spaces to dashes, punctuation dropped
pub fn anchor(heading: &str) -> String {
    heading
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

fn anchor_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("anchor filter expects a string"))?;
    Ok(Value::String(anchor(s)))
}

/// Filter to capitalize first letter
fn capitalize_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("capitalize filter expects a string"))?;

    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return Ok(Value::String(String::new()));
    };

    Ok(Value::String(format!(
        "{}{}",
        first.to_uppercase(),
        chars.as_str()
    )))
}
