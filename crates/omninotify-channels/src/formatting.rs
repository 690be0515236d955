//! Literal placeholder substitution for notification text.
//!
//! `{{name}}` and `{{ name }}` are replaced with the variable's value.
//! There is no logic, escaping or nesting.

use std::fmt::Display;
use std::sync::OnceLock;

use regex::Regex;

/// Replace `{{key}}` / `{{ key }}` with each variable's value.
pub fn render<K, V>(template: &str, vars: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: Display,
{
    let mut result = template.to_string();
    for (key, value) in vars {
        let key = key.as_ref();
        let value = value.to_string();
        result = result
            .replace(&format!("{{{{{key}}}}}"), &value)
            .replace(&format!("{{{{ {key} }}}}"), &value);
    }
    result
}

/// Render, then reduce HTML to plain text.
pub fn render_text<K, V>(template: &str, vars: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: Display,
{
    strip_html(&render(template, vars))
}

/// Drop tags, decode the common entities and trim.
pub fn strip_html(text: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let re = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());

    re.replace_all(text, "")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .trim()
        .to_string()
}

/// Variables carried in a JSON object (`{"name": "Ada", "n": 3}`).
/// Strings are used as-is, other scalars via their JSON form.
pub fn vars_from_json(value: &serde_json::Value) -> Vec<(String, String)> {
    let Some(obj) = value.as_object() else {
        return Vec::new();
    };
    obj.iter()
        .filter_map(|(k, v)| match v {
            serde_json::Value::String(s) => Some((k.clone(), s.clone())),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
            other => Some((k.clone(), other.to_string())),
        })
        .collect()
}
