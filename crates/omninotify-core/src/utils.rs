//! Utility helpers: path resolution and string manipulation.

use std::path::PathBuf;

/// Get the Omninotify data directory (e.g. `~/.omninotify/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".omninotify")
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Show only the first few characters of a secret.
pub fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let visible: String = s.chars().take(6).collect();
    format!("{visible}...")
}

/// Capitalize the first character (`"recipient"` → `"Recipient"`).
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate_string("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("SG.abcdefghijk"), "SG.abc...");
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("recipient"), "Recipient");
        assert_eq!(capitalize("template_name"), "Template_name");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_data_path_ends_with_dir() {
        assert!(get_data_path().ends_with(".omninotify"));
    }
}
