//! Recipient phone number normalization.

/// Strip whitespace and separator punctuation (`-`, `(`, `)`) and make sure
/// the number starts with `+`.
pub fn normalize_phone(number: &str) -> String {
    let cleaned: String = number
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if cleaned.starts_with('+') {
        cleaned
    } else {
        format!("+{cleaned}")
    }
}
