//! Shared HTTP plumbing for the adapters.

use std::time::Duration;

use serde_json::Value;

use omninotify_core::{NotifyError, NotifyResult};

/// Per-request timeout applied to every adapter client.
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build a connection-pooled client with the adapter timeout.
pub(crate) fn build_client() -> NotifyResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| NotifyError::config(format!("Failed to build HTTP client: {e}")))
}

/// Decode a response body: empty → `null`, non-JSON → JSON string.
pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
