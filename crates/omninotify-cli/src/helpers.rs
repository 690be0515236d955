//! Shared CLI helpers: path expansion, argument parsing, result printing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use serde_json::Value;

use omninotify_core::utils::truncate_string;
use omninotify_core::{DeliveryResult, NotificationParams};

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Parse a JSON object argument into params.
pub fn parse_json_params(raw: &str) -> Result<NotificationParams> {
    let value: Value = serde_json::from_str(raw).context("invalid JSON params")?;
    Ok(NotificationParams::try_from(value)?)
}

/// Apply `key=value` pairs. Values starting with `[` or `{` are read as JSON
/// (lists of recipients, template components); everything else is a string.
pub fn apply_key_values(params: &mut NotificationParams, pairs: &[String]) -> Result<()> {
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("expected key=value, got '{pair}'"))?;
        let key = key.trim();
        if key.is_empty() {
            bail!("empty key in '{pair}'");
        }

        let value = if value.starts_with('[') || value.starts_with('{') {
            serde_json::from_str(value).with_context(|| format!("invalid JSON for '{key}'"))?
        } else {
            Value::String(value.to_string())
        };
        params.insert(key, value);
    }
    Ok(())
}

/// Parse `channel=<json object>` into a broadcast request.
pub fn parse_request(raw: &str) -> Result<(String, NotificationParams)> {
    let (channel, json) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected channel=<json>, got '{raw}'"))?;
    let params =
        parse_json_params(json).with_context(|| format!("invalid request for '{channel}'"))?;
    Ok((channel.trim().to_string(), params))
}

/// One-line human summary of a delivery result, printed to stderr.
pub fn print_summary(result: &DeliveryResult) {
    match result {
        DeliveryResult::Success(s) => eprintln!(
            "  {} {} via {} (message id: {})",
            "✓".green(),
            s.channel,
            s.provider,
            s.message_id.as_deref().unwrap_or("-")
        ),
        DeliveryResult::Failure(f) => eprintln!(
            "  {} {} [{}]: {}",
            "✗".red(),
            f.channel,
            f.error_kind,
            truncate_string(&f.error, 120)
        ),
    }
}
