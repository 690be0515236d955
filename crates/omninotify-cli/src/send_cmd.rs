//! `omninotify send` / `omninotify broadcast`.
//!
//! Both print JSON to stdout and exit non-zero when any delivery failed.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use omninotify_channels::{ChannelManager, Notifier};
use omninotify_core::config::load_config;
use omninotify_core::NotificationParams;

use crate::helpers::{apply_key_values, parse_json_params, parse_request, print_summary};

/// Build a notifier that skips misconfigured channels, so a partially
/// configured setup can still send through the channels that are ready.
fn build_notifier(config_path: Option<&Path>) -> Result<Notifier> {
    let config = load_config(config_path);
    let manager = ChannelManager::from_config(&config).context("failed to build channels")?;
    info!(channels = ?manager.channel_names(), "channels ready");
    Ok(Notifier::with_manager(config, manager))
}

/// Run the send command.
pub async fn run_send(
    config_path: Option<&Path>,
    channel: &str,
    pairs: &[String],
    json: Option<&str>,
) -> Result<()> {
    let mut params = match json {
        Some(raw) => parse_json_params(raw)?,
        None => NotificationParams::new(),
    };
    apply_key_values(&mut params, pairs)?;

    let notifier = build_notifier(config_path)?;
    let result = notifier
        .notify(channel, &params)
        .await
        .with_context(|| format!("cannot send through '{channel}'"))?;

    print_summary(&result);
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Run the broadcast command.
pub async fn run_broadcast(config_path: Option<&Path>, raw_requests: &[String]) -> Result<()> {
    let requests = raw_requests
        .iter()
        .map(|raw| parse_request(raw))
        .collect::<Result<Vec<_>>>()?;

    let notifier = build_notifier(config_path)?;
    let report = notifier.broadcast(requests).await;

    for outcome in &report.results {
        print_summary(&outcome.result);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}
