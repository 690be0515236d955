//! `omninotify status` and `omninotify validate`.

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;

use omninotify_core::catalog::{providers_for, CHANNELS};
use omninotify_core::config::{get_config_path, load_config, ChannelProblem};
use omninotify_core::utils::mask_secret;
use omninotify_core::Config;

/// Credential fields shown by `status`; secrets are masked.
const SHOWN_FIELDS: &[(&str, bool)] = &[
    ("whatsapp_access_token", true),
    ("whatsapp_phone_number_id", false),
    ("sendgrid_api_key", true),
    ("email_from", false),
];

fn resolve_path(config_path: Option<&Path>) -> std::path::PathBuf {
    config_path.map_or_else(get_config_path, Path::to_path_buf)
}

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = resolve_path(config_path);
    let config = load_config(Some(&path));

    println!();
    println!("{}", "Omninotify Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    println!("  {:<18} {}", "Providers:".bold(), known_providers().join(", "));

    // Channels
    println!();
    println!("  {}", "Channels:".bold());
    for spec in CHANNELS {
        let provider = config.selected_provider(spec.name).unwrap_or_default();
        println!(
            "    {:<12} {:<12} {}",
            spec.display_name,
            provider,
            channel_state(&config, spec.name)
        );
    }

    // Credentials
    println!();
    println!("  {}", "Credentials:".bold());
    for (field, secret) in SHOWN_FIELDS {
        let value = config.field(field).unwrap_or_default();
        let shown = if value.is_empty() {
            format!("{}", "· not set".dimmed())
        } else if *secret {
            format!("{} {}", "✓".green(), mask_secret(value))
        } else {
            format!("{} {}", "✓".green(), value)
        };
        println!("    {:<26} {}", field, shown);
    }

    println!();
    Ok(())
}

/// Every provider in the catalog, in channel order.
fn known_providers() -> Vec<&'static str> {
    CHANNELS
        .iter()
        .flat_map(|spec| providers_for(spec.name))
        .collect()
}

/// Colored one-word state for a channel, plus what is missing.
fn channel_state(config: &Config, channel: &str) -> String {
    let enabled = config.enabled_channels.iter().any(|c| c == channel);
    let problems = config.channel_problems(channel);

    match (enabled, problems.is_empty()) {
        (true, true) => format!("{} enabled", "✓".green()),
        (false, true) => format!("{}", "· configured, not enabled".dimmed()),
        (enabled, false) => {
            let label = if enabled {
                "✗ enabled, not configured".red().to_string()
            } else {
                "· not configured".dimmed().to_string()
            };
            format!("{label} ({})", describe_problems(&problems))
        }
    }
}

fn describe_problems(problems: &[ChannelProblem]) -> String {
    problems
        .iter()
        .map(|p| match p {
            ChannelProblem::UnknownChannel => "unknown channel".to_string(),
            ChannelProblem::UnknownProvider(name) => format!("unknown provider '{name}'"),
            ChannelProblem::MissingFields(fields) => format!("missing: {}", fields.join(", ")),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run the validate command.
pub fn run_validate(config_path: Option<&Path>) -> Result<()> {
    let path = resolve_path(config_path);
    let config = load_config(Some(&path));

    match config.validate() {
        Ok(()) => {
            println!(
                "  {} configuration is valid ({})",
                "✓".green(),
                config.enabled_channels.join(", ")
            );
            Ok(())
        }
        Err(e) => {
            println!("  {} {}", "✗".red(), e);
            bail!("configuration at {} is invalid", path.display())
        }
    }
}
