//! Omninotify CLI: entry point.
//!
//! # Commands
//!
//! - `omninotify send -c CHANNEL -p key=value ...`: one notification
//! - `omninotify broadcast -r 'channel={...}' ...`: several channels at once
//! - `omninotify status`: config path and per-channel state
//! - `omninotify validate`: run configuration validation
//! - `omninotify onboard`: write a default config file

mod helpers;
mod onboard;
mod send_cmd;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Omninotify: send notifications through WhatsApp and email providers
#[derive(Parser)]
#[command(name = "omninotify", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.omninotify/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one notification and print the delivery result as JSON
    Send {
        /// Channel name (e.g. "email", "whatsapp")
        #[arg(short, long)]
        channel: String,

        /// Parameter as key=value; repeatable
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Parameters as a JSON object, merged before --param values
        #[arg(long)]
        json: Option<String>,
    },

    /// Send to several channels concurrently and print the report
    Broadcast {
        /// Request as channel=<json object>; repeatable
        #[arg(short, long = "request", required = true)]
        requests: Vec<String>,
    },

    /// Show configuration and channel status
    Status,

    /// Validate the configuration
    Validate,

    /// Create the default configuration file
    Onboard,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config_path = cli.config.map(|p| helpers::expand_tilde(&p.to_string_lossy()));
    let config_path = config_path.as_deref();

    match cli.command {
        Commands::Send {
            channel,
            params,
            json,
        } => send_cmd::run_send(config_path, &channel, &params, json.as_deref()).await,
        Commands::Broadcast { requests } => send_cmd::run_broadcast(config_path, &requests).await,
        Commands::Status => status::run(config_path),
        Commands::Validate => status::run_validate(config_path),
        Commands::Onboard => onboard::run(config_path),
    }
}

// ─────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("omninotify=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    // Logs go to stderr so stdout stays machine-readable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
