//! Config loader: reads `~/.omninotify/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.omninotify/config.json` (or an explicit path)
//! 3. Environment variables `OMNINOTIFY_<FIELD>` (override JSON), where
//!    `<FIELD>` is any name from [`FIELD_NAMES`] in upper case

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, FIELD_NAMES};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "OMNINOTIFY_";

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given path (or the default one) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply `OMNINOTIFY_<FIELD>` overrides on top of a loaded config.
///
/// - `OMNINOTIFY_ENABLED_CHANNELS=email,whatsapp`
/// - `OMNINOTIFY_SENDGRID_API_KEY=SG.xxx`
/// - `OMNINOTIFY_WHATSAPP_ACCESS_TOKEN=...`
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_with(config, |var| std::env::var(var).ok())
}

/// Apply overrides from any `OMNINOTIFY_<FIELD>` lookup.
fn apply_overrides_with(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    for name in FIELD_NAMES {
        let var = env_var_name(name);
        if let Some(val) = lookup(&var) {
            if let Err(e) = config.set_field(name, val) {
                warn!(var = %var, error = %e, "ignoring env override");
            } else {
                debug!(var = %var, "applied env override");
            }
        }
    }
    config
}

/// Env var name for a flat field name.
pub fn env_var_name(field: &str) -> String {
    format!("{ENV_PREFIX}{}", field.to_uppercase())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
