//! `omninotify onboard`: create the configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use omninotify_core::config::{env_var_name, get_config_path, save_config, FIELD_NAMES};
use omninotify_core::Config;

/// Run the onboard command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "Omninotify Setup".cyan().bold());
    println!();

    let path = config_path.map_or_else(get_config_path, Path::to_path_buf);
    let created = write_default_config(&path)?;
    if created {
        println!("  {} created config at {}", "✓".green(), path.display());
    } else {
        println!("  {} config already exists at {}", "✓".green(), path.display());
    }

    println!();
    println!("  Fill in the credentials, or set them through the environment:");
    for field in FIELD_NAMES {
        println!("    {}", env_var_name(field).dimmed());
    }
    println!();
    println!(
        "{}",
        "  Then run `omninotify validate` to check the setup.".green()
    );
    println!();

    Ok(())
}

/// Write a default config unless one exists. Returns whether it was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omninotify_core::config::load_config;

    #[test]
    fn test_write_default_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert!(write_default_config(&path).unwrap());
        assert!(path.exists());
        assert!(!write_default_config(&path).unwrap());

        let loaded = load_config(Some(&path));
        assert_eq!(loaded.whatsapp.provider, "meta_api");
        assert!(loaded.enabled_channels.is_empty());
    }
}
