//! Configuration system: schema, validation, loading and env var overrides.
//!
//! # Usage
//! ```no_run
//! use omninotify_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Enabled: {:?}", cfg.enabled_channels);
//! ```

pub mod loader;
pub mod schema;
pub mod validate;

// Re-export key types
pub use loader::{env_var_name, get_config_path, load_config, save_config};
pub use schema::{Config, EmailConfig, SendGridConfig, WhatsAppConfig, FIELD_NAMES};
pub use validate::ChannelProblem;
