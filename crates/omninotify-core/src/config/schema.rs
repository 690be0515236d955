//! Configuration schema: typed credentials plus flat named-field access.
//!
//! Hierarchy: `Config` → `WhatsAppConfig`, `EmailConfig` → `SendGridConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! The flat field names in [`FIELD_NAMES`] (`whatsapp_access_token`,
//! `sendgrid_api_key`, …) are what the catalog, `set_field` and `to_map` use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NotifyError, NotifyResult};

/// Default WhatsApp Graph API version.
pub const DEFAULT_WHATSAPP_API_VERSION: &str = "v17.0";

/// Every flat field name understood by `get_field` / `set_field`.
pub const FIELD_NAMES: &[&str] = &[
    "enabled_channels",
    "whatsapp_provider",
    "whatsapp_access_token",
    "whatsapp_phone_number_id",
    "whatsapp_business_account_id",
    "whatsapp_api_version",
    "whatsapp_api_base",
    "email_provider",
    "email_from",
    "sendgrid_api_key",
    "sendgrid_api_base",
];

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.omninotify/config.json` + env vars.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Channels the dispatcher should try to build, e.g. `["email", "whatsapp"]`.
    pub enabled_channels: Vec<String>,
    pub whatsapp: WhatsAppConfig,
    pub email: EmailConfig,
}

// ─────────────────────────────────────────────
// WhatsApp
// ─────────────────────────────────────────────

/// WhatsApp channel config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhatsAppConfig {
    /// Provider adapter name (`"meta_api"`).
    pub provider: String,
    pub access_token: String,
    pub phone_number_id: String,
    pub business_account_id: String,
    pub api_version: String,
    /// Override for the Graph API base URL (tests, proxies).
    pub api_base: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            provider: "meta_api".to_string(),
            access_token: String::new(),
            phone_number_id: String::new(),
            business_account_id: String::new(),
            api_version: DEFAULT_WHATSAPP_API_VERSION.to_string(),
            api_base: String::new(),
        }
    }
}

// ─────────────────────────────────────────────
// Email
// ─────────────────────────────────────────────

/// Email channel config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailConfig {
    /// Provider adapter name (`"sendgrid"`).
    pub provider: String,
    /// Sender address used when a message has no `from`.
    pub from: String,
    pub sendgrid: SendGridConfig,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: "sendgrid".to_string(),
            from: String::new(),
            sendgrid: SendGridConfig::default(),
        }
    }
}

/// SendGrid credentials.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendGridConfig {
    pub api_key: String,
    /// Override for the SendGrid API base URL (tests, proxies).
    pub api_base: String,
}

// ─────────────────────────────────────────────
// Named field access
// ─────────────────────────────────────────────

impl Config {
    /// Builder-style helper to enable channels.
    pub fn with_enabled_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_channels = channels.into_iter().map(Into::into).collect();
        self
    }

    /// Borrow a string field by flat name. `enabled_channels` is not a string
    /// field and yields `None`, as do unknown names.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "whatsapp_provider" => &self.whatsapp.provider,
            "whatsapp_access_token" => &self.whatsapp.access_token,
            "whatsapp_phone_number_id" => &self.whatsapp.phone_number_id,
            "whatsapp_business_account_id" => &self.whatsapp.business_account_id,
            "whatsapp_api_version" => &self.whatsapp.api_version,
            "whatsapp_api_base" => &self.whatsapp.api_base,
            "email_provider" => &self.email.provider,
            "email_from" => &self.email.from,
            "sendgrid_api_key" => &self.email.sendgrid.api_key,
            "sendgrid_api_base" => &self.email.sendgrid.api_base,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Get any field by flat name, `enabled_channels` rendered comma-separated.
    pub fn get_field(&self, name: &str) -> Option<String> {
        if name == "enabled_channels" {
            return Some(self.enabled_channels.join(","));
        }
        self.field(name).map(String::from)
    }

    /// Set a field by flat name. The value is stored as given; only the
    /// field name is checked.
    ///
    /// `enabled_channels` takes a comma-separated list.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> NotifyResult<()> {
        let value = value.into();
        let slot = match name {
            "enabled_channels" => {
                self.enabled_channels = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                return Ok(());
            }
            "whatsapp_provider" => &mut self.whatsapp.provider,
            "whatsapp_access_token" => &mut self.whatsapp.access_token,
            "whatsapp_phone_number_id" => &mut self.whatsapp.phone_number_id,
            "whatsapp_business_account_id" => &mut self.whatsapp.business_account_id,
            "whatsapp_api_version" => &mut self.whatsapp.api_version,
            "whatsapp_api_base" => &mut self.whatsapp.api_base,
            "email_provider" => &mut self.email.provider,
            "email_from" => &mut self.email.from,
            "sendgrid_api_key" => &mut self.email.sendgrid.api_key,
            "sendgrid_api_base" => &mut self.email.sendgrid.api_base,
            _ => {
                return Err(NotifyError::config(format!(
                    "Unknown configuration field: {name}"
                )))
            }
        };
        *slot = value;
        Ok(())
    }

    /// Export all non-empty fields, keyed by flat name.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        FIELD_NAMES
            .iter()
            .filter_map(|name| {
                let value = self.get_field(name)?;
                (!value.is_empty()).then(|| (name.to_string(), value))
            })
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.whatsapp.api_version, "v17.0");
        assert_eq!(config.whatsapp.provider, "meta_api");
        assert_eq!(config.email.provider, "sendgrid");
        assert!(config.enabled_channels.is_empty());
    }

    #[test]
    fn test_set_and_get_field() {
        let mut config = Config::default();
        config.set_field("sendgrid_api_key", "SG.test").unwrap();
        config.set_field("whatsapp_access_token", "tok").unwrap();

        assert_eq!(config.email.sendgrid.api_key, "SG.test");
        assert_eq!(config.get_field("whatsapp_access_token").as_deref(), Some("tok"));
    }

    #[test]
    fn test_set_field_does_not_validate_value() {
        let mut config = Config::default();
        config.set_field("email_provider", "carrier-pigeon").unwrap();
        assert_eq!(config.email.provider, "carrier-pigeon");
    }

    #[test]
    fn test_set_enabled_channels_from_list() {
        let mut config = Config::default();
        config.set_field("enabled_channels", "email, whatsapp,,").unwrap();
        assert_eq!(config.enabled_channels, vec!["email", "whatsapp"]);
        assert_eq!(config.get_field("enabled_channels").as_deref(), Some("email,whatsapp"));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut config = Config::default();
        let err = config.set_field("smtp_host", "x").unwrap_err();
        assert!(err.to_string().contains("smtp_host"));
    }

    #[test]
    fn test_every_field_name_is_addressable() {
        let config = Config::default();
        for name in FIELD_NAMES {
            assert!(config.get_field(name).is_some(), "field {name} not readable");
        }
    }

    #[test]
    fn test_to_map_skips_empty() {
        let mut config = Config::default();
        config.set_field("sendgrid_api_key", "SG.key").unwrap();

        let map = config.to_map();
        assert_eq!(map.get("sendgrid_api_key").map(String::as_str), Some("SG.key"));
        assert_eq!(map.get("whatsapp_api_version").map(String::as_str), Some("v17.0"));
        assert!(!map.contains_key("whatsapp_access_token"));
        assert!(!map.contains_key("enabled_channels"));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let raw = serde_json::to_value(Config::default()).unwrap();
        assert!(raw.get("enabledChannels").is_some());
        assert!(raw["whatsapp"].get("phoneNumberId").is_some());
        assert!(raw["email"]["sendgrid"].get("apiKey").is_some());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"enabledChannels": ["whatsapp"], "whatsapp": {"accessToken": "t"}}"#,
        )
        .unwrap();
        assert_eq!(config.whatsapp.access_token, "t");
        assert_eq!(config.whatsapp.api_version, "v17.0");
        assert_eq!(config.email.provider, "sendgrid");
    }
}
