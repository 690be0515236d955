//! Channel and provider catalog: static requirement tables.
//!
//! Each `ChannelSpec` names the config field that selects its provider and
//! the fields the channel itself needs. Each `ProviderSpec` lists the
//! credential fields one external API needs. `Config::is_channel_configured`
//! is evaluated against these tables.

// ─────────────────────────────────────────────
// Specs
// ─────────────────────────────────────────────

/// Static description of one logical channel.
#[derive(Clone, Debug)]
pub struct ChannelSpec {
    /// Channel name used in `enabled_channels` and dispatch (e.g. `"email"`).
    pub name: &'static str,
    /// Human-readable name for logs and the CLI.
    pub display_name: &'static str,
    /// Config field holding the selected provider name.
    pub provider_field: &'static str,
    /// Provider used when `provider_field` is empty.
    pub default_provider: &'static str,
    /// Config fields that must be non-empty regardless of provider.
    pub required_fields: &'static [&'static str],
}

/// Static description of one provider adapter.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Provider name as written in config (e.g. `"sendgrid"`).
    pub name: &'static str,
    /// Channel this provider implements.
    pub channel: &'static str,
    /// Human-readable name for logs and error messages.
    pub display_name: &'static str,
    /// Credential fields that must be non-empty.
    pub required_fields: &'static [&'static str],
}

// ─────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────

/// All channels known to the dispatcher.
pub static CHANNELS: &[ChannelSpec] = &[
    ChannelSpec {
        name: "whatsapp",
        display_name: "WhatsApp",
        provider_field: "whatsapp_provider",
        default_provider: "meta_api",
        required_fields: &["whatsapp_provider"],
    },
    ChannelSpec {
        name: "email",
        display_name: "Email",
        provider_field: "email_provider",
        default_provider: "sendgrid",
        required_fields: &["email_provider"],
    },
];

/// All provider adapters, grouped by channel.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "meta_api",
        channel: "whatsapp",
        display_name: "WhatsApp Cloud API",
        required_fields: &["whatsapp_access_token", "whatsapp_phone_number_id"],
    },
    ProviderSpec {
        name: "sendgrid",
        channel: "email",
        display_name: "SendGrid",
        required_fields: &["sendgrid_api_key"],
    },
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a channel spec by name.
pub fn find_channel(name: &str) -> Option<&'static ChannelSpec> {
    CHANNELS.iter().find(|c| c.name == name)
}

/// Find a provider spec by channel and provider name.
pub fn find_provider(channel: &str, name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS
        .iter()
        .find(|p| p.channel == channel && p.name == name)
}

/// Provider names available for a channel.
pub fn providers_for(channel: &str) -> Vec<&'static str> {
    PROVIDERS
        .iter()
        .filter(|p| p.channel == channel)
        .map(|p| p.name)
        .collect()
}

/// Whether the channel name is in the catalog.
pub fn is_known_channel(name: &str) -> bool {
    find_channel(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_channel() {
        let spec = find_channel("email").unwrap();
        assert_eq!(spec.default_provider, "sendgrid");
        assert!(find_channel("sms").is_none());
    }

    #[test]
    fn test_find_provider_scoped_by_channel() {
        assert!(find_provider("whatsapp", "meta_api").is_some());
        assert!(find_provider("email", "meta_api").is_none());
    }

    #[test]
    fn test_providers_for() {
        assert_eq!(providers_for("email"), vec!["sendgrid"]);
        assert!(providers_for("telegram").is_empty());
    }

    #[test]
    fn test_every_provider_has_a_channel() {
        for provider in PROVIDERS {
            assert!(
                is_known_channel(provider.channel),
                "provider {} points at unknown channel {}",
                provider.name,
                provider.channel
            );
        }
    }

    #[test]
    fn test_every_default_provider_exists() {
        for channel in CHANNELS {
            assert!(find_provider(channel.name, channel.default_provider).is_some());
        }
    }
}
