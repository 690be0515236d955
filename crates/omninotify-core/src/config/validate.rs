//! Configuration predicates and aggregated validation.

use tracing::debug;

use super::schema::Config;
use crate::catalog::{self, CHANNELS};
use crate::error::{NotifyError, NotifyResult};

/// Why a channel cannot be used, as found by [`Config::channel_problems`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelProblem {
    /// The channel name is not in the catalog.
    UnknownChannel,
    /// The selected provider is not registered for this channel.
    UnknownProvider(String),
    /// Required fields that are empty.
    MissingFields(Vec<&'static str>),
}

impl Config {
    /// Provider name selected for a channel (falls back to the catalog default).
    pub fn selected_provider(&self, channel: &str) -> Option<String> {
        let spec = catalog::find_channel(channel)?;
        let selected = self.field(spec.provider_field).unwrap_or_default().trim();
        Some(if selected.is_empty() {
            spec.default_provider.to_string()
        } else {
            selected.to_string()
        })
    }

    /// Everything preventing `channel` from being built. Empty = configured.
    pub fn channel_problems(&self, channel: &str) -> Vec<ChannelProblem> {
        let Some(spec) = catalog::find_channel(channel) else {
            return vec![ChannelProblem::UnknownChannel];
        };

        let mut problems = Vec::new();
        let mut missing: Vec<&'static str> = spec
            .required_fields
            .iter()
            .copied()
            .filter(|f| self.is_blank(f))
            .collect();

        let provider = self.selected_provider(channel).unwrap_or_default();
        match catalog::find_provider(channel, &provider) {
            Some(p) => missing.extend(p.required_fields.iter().copied().filter(|f| self.is_blank(f))),
            None => problems.push(ChannelProblem::UnknownProvider(provider)),
        }

        if !missing.is_empty() {
            problems.insert(0, ChannelProblem::MissingFields(missing));
        }
        problems
    }

    /// True iff the channel's own required fields and those of its selected
    /// provider are all non-empty.
    pub fn is_channel_configured(&self, channel: &str) -> bool {
        self.channel_problems(channel).is_empty()
    }

    /// True iff the channel is listed in `enabled_channels` and configured.
    pub fn is_channel_enabled(&self, channel: &str) -> bool {
        self.enabled_channels.iter().any(|c| c == channel) && self.is_channel_configured(channel)
    }

    /// Check every requirement and report all failures in one error.
    pub fn validate(&self) -> NotifyResult<()> {
        let mut errors = Vec::new();

        if self.enabled_channels.is_empty() {
            errors.push(
                "At least one channel must be enabled (set enabled_channels, e.g. [\"email\", \"whatsapp\"])"
                    .to_string(),
            );
        }

        for channel in &self.enabled_channels {
            for problem in self.channel_problems(channel) {
                errors.push(describe(channel, &problem));
            }
        }

        if errors.is_empty() {
            debug!(channels = ?self.enabled_channels, "configuration valid");
            Ok(())
        } else {
            Err(NotifyError::config(errors.join("; ")))
        }
    }

    fn is_blank(&self, field: &str) -> bool {
        self.field(field).map_or(true, |v| v.trim().is_empty())
    }
}

fn describe(channel: &str, problem: &ChannelProblem) -> String {
    match problem {
        ChannelProblem::UnknownChannel => {
            let known: Vec<&str> = CHANNELS.iter().map(|c| c.name).collect();
            format!(
                "Channel '{channel}' is not supported (known: {})",
                known.join(", ")
            )
        }
        ChannelProblem::UnknownProvider(provider) => {
            format!("Channel '{channel}' uses unknown provider '{provider}'")
        }
        ChannelProblem::MissingFields(fields) => format!(
            "Channel '{channel}' is enabled but not properly configured (missing: {})",
            fields.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whatsapp_ready() -> Config {
        let mut config = Config::default().with_enabled_channels(["whatsapp"]);
        config.whatsapp.access_token = "token".into();
        config.whatsapp.phone_number_id = "123".into();
        config
    }

    #[test]
    fn test_empty_enabled_list_fails() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("At least one channel must be enabled"));
    }

    #[test]
    fn test_enabled_but_unconfigured_fails() {
        let config = Config::default().with_enabled_channels(["whatsapp"]);
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'whatsapp'"));
        assert!(msg.contains("whatsapp_access_token"));
        assert!(msg.contains("whatsapp_phone_number_id"));
    }

    #[test]
    fn test_configured_channel_passes() {
        assert!(whatsapp_ready().validate().is_ok());
    }

    #[test]
    fn test_validate_names_every_offending_channel() {
        let config = Config::default().with_enabled_channels(["whatsapp", "email", "pager"]);
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("'whatsapp'"));
        assert!(msg.contains("'email'"));
        assert!(msg.contains("'pager'"));
    }

    #[test]
    fn test_unknown_provider_is_not_configured() {
        let mut config = Config::default();
        config.email.provider = "postmark".into();
        config.email.sendgrid.api_key = "SG.key".into();
        assert!(!config.is_channel_configured("email"));
        assert_eq!(
            config.channel_problems("email"),
            vec![ChannelProblem::UnknownProvider("postmark".into())]
        );
    }

    #[test]
    fn test_is_channel_configured_independent_of_enabled() {
        let mut config = Config::default();
        config.email.sendgrid.api_key = "SG.key".into();
        assert!(config.is_channel_configured("email"));
        assert!(!config.is_channel_enabled("email"));

        config.enabled_channels.push("email".into());
        assert!(config.is_channel_enabled("email"));
    }

    #[test]
    fn test_whitespace_credentials_are_blank() {
        let mut config = whatsapp_ready();
        config.whatsapp.access_token = "   ".into();
        assert!(!config.is_channel_configured("whatsapp"));
    }

    #[test]
    fn test_empty_provider_falls_back_to_default() {
        let mut config = whatsapp_ready();
        config.whatsapp.provider = String::new();
        assert_eq!(config.selected_provider("whatsapp").as_deref(), Some("meta_api"));
        // The channel itself still requires an explicit provider selection.
        assert!(!config.is_channel_configured("whatsapp"));
    }
}
