//! Notifier: the public entry point holding configuration and registry.
//!
//! An explicit context object instead of process-wide state: build one with
//! [`Notifier::configure`], pass it where notifications are sent, and call
//! [`Notifier::reset`] to swap in a new configuration.

use tracing::info;

use omninotify_core::{Config, DeliveryResult, NotificationParams, NotifyResult};

use crate::manager::{BroadcastReport, ChannelManager};

pub struct Notifier {
    config: Config,
    manager: ChannelManager,
}

impl Notifier {
    /// Validate `config` and build the channel registry.
    pub fn configure(config: Config) -> NotifyResult<Self> {
        let manager = ChannelManager::from_config_strict(&config)?;
        info!(channels = ?manager.channel_names(), "notifier configured");
        Ok(Self { config, manager })
    }

    /// Use a prebuilt registry (custom channels, test doubles).
    pub fn with_manager(config: Config, manager: ChannelManager) -> Self {
        Self { config, manager }
    }

    /// Send one notification through `channel`.
    pub async fn notify(
        &self,
        channel: &str,
        params: &NotificationParams,
    ) -> NotifyResult<DeliveryResult> {
        self.manager.send(channel, params).await
    }

    /// Send to several channels at once.
    pub async fn broadcast(&self, requests: Vec<(String, NotificationParams)>) -> BroadcastReport {
        self.manager.broadcast(requests).await
    }

    /// Replace the configuration and rebuild every channel.
    ///
    /// On error the previous configuration and registry stay in place.
    pub fn reset(&mut self, config: Config) -> NotifyResult<()> {
        let manager = ChannelManager::from_config_strict(&config)?;
        info!(channels = ?manager.channel_names(), "notifier reset");
        self.config = config;
        self.manager = manager;
        Ok(())
    }

    /// Rebuild the registry from the current configuration, e.g. after
    /// edits through [`config_mut`](Self::config_mut).
    pub fn rebuild(&mut self) -> NotifyResult<()> {
        self.manager = ChannelManager::from_config_strict(&self.config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration. Changes take effect on
    /// [`rebuild`](Self::rebuild).
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn manager(&self) -> &ChannelManager {
        &self.manager
    }

    pub fn channel_enabled(&self, channel: &str) -> bool {
        self.manager.is_channel_enabled(channel)
    }

    /// Names of the channels ready for dispatch, sorted.
    pub fn available_channels(&self) -> Vec<String> {
        self.manager.channel_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omninotify_core::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn whatsapp_config(api_base: &str) -> Config {
        let mut config = Config::default().with_enabled_channels(["whatsapp"]);
        config.whatsapp.access_token = "tok".into();
        config.whatsapp.phone_number_id = "123".into();
        config.whatsapp.api_base = api_base.into();
        config
    }

    #[test]
    fn test_configure_validates() {
        let err = Notifier::configure(Config::default()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("At least one channel"));
    }

    #[tokio::test]
    async fn test_notify_through_meta_api() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v17.0/123/messages"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"messages": [{"id": "wamid.1"}]})),
            )
            .mount(&mock_server)
            .await;

        let notifier = Notifier::configure(whatsapp_config(&mock_server.uri())).unwrap();
        assert_eq!(notifier.available_channels(), vec!["whatsapp"]);

        let params = NotificationParams::new()
            .with("recipient", "1234567890")
            .with("message", "Hello");
        let result = notifier.notify("whatsapp", &params).await.unwrap();

        assert_eq!(
            result.to_json().unwrap(),
            json!({
                "success": true,
                "messageId": "wamid.1",
                "channel": "whatsapp",
                "provider": "meta_api"
            })
        );
    }

    #[tokio::test]
    async fn test_notify_disabled_channel() {
        let notifier = Notifier::configure(whatsapp_config("")).unwrap();
        let err = notifier
            .notify("email", &NotificationParams::new())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ChannelNotEnabled);
    }

    #[test]
    fn test_reset_keeps_previous_on_error() {
        let mut notifier = Notifier::configure(whatsapp_config("")).unwrap();

        let bad = Config::default().with_enabled_channels(["email"]);
        assert!(notifier.reset(bad).is_err());
        assert!(notifier.channel_enabled("whatsapp"));
        assert_eq!(notifier.config().enabled_channels, vec!["whatsapp"]);
    }

    #[test]
    fn test_reset_swaps_channels() {
        let mut notifier = Notifier::configure(whatsapp_config("")).unwrap();

        let mut email = Config::default().with_enabled_channels(["email"]);
        email.email.sendgrid.api_key = "SG.key".into();
        notifier.reset(email).unwrap();

        assert!(!notifier.channel_enabled("whatsapp"));
        assert!(notifier.channel_enabled("email"));
    }

    #[test]
    fn test_rebuild_after_config_mut() {
        let mut notifier = Notifier::configure(whatsapp_config("")).unwrap();
        notifier.config_mut().email.sendgrid.api_key = "SG.key".into();
        notifier
            .config_mut()
            .enabled_channels
            .push("email".to_string());

        assert!(!notifier.channel_enabled("email"));
        notifier.rebuild().unwrap();
        assert_eq!(notifier.available_channels(), vec!["email", "whatsapp"]);
    }
}
