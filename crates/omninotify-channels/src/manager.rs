//! Channel Manager: builds the channel registry and routes deliveries.
//!
//! Responsibilities:
//! - Build every enabled, configured channel from `Config`
//! - Dispatch a notification to one channel by name
//! - Broadcast to several channels concurrently and aggregate the outcome

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use omninotify_core::config::ChannelProblem;
use omninotify_core::{Config, DeliveryResult, NotificationParams, NotifyError, NotifyResult};

use crate::base::Channel;
use crate::email::EmailChannel;
use crate::whatsapp::WhatsAppChannel;

/// Constructor for a channel.
pub type ChannelFactory = fn(&Config) -> NotifyResult<Arc<dyn Channel>>;

/// Channels by name.
pub static CHANNEL_FACTORIES: &[(&str, ChannelFactory)] = &[
    ("whatsapp", build_whatsapp),
    ("email", build_email),
];

fn build_whatsapp(config: &Config) -> NotifyResult<Arc<dyn Channel>> {
    Ok(Arc::new(WhatsAppChannel::new(config)?))
}

fn build_email(config: &Config) -> NotifyResult<Arc<dyn Channel>> {
    Ok(Arc::new(EmailChannel::new(config)?))
}

fn factory_for(name: &str) -> Option<ChannelFactory> {
    CHANNEL_FACTORIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, f)| *f)
}

// ─────────────────────────────────────────────
// Broadcast report
// ─────────────────────────────────────────────

/// One channel's entry in a broadcast.
#[derive(Clone, Debug, Serialize)]
pub struct ChannelOutcome {
    pub channel: String,
    pub result: DeliveryResult,
}

/// Aggregate of a broadcast: `success` only if every channel succeeded.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastReport {
    pub success: bool,
    pub results: Vec<ChannelOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BroadcastReport {
    /// Result for a channel, if it was part of the broadcast.
    pub fn result_for(&self, channel: &str) -> Option<&DeliveryResult> {
        self.results
            .iter()
            .find(|o| o.channel == channel)
            .map(|o| &o.result)
    }

    pub fn failed_channels(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|o| !o.result.is_success())
            .map(|o| o.channel.as_str())
            .collect()
    }
}

// ─────────────────────────────────────────────
// ChannelManager
// ─────────────────────────────────────────────

/// Registry of ready-to-use channels, keyed by name.
///
/// Built once from `Config`; read-only afterwards apart from explicit
/// `register` calls.
#[derive(Default)]
pub struct ChannelManager {
    channels: HashMap<String, Arc<dyn Channel>>,
}

impl ChannelManager {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every enabled channel whose configuration is complete.
    ///
    /// Enabled but misconfigured channels are skipped with a warning and
    /// report as "not enabled" on dispatch. An enabled name that no channel
    /// implements is a configuration error, as is an adapter that refuses
    /// to build.
    pub fn from_config(config: &Config) -> NotifyResult<Self> {
        let mut manager = Self::new();

        for name in &config.enabled_channels {
            let Some(factory) = factory_for(name) else {
                return Err(NotifyError::config(format!(
                    "Unknown channel '{name}' in enabled_channels"
                )));
            };

            let problems = config.channel_problems(name);
            if !problems.is_empty() {
                warn!(
                    channel = %name,
                    problems = ?describe(&problems),
                    "channel enabled but not configured, skipping"
                );
                continue;
            }

            manager.register(factory(config)?);
        }

        info!(channels = ?manager.channel_names(), "channel registry built");
        Ok(manager)
    }

    /// Like [`from_config`](Self::from_config), but runs `Config::validate`
    /// first so a misconfigured channel fails the build.
    pub fn from_config_strict(config: &Config) -> NotifyResult<Self> {
        config.validate()?;
        Self::from_config(config)
    }

    /// Register a channel. Overwrites any previous channel with the same name.
    pub fn register(&mut self, channel: Arc<dyn Channel>) {
        let name = channel.name().to_string();
        info!(channel = %name, provider = channel.provider_name(), "registered channel");
        self.channels.insert(name, channel);
    }

    /// Get a registered channel by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Channel>> {
        self.channels.get(name)
    }

    /// Get the names of all registered channels, sorted.
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether `name` was built into the registry.
    pub fn is_channel_enabled(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Whether any channel implementation exists for `name`.
    pub fn is_supported(&self, name: &str) -> bool {
        factory_for(name).is_some() || self.channels.contains_key(name)
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether there are no registered channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Deliver through one channel.
    ///
    /// `Err` only for routing problems (unsupported or not enabled); every
    /// per-call problem comes back as `DeliveryResult::Failure`.
    pub async fn send(
        &self,
        channel: &str,
        params: &NotificationParams,
    ) -> NotifyResult<DeliveryResult> {
        if !self.is_supported(channel) {
            return Err(NotifyError::ChannelNotSupported(channel.to_string()));
        }
        let Some(ch) = self.channels.get(channel) else {
            return Err(NotifyError::ChannelNotEnabled(channel.to_string()));
        };

        debug!(channel = %channel, params = params.len(), "dispatching notification");
        Ok(ch.deliver(params).await)
    }

    /// Deliver to several channels concurrently.
    ///
    /// Every request yields one entry, in request order. Routing errors
    /// become failure entries; one failure never affects another channel.
    pub async fn broadcast(&self, requests: Vec<(String, NotificationParams)>) -> BroadcastReport {
        let started_at = Utc::now();

        let deliveries = requests.iter().map(|(channel, params)| async move {
            let result = match self.send(channel, params).await {
                Ok(result) => result,
                Err(e) => {
                    let provider = self.get(channel).map(|c| c.provider_name().to_string());
                    DeliveryResult::failure(channel.as_str(), provider, &e)
                }
            };
            ChannelOutcome {
                channel: channel.clone(),
                result,
            }
        });
        let results = join_all(deliveries).await;

        let success = !results.is_empty() && results.iter().all(|o| o.result.is_success());
        info!(
            channels = results.len(),
            failed = results.iter().filter(|o| !o.result.is_success()).count(),
            "broadcast finished"
        );

        BroadcastReport {
            success,
            results,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

fn describe(problems: &[ChannelProblem]) -> Vec<String> {
    problems
        .iter()
        .map(|p| match p {
            ChannelProblem::UnknownChannel => "unknown channel".to_string(),
            ChannelProblem::UnknownProvider(name) => format!("unknown provider '{name}'"),
            ChannelProblem::MissingFields(fields) => format!("missing: {}", fields.join(", ")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use omninotify_core::{ErrorKind, ProviderReceipt};
    use serde_json::json;

    /// Succeeds with a fixed id, or fails every call.
    struct FixedChannel {
        name: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl Channel for FixedChannel {
        fn name(&self) -> &str {
            self.name
        }

        fn provider_name(&self) -> &str {
            "fixed"
        }

        async fn deliver(&self, _params: &NotificationParams) -> DeliveryResult {
            if self.fail {
                return DeliveryResult::failure(
                    self.name,
                    Some("fixed".into()),
                    &NotifyError::validation("Recipient cannot be blank"),
                );
            }
            DeliveryResult::success(
                self.name,
                "fixed",
                ProviderReceipt {
                    message_id: Some("123".into()),
                    ..ProviderReceipt::default()
                },
            )
        }
    }

    fn manager_with(channels: &[(&'static str, bool)]) -> ChannelManager {
        let mut manager = ChannelManager::new();
        for (name, fail) in channels {
            manager.register(Arc::new(FixedChannel {
                name: *name,
                fail: *fail,
            }));
        }
        manager
    }

    fn whatsapp_config() -> Config {
        let mut config = Config::default().with_enabled_channels(["whatsapp"]);
        config.whatsapp.access_token = "tok".into();
        config.whatsapp.phone_number_id = "123".into();
        config
    }

    #[test]
    fn test_from_config_builds_configured_channels() {
        let manager = ChannelManager::from_config(&whatsapp_config()).unwrap();
        assert_eq!(manager.channel_names(), vec!["whatsapp"]);
        assert_eq!(manager.get("whatsapp").unwrap().provider_name(), "meta_api");
    }

    #[test]
    fn test_from_config_skips_misconfigured() {
        let config = whatsapp_config().with_enabled_channels(["whatsapp", "email"]);
        let manager = ChannelManager::from_config(&config).unwrap();

        assert!(manager.is_channel_enabled("whatsapp"));
        assert!(!manager.is_channel_enabled("email"));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_from_config_unknown_channel() {
        let config = Config::default().with_enabled_channels(["carrier_pigeon"]);
        let err = ChannelManager::from_config(&config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("carrier_pigeon"));
    }

    #[test]
    fn test_from_config_strict_fails_fast() {
        let config = whatsapp_config().with_enabled_channels(["whatsapp", "email"]);
        let err = ChannelManager::from_config_strict(&config).err().unwrap();
        assert!(err.to_string().contains("Channel 'email'"));

        assert!(ChannelManager::from_config_strict(&whatsapp_config()).is_ok());
    }

    #[tokio::test]
    async fn test_send_not_enabled() {
        let manager = ChannelManager::from_config(&whatsapp_config()).unwrap();
        let err = manager
            .send("email", &NotificationParams::new())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ChannelNotEnabled);
        assert_eq!(err.to_string(), "Channel 'email' is not enabled");
    }

    #[tokio::test]
    async fn test_send_not_supported() {
        let manager = ChannelManager::new();
        for name in ["sms", "push", ""] {
            let err = manager
                .send(name, &NotificationParams::new())
                .await
                .err()
                .unwrap();
            assert_eq!(err.kind(), ErrorKind::ChannelNotSupported);
        }
    }

    #[tokio::test]
    async fn test_send_routes_to_registered_channel() {
        let manager = manager_with(&[("custom", false)]);
        assert!(manager.is_supported("custom"));

        let result = manager
            .send("custom", &NotificationParams::new())
            .await
            .unwrap();
        assert_eq!(result.message_id(), Some("123"));
        assert_eq!(result.channel(), "custom");
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        let manager = manager_with(&[("whatsapp", false), ("email", true)]);

        let report = manager
            .broadcast(vec![
                ("whatsapp".into(), NotificationParams::new()),
                ("email".into(), NotificationParams::new()),
            ])
            .await;

        assert!(!report.success);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failed_channels(), vec!["email"]);
        assert_eq!(
            report.result_for("whatsapp").unwrap().to_json().unwrap(),
            json!({
                "success": true,
                "messageId": "123",
                "channel": "whatsapp",
                "provider": "fixed"
            })
        );
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_broadcast_routing_error_becomes_entry() {
        let manager = manager_with(&[("email", false)]);

        let report = manager
            .broadcast(vec![
                ("email".into(), NotificationParams::new()),
                ("whatsapp".into(), NotificationParams::new()),
            ])
            .await;

        assert!(!report.success);
        let failure = report.result_for("whatsapp").unwrap().as_failure().unwrap();
        assert_eq!(failure.error_kind, ErrorKind::ChannelNotEnabled);
        assert!(failure.provider.is_none());
        assert!(report.result_for("email").unwrap().is_success());
    }

    #[tokio::test]
    async fn test_broadcast_all_succeed() {
        let manager = manager_with(&[("a", false), ("b", false)]);
        let report = manager
            .broadcast(vec![
                ("a".into(), NotificationParams::new()),
                ("b".into(), NotificationParams::new()),
            ])
            .await;
        assert!(report.success);
        assert!(report.failed_channels().is_empty());
    }

    #[test]
    fn test_every_factory_is_in_catalog() {
        for (name, _) in CHANNEL_FACTORIES {
            assert!(omninotify_core::catalog::is_known_channel(name));
        }
    }
}
