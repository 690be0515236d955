//! Channel trait: the capability interface every logical channel implements.
//!
//! Each channel (WhatsApp, email, …) owns one provider adapter, validates
//! its own required fields, and normalizes the adapter outcome.

use async_trait::async_trait;
use omninotify_core::{DeliveryResult, NotificationParams};

/// Every notification channel implements this trait.
///
/// The `ChannelManager` holds `Arc<dyn Channel>` keyed by `name()`.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Unique channel name (e.g. "email", "whatsapp").
    ///
    /// Must match the key used in `enabled_channels` and in dispatch.
    fn name(&self) -> &str;

    /// Name of the provider adapter behind this channel (e.g. "sendgrid").
    fn provider_name(&self) -> &str;

    /// Deliver one notification.
    ///
    /// Never returns an error: validation problems and adapter errors are
    /// reported as `DeliveryResult::Failure`.
    async fn deliver(&self, params: &NotificationParams) -> DeliveryResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use omninotify_core::{NotifyError, ProviderReceipt};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// A mock channel for testing.
    struct MockChannel {
        delivered: Arc<Mutex<Vec<NotificationParams>>>,
    }

    #[async_trait]
    impl Channel for MockChannel {
        fn name(&self) -> &str {
            "mock"
        }

        fn provider_name(&self) -> &str {
            "mock_provider"
        }

        async fn deliver(&self, params: &NotificationParams) -> DeliveryResult {
            self.delivered.lock().await.push(params.clone());
            if params.is_blank("to") {
                return DeliveryResult::failure(
                    self.name(),
                    Some(self.provider_name().to_string()),
                    &NotifyError::validation("To cannot be blank"),
                );
            }
            DeliveryResult::success(self.name(), self.provider_name(), ProviderReceipt::default())
        }
    }

    #[tokio::test]
    async fn test_mock_channel_deliver() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let ch = MockChannel {
            delivered: delivered.clone(),
        };

        let ok = ch.deliver(&NotificationParams::new().with("to", "x")).await;
        let bad = ch.deliver(&NotificationParams::new()).await;

        assert!(ok.is_success());
        assert!(!bad.is_success());
        assert_eq!(delivered.lock().await.len(), 2);
    }

    #[test]
    fn test_channel_is_object_safe() {
        let ch: Box<dyn Channel> = Box::new(MockChannel {
            delivered: Arc::new(Mutex::new(Vec::new())),
        });
        assert_eq!(ch.name(), "mock");
        assert_eq!(ch.provider_name(), "mock_provider");
    }
}
