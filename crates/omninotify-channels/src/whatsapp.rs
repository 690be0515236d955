//! WhatsApp channel: text and template messages over a messaging adapter.
//!
//! Params:
//! - `recipient`: phone number (normalized by the adapter)
//! - `message`: text body, required unless `type` is `"template"`
//! - `type`: `"text"` (default) or `"template"`
//! - `template_name`, `language` (default `"en"`), `components`
//! - `variables`: optional object substituted into `message`

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use omninotify_core::utils::capitalize;
use omninotify_core::{Config, DeliveryResult, NotificationParams, NotifyError, NotifyResult};
use omninotify_providers::{create_messaging_provider, MessagingProvider, TemplateComponent, TemplateMessage};

use crate::base::Channel;
use crate::formatting::{render, vars_from_json};

/// Channel name used in `enabled_channels` and dispatch.
pub const CHANNEL_NAME: &str = "whatsapp";

/// Template language when the caller does not give one.
pub const TEMPLATE_DEFAULT_LANGUAGE: &str = "en";

/// What a single call asks for, after validation.
#[derive(Debug, PartialEq)]
enum Outgoing {
    Text { recipient: String, message: String },
    Template { recipient: String, template: TemplateMessage },
}

pub struct WhatsAppChannel {
    provider: Arc<dyn MessagingProvider>,
}

impl WhatsAppChannel {
    /// Build the channel with the adapter selected by `whatsapp_provider`.
    pub fn new(config: &Config) -> NotifyResult<Self> {
        Ok(Self::with_provider(create_messaging_provider(config)?))
    }

    pub fn with_provider(provider: Arc<dyn MessagingProvider>) -> Self {
        Self { provider }
    }

    fn parse(params: &NotificationParams) -> NotifyResult<Outgoing> {
        let is_template = params.text("type").as_deref() == Some("template");
        let required: &[&str] = if is_template {
            &["recipient", "template_name"]
        } else {
            &["recipient", "message"]
        };
        for field in required {
            if params.is_blank(field) {
                return Err(NotifyError::validation(format!(
                    "{} cannot be blank",
                    capitalize(field)
                )));
            }
        }

        let recipient = params.text("recipient").unwrap_or_default().trim().to_string();

        if is_template {
            let language = params
                .text("language")
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| TEMPLATE_DEFAULT_LANGUAGE.to_string());
            let components = match params.get("components") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items.iter().map(TemplateComponent::from_value).collect(),
                Some(_) => return Err(NotifyError::validation("Components must be a list")),
            };

            return Ok(Outgoing::Template {
                recipient,
                template: TemplateMessage {
                    name: params.text("template_name").unwrap_or_default(),
                    language,
                    components,
                },
            });
        }

        let mut message = params.text("message").unwrap_or_default();
        if let Some(vars) = params.get("variables") {
            message = render(&message, vars_from_json(vars));
        }
        Ok(Outgoing::Text { recipient, message })
    }

    fn failure_context(params: &NotificationParams) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        context.insert(
            "recipient".to_string(),
            params.text("recipient").unwrap_or_default(),
        );
        context.insert(
            "message_type".to_string(),
            params.text("type").unwrap_or_else(|| "text".to_string()),
        );
        if let Some(name) = params.text("template_name") {
            context.insert("template_name".to_string(), name);
        }
        context
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn deliver(&self, params: &NotificationParams) -> DeliveryResult {
        let sent = match Self::parse(params) {
            Ok(Outgoing::Text { recipient, message }) => {
                debug!(recipient = %recipient, "delivering WhatsApp text");
                self.provider.send_text(&recipient, &message).await
            }
            Ok(Outgoing::Template { recipient, template }) => {
                debug!(recipient = %recipient, template = %template.name, "delivering WhatsApp template");
                self.provider.send_template(&recipient, &template).await
            }
            Err(e) => Err(e),
        };

        match sent {
            Ok(receipt) => DeliveryResult::success(CHANNEL_NAME, self.provider.name(), receipt),
            Err(e) => {
                warn!(
                    channel = CHANNEL_NAME,
                    provider = self.provider.name(),
                    kind = %e.kind(),
                    error = %e,
                    "WhatsApp delivery failed"
                );
                DeliveryResult::failure(CHANNEL_NAME, Some(self.provider.name().to_string()), &e)
                    .with_context(Self::failure_context(params))
            }
        }
    }
}
