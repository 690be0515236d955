//! Email channel over an email adapter.
//!
//! Params: `to` (string or list), `subject`, `body` (HTML), optional `from`,
//! `cc`, `bcc`, `attachments` (file paths) and `variables` (substituted into
//! subject and body).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use omninotify_core::{Config, DeliveryResult, NotificationParams, NotifyError, NotifyResult};
use omninotify_providers::{create_email_provider, EmailMessage, EmailProvider};

use crate::base::Channel;
use crate::formatting::{render, vars_from_json};

/// Channel name used in `enabled_channels` and dispatch.
pub const CHANNEL_NAME: &str = "email";

/// Fields every email needs.
pub const REQUIRED_FIELDS: &[&str] = &["to", "subject", "body"];

pub struct EmailChannel {
    provider: Arc<dyn EmailProvider>,
    /// Sender used when the call does not pass `from`.
    default_from: String,
}

impl EmailChannel {
    /// Build the channel with the adapter selected by `email_provider`.
    pub fn new(config: &Config) -> NotifyResult<Self> {
        Ok(Self::with_provider(
            create_email_provider(config)?,
            config.email.from.clone(),
        ))
    }

    pub fn with_provider(provider: Arc<dyn EmailProvider>, default_from: impl Into<String>) -> Self {
        Self {
            provider,
            default_from: default_from.into(),
        }
    }

    fn build_message(&self, params: &NotificationParams) -> NotifyResult<EmailMessage> {
        let mut to = params.string_list("to");
        to.retain(|addr| !addr.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| match *field {
                "to" => to.is_empty(),
                other => params.is_blank(other),
            })
            .collect();
        if !missing.is_empty() {
            return Err(NotifyError::validation(format!(
                "Missing required email fields: {}",
                missing.join(", ")
            )));
        }

        let from = params
            .text("from")
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| self.default_from.clone());
        if from.trim().is_empty() {
            return Err(NotifyError::validation(
                "Sender address is required (pass `from` or set email_from)",
            ));
        }

        let mut subject = params.text("subject").unwrap_or_default();
        let mut body = params.text("body").unwrap_or_default();
        if let Some(vars) = params.get("variables") {
            let vars = vars_from_json(vars);
            subject = render(&subject, vars.iter().map(|(k, v)| (k, v)));
            body = render(&body, vars.iter().map(|(k, v)| (k, v)));
        }

        Ok(EmailMessage {
            to,
            subject,
            body,
            from,
            cc: params.string_list("cc"),
            bcc: params.string_list("bcc"),
            attachments: params
                .string_list("attachments")
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        })
    }

    fn failure_context(params: &NotificationParams) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        context.insert("to".to_string(), params.string_list("to").join(", "));
        context.insert(
            "subject".to_string(),
            params.text("subject").unwrap_or_default(),
        );
        context
    }
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn deliver(&self, params: &NotificationParams) -> DeliveryResult {
        let sent = match self.build_message(params) {
            Ok(email) => {
                debug!(
                    to = ?email.to,
                    subject = %email.subject,
                    attachments = email.attachments.len(),
                    "delivering email"
                );
                self.provider.send_email(&email).await
            }
            Err(e) => Err(e),
        };

        match sent {
            Ok(receipt) => {
                let status_code = receipt.status_code;
                DeliveryResult::success(CHANNEL_NAME, self.provider.name(), receipt)
                    .with_data(json!({ "statusCode": status_code }))
            }
            Err(e) => {
                warn!(
                    channel = CHANNEL_NAME,
                    provider = self.provider.name(),
                    kind = %e.kind(),
                    error = %e,
                    "email delivery failed"
                );
                DeliveryResult::failure(CHANNEL_NAME, Some(self.provider.name().to_string()), &e)
                    .with_context(Self::failure_context(params))
            }
        }
    }
}
