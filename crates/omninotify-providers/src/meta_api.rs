//! WhatsApp Cloud API adapter (Meta Graph API).
//!
//! `POST {api_base}/{api_version}/{phone_number_id}/messages` with a bearer
//! token. Successful responses carry `messages[0].id`; errors carry
//! `{"error": {"message", "type", "code", ...}}`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use omninotify_core::config::WhatsAppConfig;
use omninotify_core::{NotifyError, NotifyResult, ProviderReceipt};

use crate::http::{build_client, join_url, parse_body};
use crate::phone::normalize_phone;
use crate::traits::{MessagingProvider, TemplateMessage};

/// Default Graph API base URL.
pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com";

const DISPLAY_NAME: &str = "WhatsApp";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: Option<String>,
    code: Option<Value>,
}

// ─────────────────────────────────────────────
// MetaApiProvider
// ─────────────────────────────────────────────

/// WhatsApp Cloud API client.
pub struct MetaApiProvider {
    client: reqwest::Client,
    api_base: String,
    api_version: String,
    phone_number_id: String,
    access_token: String,
}

impl std::fmt::Debug for MetaApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaApiProvider")
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("phone_number_id", &self.phone_number_id)
            .finish()
    }
}

impl MetaApiProvider {
    /// Create the adapter from WhatsApp config.
    ///
    /// Fails with `NotifyError::Configuration` when the access token or the
    /// phone number id is missing.
    pub fn new(config: &WhatsAppConfig) -> NotifyResult<Self> {
        if config.access_token.trim().is_empty() {
            return Err(NotifyError::config("WhatsApp access token is required"));
        }
        if config.phone_number_id.trim().is_empty() {
            return Err(NotifyError::config("WhatsApp phone number id is required"));
        }

        let api_base = if config.api_base.is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            config.api_base.clone()
        };

        Ok(Self {
            client: build_client()?,
            api_base,
            api_version: config.api_version.clone(),
            phone_number_id: config.phone_number_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Full messages endpoint URL.
    fn messages_url(&self) -> String {
        join_url(
            &self.api_base,
            &format!("{}/{}/messages", self.api_version, self.phone_number_id),
        )
    }

    async fn post_message(&self, body: Value) -> NotifyResult<ProviderReceipt> {
        let url = self.messages_url();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = DISPLAY_NAME, error = %e, "HTTP request failed");
                NotifyError::provider(&e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| NotifyError::provider(&e))?;

        if !status.is_success() {
            let err = api_error(status.as_u16(), &text);
            error!(
                provider = DISPLAY_NAME,
                status = %status,
                error = %err,
                "message rejected"
            );
            return Err(err);
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)?;
        let message_id = parsed.messages.into_iter().next().map(|m| m.id);

        info!(provider = DISPLAY_NAME, message_id = ?message_id, "message accepted");

        Ok(ProviderReceipt {
            message_id,
            status_code: status.as_u16(),
            raw: parse_body(&text),
        })
    }
}

/// Map a non-2xx Graph API response to `NotifyError::Delivery`.
fn api_error(status: u16, body: &str) -> NotifyError {
    let (message, code) = match serde_json::from_str::<GraphErrorEnvelope>(body) {
        Ok(env) => (
            env.error.message.unwrap_or_else(|| "Unknown error".to_string()),
            env.error.code.map(|c| match c {
                Value::String(s) => s,
                other => other.to_string(),
            }),
        ),
        Err(_) if body.trim().is_empty() => ("Unknown error".to_string(), None),
        Err(_) => (body.to_string(), None),
    };

    NotifyError::Delivery {
        provider: DISPLAY_NAME.to_string(),
        status,
        code,
        message,
    }
}

#[async_trait]
impl MessagingProvider for MetaApiProvider {
    fn name(&self) -> &str {
        "meta_api"
    }

    async fn send_text(&self, recipient: &str, message: &str) -> NotifyResult<ProviderReceipt> {
        let to = normalize_phone(recipient);
        debug!(to = %to, chars = message.chars().count(), "sending WhatsApp text");

        self.post_message(json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": { "body": message },
        }))
        .await
    }

    async fn send_template(
        &self,
        recipient: &str,
        template: &TemplateMessage,
    ) -> NotifyResult<ProviderReceipt> {
        let to = normalize_phone(recipient);
        debug!(
            to = %to,
            template = %template.name,
            language = %template.language,
            components = template.components.len(),
            "sending WhatsApp template"
        );

        let components: Vec<Value> = template
            .components
            .iter()
            .map(|c| c.to_api_json())
            .collect();

        self.post_message(json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "template",
            "template": {
                "name": template.name,
                "language": { "code": template.language },
                "components": components,
            },
        }))
        .await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
