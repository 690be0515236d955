//! Provider traits: the capability interfaces every adapter implements.
//!
//! Adapters return `NotifyResult<ProviderReceipt>`: the API's structured
//! rejections become `NotifyError::Delivery`, transport and decoding
//! problems become `NotifyError::Provider`. Channels turn either into a
//! `DeliveryResult::Failure`.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{json, Value};

use omninotify_core::{NotifyResult, ProviderReceipt};

// ─────────────────────────────────────────────
// Messaging
// ─────────────────────────────────────────────

/// One component of a template message.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateComponent {
    /// Header parameters are passed to the API as given.
    Header { parameters: Vec<Value> },
    /// Body parameters are plain strings, each sent as a text parameter.
    Body { parameters: Vec<String> },
    /// Button component (`sub_type` e.g. `"url"`, `"quick_reply"`).
    Button {
        sub_type: String,
        index: String,
        parameters: Vec<Value>,
    },
    /// Anything else is forwarded untouched.
    Raw(Value),
}

impl TemplateComponent {
    /// Parse a component from its loose JSON form
    /// (`{"type": "body", "parameters": ["Ada"]}`).
    pub fn from_value(value: &Value) -> Self {
        let parameters = || -> Vec<Value> {
            value
                .get("parameters")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };

        match value.get("type").and_then(Value::as_str) {
            Some("header") => TemplateComponent::Header {
                parameters: parameters(),
            },
            Some("body") => TemplateComponent::Body {
                parameters: parameters().iter().map(scalar_to_string).collect(),
            },
            Some("button") => TemplateComponent::Button {
                sub_type: value
                    .get("sub_type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                index: value.get("index").map(scalar_to_string).unwrap_or_default(),
                parameters: parameters(),
            },
            _ => TemplateComponent::Raw(value.clone()),
        }
    }

    /// Render in the shape the Cloud API expects.
    pub fn to_api_json(&self) -> Value {
        match self {
            TemplateComponent::Header { parameters } => json!({
                "type": "header",
                "parameters": parameters,
            }),
            TemplateComponent::Body { parameters } => json!({
                "type": "body",
                "parameters": parameters
                    .iter()
                    .map(|text| json!({"type": "text", "text": text}))
                    .collect::<Vec<_>>(),
            }),
            TemplateComponent::Button {
                sub_type,
                index,
                parameters,
            } => json!({
                "type": "button",
                "sub_type": sub_type,
                "index": index,
                "parameters": parameters,
            }),
            TemplateComponent::Raw(value) => value.clone(),
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A pre-approved template send.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateMessage {
    pub name: String,
    /// Language code, e.g. `"en"` or `"pt_BR"`.
    pub language: String,
    pub components: Vec<TemplateComponent>,
}

/// Messaging adapters (WhatsApp and similar APIs).
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Provider name as used in config (e.g. `"meta_api"`).
    fn name(&self) -> &str;

    /// Send a free-form text message.
    async fn send_text(&self, recipient: &str, message: &str) -> NotifyResult<ProviderReceipt>;

    /// Send a template message.
    async fn send_template(
        &self,
        recipient: &str,
        template: &TemplateMessage,
    ) -> NotifyResult<ProviderReceipt>;
}

// ─────────────────────────────────────────────
// Email
// ─────────────────────────────────────────────

/// Email ready for sending. `from` is already resolved by the channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    /// HTML body.
    pub body: String,
    pub from: String,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    /// Files to attach, read at send time.
    pub attachments: Vec<PathBuf>,
}

/// Email adapters.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Provider name as used in config (e.g. `"sendgrid"`).
    fn name(&self) -> &str;

    /// Send one email.
    async fn send_email(&self, email: &EmailMessage) -> NotifyResult<ProviderReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_component_from_value() {
        let c = TemplateComponent::from_value(&json!({"type": "body", "parameters": ["Ada", 42]}));
        assert_eq!(
            c,
            TemplateComponent::Body {
                parameters: vec!["Ada".into(), "42".into()]
            }
        );
    }

    #[test]
    fn test_body_component_api_json() {
        let c = TemplateComponent::Body {
            parameters: vec!["Ada".into()],
        };
        assert_eq!(
            c.to_api_json(),
            json!({"type": "body", "parameters": [{"type": "text", "text": "Ada"}]})
        );
    }

    #[test]
    fn test_button_component_round() {
        let input = json!({
            "type": "button",
            "sub_type": "url",
            "index": 0,
            "parameters": [{"type": "text", "text": "abc"}]
        });
        let c = TemplateComponent::from_value(&input);
        let out = c.to_api_json();
        assert_eq!(out["sub_type"], json!("url"));
        assert_eq!(out["index"], json!("0"));
        assert_eq!(out["parameters"][0]["text"], json!("abc"));
    }

    #[test]
    fn test_header_without_parameters() {
        let c = TemplateComponent::from_value(&json!({"type": "header"}));
        assert_eq!(c.to_api_json(), json!({"type": "header", "parameters": []}));
    }

    #[test]
    fn test_unknown_component_passes_through() {
        let raw = json!({"type": "carousel", "cards": []});
        assert_eq!(TemplateComponent::from_value(&raw).to_api_json(), raw);
    }
}
