//! SendGrid email provider implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use omninotify_core::config::EmailConfig;
use omninotify_core::{NotifyError, NotifyResult, ProviderReceipt};

use crate::attachment::{load_attachment, Attachment};
use crate::http::{build_client, join_url, parse_body};
use crate::traits::{EmailMessage, EmailProvider};

/// Default SendGrid API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.sendgrid.com";

const DISPLAY_NAME: &str = "SendGrid";

// SendGrid API request/response structures

#[derive(Debug, Serialize)]
struct SendGridRequest {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cc: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bcc: Vec<EmailAddress>,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct SendGridError {
    errors: Vec<SendGridErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct SendGridErrorDetail {
    message: String,
}

fn addresses(list: &[String]) -> Vec<EmailAddress> {
    list.iter()
        .map(|addr| EmailAddress {
            email: addr.clone(),
        })
        .collect()
}

/// SendGrid email provider.
pub struct SendGridProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl std::fmt::Debug for SendGridProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl SendGridProvider {
    /// Create a new SendGrid provider.
    pub fn new(config: &EmailConfig) -> NotifyResult<Self> {
        let sg = &config.sendgrid;
        if sg.api_key.trim().is_empty() {
            return Err(NotifyError::config("SendGrid API key is required"));
        }

        let api_base = if sg.api_base.is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            sg.api_base.clone()
        };

        Ok(Self {
            client: build_client()?,
            api_key: sg.api_key.clone(),
            api_base,
        })
    }

    async fn build_request(&self, email: &EmailMessage) -> NotifyResult<SendGridRequest> {
        let mut attachments = Vec::with_capacity(email.attachments.len());
        for path in &email.attachments {
            attachments.push(load_attachment(path).await?);
        }

        Ok(SendGridRequest {
            personalizations: vec![Personalization {
                to: addresses(&email.to),
                cc: addresses(&email.cc),
                bcc: addresses(&email.bcc),
            }],
            from: EmailAddress {
                email: email.from.clone(),
            },
            subject: email.subject.clone(),
            content: vec![Content {
                content_type: "text/html".to_string(),
                value: email.body.clone(),
            }],
            attachments,
        })
    }
}

/// Join SendGrid's `errors[].message`, or fall back to the raw body.
fn parse_error_response(body: &str) -> String {
    if body.trim().is_empty() {
        return "Unknown error".to_string();
    }
    match serde_json::from_str::<SendGridError>(body) {
        Ok(sg_error) if !sg_error.errors.is_empty() => sg_error
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join(", "),
        _ => body.to_string(),
    }
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    fn name(&self) -> &str {
        "sendgrid"
    }

    async fn send_email(&self, email: &EmailMessage) -> NotifyResult<ProviderReceipt> {
        let request = self.build_request(email).await?;

        debug!(
            to = ?email.to,
            subject = %email.subject,
            cc_count = email.cc.len(),
            bcc_count = email.bcc.len(),
            attachments = request.attachments.len(),
            "Sending email via SendGrid"
        );

        let response = self
            .client
            .post(join_url(&self.api_base, "v3/mail/send"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = DISPLAY_NAME, error = %e, "HTTP request failed");
                NotifyError::provider(&e)
            })?;

        let status = response.status();
        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await.map_err(|e| NotifyError::provider(&e))?;

        if !status.is_success() {
            let message = parse_error_response(&body);
            error!(
                to = ?email.to,
                status = %status,
                error = %message,
                "Failed to send email via SendGrid"
            );
            return Err(NotifyError::Delivery {
                provider: DISPLAY_NAME.to_string(),
                status: status.as_u16(),
                code: None,
                message,
            });
        }

        info!(
            to = ?email.to,
            message_id = ?message_id,
            "Email sent successfully via SendGrid"
        );

        Ok(ProviderReceipt {
            message_id,
            status_code: status.as_u16(),
            raw: parse_body(&body),
        })
    }
}
