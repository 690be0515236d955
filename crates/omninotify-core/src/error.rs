//! Error taxonomy shared by configuration, dispatch and provider adapters.
//!
//! Setup-time errors (`Configuration`) propagate to the caller. Per-call
//! errors are turned into a `DeliveryResult::Failure` at the channel
//! boundary, so callers of `Channel::deliver` never see them as `Err`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used across the workspace.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Maximum number of error-source entries kept for diagnostics.
pub const MAX_ERROR_CHAIN: usize = 5;

/// Everything that can go wrong between `Notifier::notify` and the provider API.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Missing or invalid credentials, unknown provider/channel at setup time.
    #[error("{0}")]
    Configuration(String),

    /// The channel is known but was not built into the registry.
    #[error("Channel '{0}' is not enabled")]
    ChannelNotEnabled(String),

    /// The channel name is not in the registry at all.
    #[error("Channel '{0}' is not supported")]
    ChannelNotSupported(String),

    /// A required per-call field is missing or blank.
    #[error("{0}")]
    Validation(String),

    /// The external API rejected the request.
    #[error("{provider} API error ({status}): {message}")]
    Delivery {
        provider: String,
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Unexpected failure talking to the provider (transport, decoding).
    #[error("{message}")]
    Provider { message: String, chain: Vec<String> },
}

impl NotifyError {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        NotifyError::Configuration(msg.into())
    }

    /// Shorthand for a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        NotifyError::Validation(msg.into())
    }

    /// Wrap an arbitrary error, keeping a truncated source chain.
    pub fn provider(err: &(dyn std::error::Error + 'static)) -> Self {
        NotifyError::Provider {
            message: err.to_string(),
            chain: error_chain(err),
        }
    }

    /// The taxonomy tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotifyError::Configuration(_) => ErrorKind::Configuration,
            NotifyError::ChannelNotEnabled(_) => ErrorKind::ChannelNotEnabled,
            NotifyError::ChannelNotSupported(_) => ErrorKind::ChannelNotSupported,
            NotifyError::Validation(_) => ErrorKind::Validation,
            NotifyError::Delivery { .. } => ErrorKind::Delivery,
            NotifyError::Provider { .. } => ErrorKind::Provider,
        }
    }

    /// Provider-specific error code, when the API supplied one.
    pub fn code(&self) -> Option<String> {
        match self {
            NotifyError::Delivery { code, .. } => code.clone(),
            _ => None,
        }
    }

    /// Diagnostic detail lines (source chain for unexpected errors).
    pub fn details(&self) -> Vec<String> {
        match self {
            NotifyError::Provider { chain, .. } => chain.clone(),
            _ => Vec::new(),
        }
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        NotifyError::provider(&err)
    }
}

/// Serializable tag identifying which kind of error produced a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    ChannelNotEnabled,
    ChannelNotSupported,
    Validation,
    Delivery,
    Provider,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::ChannelNotEnabled => "channel_not_enabled",
            ErrorKind::ChannelNotSupported => "channel_not_supported",
            ErrorKind::Validation => "validation",
            ErrorKind::Delivery => "delivery",
            ErrorKind::Provider => "provider",
        };
        f.write_str(s)
    }
}

/// Collect an error and its sources, at most `MAX_ERROR_CHAIN` entries.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if chain.len() >= MAX_ERROR_CHAIN {
            break;
        }
        chain.push(e.to_string());
        current = e.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("level {0}")]
    struct Nested(usize, #[source] Option<Box<Nested>>);

    fn nested(depth: usize) -> Nested {
        let mut err = Nested(0, None);
        for i in 1..depth {
            err = Nested(i, Some(Box::new(err)));
        }
        err
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(NotifyError::config("x").kind(), ErrorKind::Configuration);
        assert_eq!(NotifyError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(
            NotifyError::ChannelNotEnabled("sms".into()).kind(),
            ErrorKind::ChannelNotEnabled
        );
    }

    #[test]
    fn test_delivery_display_and_code() {
        let err = NotifyError::Delivery {
            provider: "SendGrid".into(),
            status: 400,
            code: Some("131026".into()),
            message: "bad request".into(),
        };
        assert_eq!(err.to_string(), "SendGrid API error (400): bad request");
        assert_eq!(err.code().as_deref(), Some("131026"));
    }

    #[test]
    fn test_error_chain_truncated() {
        let err = nested(8);
        let chain = error_chain(&err);
        assert_eq!(chain.len(), MAX_ERROR_CHAIN);
        assert_eq!(chain[0], "level 7");
        assert_eq!(chain[4], "level 3");
    }

    #[test]
    fn test_provider_error_keeps_chain() {
        let err = NotifyError::provider(&nested(2));
        assert_eq!(err.to_string(), "level 1");
        assert_eq!(err.details(), vec!["level 1", "level 0"]);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ChannelNotSupported).unwrap();
        assert_eq!(json, "\"channel_not_supported\"");
        assert_eq!(ErrorKind::Delivery.to_string(), "delivery");
    }
}
