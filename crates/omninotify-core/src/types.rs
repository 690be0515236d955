//! Core value types: notification params in, delivery results out.

use std::collections::BTreeMap;

use serde::ser::{Error as _, Serialize, Serializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ErrorKind, NotifyError};

// ─────────────────────────────────────────────
// Notification params
// ─────────────────────────────────────────────

/// Per-call payload handed to a channel.
///
/// There is no shared base shape: each channel reads and validates its
/// own subset of keys (`to`/`subject`/`body` for email,
/// `recipient`/`message` for messaging, …).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationParams(Map<String, Value>);

impl NotificationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar value rendered as a string. `null`, arrays and objects yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// True when the key is missing or its text is empty after trimming.
    pub fn is_blank(&self, key: &str) -> bool {
        self.text(key).map_or(true, |s| s.trim().is_empty())
    }

    /// A string or a list of strings, flattened into a list.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for NotificationParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for NotificationParams {
    type Error = NotifyError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NotifyError::validation(format!(
                "Notification params must be a JSON object, got: {other}"
            ))),
        }
    }
}

// ─────────────────────────────────────────────
// Provider receipt
// ─────────────────────────────────────────────

/// What an adapter hands back when the provider accepted the request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderReceipt {
    /// Provider-assigned message id, when the API returns one.
    pub message_id: Option<String>,
    /// HTTP status of the provider response.
    pub status_code: u16,
    /// Raw decoded response body (`null` when the body was empty).
    pub raw: Value,
}

// ─────────────────────────────────────────────
// Delivery result
// ─────────────────────────────────────────────

/// Normalized outcome of one delivery attempt.
///
/// Serializes as a flat JSON object with a boolean `success` key.
#[derive(Clone, Debug, PartialEq)]
pub enum DeliveryResult {
    Success(DeliverySuccess),
    Failure(DeliveryFailure),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySuccess {
    pub message_id: Option<String>,
    pub channel: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFailure {
    pub error: String,
    pub error_kind: ErrorKind,
    pub error_code: Option<String>,
    pub channel: String,
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl DeliveryResult {
    /// Build a success from an adapter receipt.
    pub fn success(
        channel: impl Into<String>,
        provider: impl Into<String>,
        receipt: ProviderReceipt,
    ) -> Self {
        DeliveryResult::Success(DeliverySuccess {
            message_id: receipt.message_id,
            channel: channel.into(),
            provider: provider.into(),
            data: Value::Null,
        })
    }

    /// Build a failure from an error.
    pub fn failure(channel: impl Into<String>, provider: Option<String>, err: &NotifyError) -> Self {
        DeliveryResult::Failure(DeliveryFailure {
            error: err.to_string(),
            error_kind: err.kind(),
            error_code: err.code(),
            channel: channel.into(),
            provider,
            context: BTreeMap::new(),
            details: err.details(),
        })
    }

    /// Attach call context to a failure. No-op on success.
    pub fn with_context(mut self, context: BTreeMap<String, String>) -> Self {
        if let DeliveryResult::Failure(ref mut f) = self {
            f.context.extend(context);
        }
        self
    }

    /// Attach provider data to a success. No-op on failure.
    pub fn with_data(mut self, data: Value) -> Self {
        if let DeliveryResult::Success(ref mut s) = self {
            s.data = data;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryResult::Success(_))
    }

    pub fn channel(&self) -> &str {
        match self {
            DeliveryResult::Success(s) => &s.channel,
            DeliveryResult::Failure(f) => &f.channel,
        }
    }

    pub fn message_id(&self) -> Option<&str> {
        match self {
            DeliveryResult::Success(s) => s.message_id.as_deref(),
            DeliveryResult::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&DeliveryFailure> {
        match self {
            DeliveryResult::Failure(f) => Some(f),
            DeliveryResult::Success(_) => None,
        }
    }

    /// JSON view with the `success` flag folded in.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let (success, body) = match self {
            DeliveryResult::Success(s) => (true, serde_json::to_value(s)?),
            DeliveryResult::Failure(f) => (false, serde_json::to_value(f)?),
        };
        let mut out = Map::new();
        out.insert("success".into(), Value::Bool(success));
        if let Value::Object(fields) = body {
            out.extend(fields);
        }
        Ok(Value::Object(out))
    }
}

impl Serialize for DeliveryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().map_err(S::Error::custom)?.serialize(serializer)
    }
}
