//! Email attachments: file read, base64 encoding and MIME detection.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tracing::debug;

use omninotify_core::{NotifyError, NotifyResult};

/// Fallback MIME type for unknown extensions.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// An attachment in SendGrid's wire shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attachment {
    /// Base64-encoded file content.
    pub content: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub filename: String,
    pub disposition: String,
}

/// Infer a MIME type from the file extension (case-insensitive).
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("zip") => "application/zip",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Read and encode one attachment.
///
/// An unreadable file is a configuration problem on the caller's side,
/// reported as `NotifyError::Configuration`.
pub async fn load_attachment(path: &Path) -> NotifyResult<Attachment> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        NotifyError::config(format!("Error adding attachment {}: {}", path.display(), e))
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(file = %filename, bytes = bytes.len(), "attachment loaded");

    Ok(Attachment {
        content: STANDARD.encode(&bytes),
        mime_type: detect_mime_type(path).to_string(),
        filename,
        disposition: "attachment".to_string(),
    })
}
