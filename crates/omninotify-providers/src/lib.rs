//! Provider adapter layer for Omninotify.
//!
//! Each adapter wraps exactly one external API and translates a generic
//! send request into that API's call shape.
//!
//! # Architecture
//!
//! - [`traits::MessagingProvider`] / [`traits::EmailProvider`]: adapter traits
//! - [`meta_api::MetaApiProvider`]: WhatsApp Cloud API (Graph API) client
//! - [`sendgrid::SendGridProvider`]: SendGrid v3 mail client
//! - [`registry`]: provider name → factory tables
//! - [`phone`] / [`attachment`]: recipient normalization and attachment encoding

pub mod attachment;
pub mod meta_api;
pub mod phone;
pub mod registry;
pub mod sendgrid;
pub mod traits;

mod http;

// Re-export main types for convenience
pub use meta_api::MetaApiProvider;
pub use registry::{create_email_provider, create_messaging_provider};
pub use sendgrid::SendGridProvider;
pub use traits::{EmailMessage, EmailProvider, MessagingProvider, TemplateComponent, TemplateMessage};
