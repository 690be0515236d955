//! Omninotify channels: logical channels, the dispatcher and the facade.
//!
//! This crate provides:
//! - **base**: the `Channel` trait every channel implements
//! - **whatsapp** / **email**: channel implementations over provider adapters
//! - **manager**: `ChannelManager`: registry build, dispatch and broadcast
//! - **notifier**: `Notifier`: explicit context object with `configure`/`notify`/`reset`
//! - **formatting**: literal `{{placeholder}}` substitution

pub mod base;
pub mod email;
pub mod formatting;
pub mod manager;
pub mod notifier;
pub mod whatsapp;

pub use base::Channel;
pub use email::EmailChannel;
pub use manager::{BroadcastReport, ChannelManager, ChannelOutcome};
pub use notifier::Notifier;
pub use whatsapp::WhatsAppChannel;
