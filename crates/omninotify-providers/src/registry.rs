//! Provider registry: provider name → adapter factory.
//!
//! The requirement metadata lives in `omninotify_core::catalog`; this module
//! holds the constructors. Adding a provider means one catalog entry plus
//! one row here.

use std::sync::Arc;

use tracing::debug;

use omninotify_core::catalog;
use omninotify_core::{Config, NotifyError, NotifyResult};

use crate::meta_api::MetaApiProvider;
use crate::sendgrid::SendGridProvider;
use crate::traits::{EmailProvider, MessagingProvider};

/// Constructor for a messaging adapter.
pub type MessagingFactory = fn(&Config) -> NotifyResult<Arc<dyn MessagingProvider>>;

/// Constructor for an email adapter.
pub type EmailFactory = fn(&Config) -> NotifyResult<Arc<dyn EmailProvider>>;

/// Messaging adapters by provider name.
pub static MESSAGING_PROVIDERS: &[(&str, MessagingFactory)] = &[("meta_api", build_meta_api)];

/// Email adapters by provider name.
pub static EMAIL_PROVIDERS: &[(&str, EmailFactory)] = &[("sendgrid", build_sendgrid)];

fn build_meta_api(config: &Config) -> NotifyResult<Arc<dyn MessagingProvider>> {
    Ok(Arc::new(MetaApiProvider::new(&config.whatsapp)?))
}

fn build_sendgrid(config: &Config) -> NotifyResult<Arc<dyn EmailProvider>> {
    Ok(Arc::new(SendGridProvider::new(&config.email)?))
}

fn lookup<F: Copy>(table: &[(&str, F)], name: &str) -> Option<F> {
    table.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

fn unknown_provider(channel: &str, name: &str) -> NotifyError {
    let spec = catalog::find_channel(channel);
    let label = spec.map_or(channel, |s| s.display_name);
    NotifyError::config(format!("Unknown {label} provider: {name}"))
}

/// Build the messaging adapter selected by `whatsapp_provider`.
pub fn create_messaging_provider(config: &Config) -> NotifyResult<Arc<dyn MessagingProvider>> {
    let name = config.selected_provider("whatsapp").unwrap_or_default();
    let factory =
        lookup(MESSAGING_PROVIDERS, &name).ok_or_else(|| unknown_provider("whatsapp", &name))?;

    debug!(provider = %name, "creating messaging provider");
    factory(config)
}

/// Build the email adapter selected by `email_provider`.
pub fn create_email_provider(config: &Config) -> NotifyResult<Arc<dyn EmailProvider>> {
    let name = config.selected_provider("email").unwrap_or_default();
    let factory = lookup(EMAIL_PROVIDERS, &name).ok_or_else(|| unknown_provider("email", &name))?;

    debug!(provider = %name, "creating email provider");
    factory(config)
}
