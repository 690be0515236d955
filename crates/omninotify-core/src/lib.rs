//! Omninotify core: shared types for every other crate in the workspace.
//!
//! - **error**: `NotifyError` taxonomy and the `ErrorKind` tag
//! - **types**: `DeliveryResult`, `NotificationParams`, `ProviderReceipt`
//! - **catalog**: static channel/provider requirement tables
//! - **config**: `Config` schema, validation, loading and env overrides

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{ErrorKind, NotifyError, NotifyResult};
pub use types::{DeliveryFailure, DeliveryResult, DeliverySuccess, NotificationParams, ProviderReceipt};
