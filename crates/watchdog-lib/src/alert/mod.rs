//! Alert delivery for detected drift
//!
//! This module provides:
//! - Rendering of drift reports into webhook messages
//! - A notifier seam with an HTTP webhook implementation
//! - A dispatcher that turns every delivery outcome into a result value

mod dispatcher;
mod notifier;


use thiserror::Error;

pub use dispatcher::{AlertDispatcher, DispatchResult, NotificationTarget};
pub use notifier::{AlertPayload, Notifier, WebhookNotifier, ALERT_MARKER, DEFAULT_TIMEOUT};

/// Errors raised while delivering an alert
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("failed to serialize drift report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("webhook request failed: {0}")]
    Transport(String),

    #[error("webhook returned status {status}: {body}")]
    Status { status: u16, body: String },
}
