//! Notification transports
//!
//! A [`Notifier`] delivers one [`AlertPayload`] to one endpoint. The webhook
//! implementation performs a single blocking HTTP POST; there is no retry.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::AlertError;
use crate::drift::DriftReport;

/// Prefix that marks a message as a drift alert
pub const ALERT_MARKER: &str = "🚨 DataWatchDog Alert:";

/// Default transport timeout for webhook delivery
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook body accepted by Slack and Teams incoming webhooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub text: String,
}

impl AlertPayload {
    /// Render a report into the alert message
    pub fn from_report(report: &DriftReport) -> Result<Self, AlertError> {
        let body = report.to_pretty_json()?;
        Ok(Self {
            text: format!("{} {}", ALERT_MARKER, body),
        })
    }
}

/// Transport capable of delivering an alert payload
pub trait Notifier {
    /// Deliver the payload to the endpoint, one attempt only
    fn send(&self, endpoint: &Url, payload: &AlertPayload) -> Result<(), AlertError>;
}

/// Delivers alerts by POSTing JSON to an incoming webhook
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    /// Create a notifier with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, AlertError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AlertError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, endpoint: &Url, payload: &AlertPayload) -> Result<(), AlertError> {
        // `json` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(endpoint.clone())
            .json(payload)
            .send()
            .map_err(|e| AlertError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AlertError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
