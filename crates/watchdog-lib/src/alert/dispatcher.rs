//! Alert dispatch for drift reports
//!
//! Turns a non-empty [`DriftReport`] into an [`AlertPayload`] and hands it to
//! a [`Notifier`]. Every outcome, including transport failures, comes back as
//! a [`DispatchResult`]; nothing is raised to the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{AlertError, AlertPayload, Notifier, WebhookNotifier};
use crate::drift::DriftReport;
use crate::observability::{StructuredLogger, WatchdogMetrics};

/// Where alerts should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTarget {
    /// No endpoint configured; alerts are skipped
    NoOp,
    /// Incoming webhook URL
    Webhook(Url),
}

impl NotificationTarget {
    pub fn is_configured(&self) -> bool {
        matches!(self, NotificationTarget::Webhook(_))
    }
}

/// Outcome of a single dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DispatchResult {
    Sent,
    SkippedNoTarget,
    Failed(String),
}

impl DispatchResult {
    /// Short label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            DispatchResult::Sent => "sent",
            DispatchResult::SkippedNoTarget => "skipped",
            DispatchResult::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchResult::Sent => write!(f, "alert sent"),
            DispatchResult::SkippedNoTarget => write!(f, "alert not sent, no webhook configured"),
            DispatchResult::Failed(reason) => write!(f, "alert failed: {}", reason),
        }
    }
}

/// Formats drift reports and delivers them through a notifier
pub struct AlertDispatcher<N = WebhookNotifier> {
    notifier: N,
    /// Informational channel label ("slack", "teams", ...)
    channel: String,
    logger: StructuredLogger,
    metrics: WatchdogMetrics,
}

impl AlertDispatcher<WebhookNotifier> {
    /// Create a dispatcher backed by the HTTP webhook notifier
    pub fn webhook(channel: impl Into<String>, timeout: Duration) -> Result<Self, AlertError> {
        Ok(Self::new(WebhookNotifier::new(timeout)?, channel))
    }
}

impl<N: Notifier> AlertDispatcher<N> {
    /// Create a dispatcher around an arbitrary notifier
    pub fn new(notifier: N, channel: impl Into<String>) -> Self {
        let channel = channel.into();
        Self {
            notifier,
            logger: StructuredLogger::new(channel.clone()),
            channel,
            metrics: WatchdogMetrics::new(),
        }
    }

    /// Channel label this dispatcher reports under
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The underlying notifier
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Deliver a drift report to the target
    ///
    /// Callers are expected to pass a non-empty report; the orchestrator in
    /// [`crate::Watchdog`] only dispatches when drift was found.
    pub fn dispatch(&self, report: &DriftReport, target: &NotificationTarget) -> DispatchResult {
        let result = match target {
            NotificationTarget::NoOp => DispatchResult::SkippedNoTarget,
            NotificationTarget::Webhook(url) => match self.deliver(report, url) {
                Ok(()) => DispatchResult::Sent,
                Err(e) => DispatchResult::Failed(e.to_string()),
            },
        };

        self.metrics.inc_alert(result.label());
        self.logger.log_alert_outcome(&result);
        result
    }

    fn deliver(&self, report: &DriftReport, url: &Url) -> Result<(), AlertError> {
        let payload = AlertPayload::from_report(report)?;
        self.notifier.send(url, &payload)
    }
}
