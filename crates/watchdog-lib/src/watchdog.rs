//! Drift check orchestration
//!
//! Runs the detector against two snapshots and, when drift was found, hands
//! the report to the alert dispatcher. The report is returned regardless of
//! how delivery went.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alert::{
    AlertDispatcher, AlertError, DispatchResult, NotificationTarget, Notifier, WebhookNotifier,
};
use crate::config::{ConfigError, WatchdogConfig};
use crate::dataset::Dataset;
use crate::drift::{DriftDetector, DriftReport};
use crate::observability::{StructuredLogger, WatchdogMetrics};

/// Result of one drift check
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub checked_at: DateTime<Utc>,
    pub threshold: f64,
    pub report: DriftReport,
    /// `None` when no drift was found or alerting was disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<DispatchResult>,
}

impl CheckOutcome {
    pub fn has_drift(&self) -> bool {
        !self.report.is_empty()
    }
}

/// Compares snapshots and alerts on drift
pub struct Watchdog<N = WebhookNotifier> {
    config: WatchdogConfig,
    detector: DriftDetector,
    target: NotificationTarget,
    dispatcher: AlertDispatcher<N>,
    logger: StructuredLogger,
    metrics: WatchdogMetrics,
    alerts_enabled: bool,
}

impl Watchdog<WebhookNotifier> {
    /// Create a watchdog that delivers alerts over HTTP
    pub fn new(config: WatchdogConfig) -> Result<Self, WatchdogError> {
        let dispatcher = AlertDispatcher::webhook(config.alert_channel.clone(), config.timeout())?;
        Self::with_dispatcher(config, dispatcher)
    }
}

impl<N: Notifier> Watchdog<N> {
    /// Create a watchdog around an existing dispatcher
    pub fn with_dispatcher(
        config: WatchdogConfig,
        dispatcher: AlertDispatcher<N>,
    ) -> Result<Self, WatchdogError> {
        config.validate()?;
        let target = config.notification_target()?;

        Ok(Self {
            detector: DriftDetector::new(config.threshold),
            logger: StructuredLogger::new(config.alert_channel.clone()),
            metrics: WatchdogMetrics::new(),
            target,
            dispatcher,
            config,
            alerts_enabled: true,
        })
    }

    /// Builder: disable alert delivery, reports are still produced
    pub fn without_alerts(mut self) -> Self {
        self.alerts_enabled = false;
        self
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    pub fn target(&self) -> &NotificationTarget {
        &self.target
    }

    pub fn dispatcher(&self) -> &AlertDispatcher<N> {
        &self.dispatcher
    }

    /// Compare two snapshots, alerting when drift is found
    pub fn check<O, M>(&self, old: &O, new: &M) -> CheckOutcome
    where
        O: Dataset + ?Sized,
        M: Dataset + ?Sized,
    {
        let old_names = old.column_names();
        self.logger.log_check_started(
            old_names.len(),
            new.column_names().len(),
            self.detector.threshold,
        );

        let start = Instant::now();
        let report = self.detector.detect(old, new);
        let elapsed = start.elapsed().as_secs_f64();

        let compared = old_names
            .iter()
            .filter(|name| old.is_numeric(name) && new.has_column(name))
            .count();
        self.metrics.record_check(&report, compared, elapsed);

        for skipped in &report.skipped {
            self.logger.log_column_skipped(&skipped.column, &skipped.reason);
        }
        self.logger.log_check_result(&report);

        let dispatch = if report.is_empty() || !self.alerts_enabled {
            None
        } else {
            Some(self.dispatcher.dispatch(&report, &self.target))
        };

        CheckOutcome {
            checked_at: Utc::now(),
            threshold: self.detector.threshold,
            report,
            dispatch,
        }
    }
}

/// Errors raised while setting up a watchdog
#[derive(Debug, thiserror::Error)]
pub enum WatchdogError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up alert delivery: {0}")]
    Alert(#[from] AlertError),
}
