//! Observability infrastructure for drift checks
//!
//! Provides:
//! - Prometheus metrics (checks run, columns compared and flagged, alert outcomes, latency)
//! - Structured logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::alert::DispatchResult;
use crate::drift::{ComputationError, DriftReport};

/// Histogram buckets for detection latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<WatchdogMetricsInner> = OnceLock::new();

struct WatchdogMetricsInner {
    checks: IntCounter,
    columns_compared: IntCounter,
    columns_drifted: IntCounter,
    columns_skipped: IntCounter,
    schema_changes: IntCounter,
    alerts: IntCounterVec,
    detection_latency_seconds: Histogram,
}

impl WatchdogMetricsInner {
    fn new() -> Self {
        Self {
            checks: register_int_counter!(
                "datawatchdog_checks_total",
                "Total number of drift checks run"
            )
            .expect("Failed to register checks_total"),

            columns_compared: register_int_counter!(
                "datawatchdog_columns_compared_total",
                "Numeric columns compared by mean"
            )
            .expect("Failed to register columns_compared_total"),

            columns_drifted: register_int_counter!(
                "datawatchdog_columns_drifted_total",
                "Numeric columns whose drift exceeded the threshold"
            )
            .expect("Failed to register columns_drifted_total"),

            columns_skipped: register_int_counter!(
                "datawatchdog_columns_skipped_total",
                "Numeric columns that could not produce a mean"
            )
            .expect("Failed to register columns_skipped_total"),

            schema_changes: register_int_counter!(
                "datawatchdog_schema_changes_total",
                "Checks that found added or removed columns"
            )
            .expect("Failed to register schema_changes_total"),

            alerts: register_int_counter_vec!(
                "datawatchdog_alerts_total",
                "Alert dispatch attempts by outcome",
                &["outcome"]
            )
            .expect("Failed to register alerts_total"),

            detection_latency_seconds: register_histogram!(
                "datawatchdog_detection_latency_seconds",
                "Time spent comparing two snapshots",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register detection_latency_seconds"),
        }
    }
}

/// Handle to the process-wide drift metrics
///
/// Clones share the same underlying counters.
#[derive(Clone)]
pub struct WatchdogMetrics {
    _private: (),
}

impl Default for WatchdogMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchdogMetrics {
    /// Create a metrics handle (registers the metrics on first call)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(WatchdogMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &WatchdogMetricsInner {
        GLOBAL_METRICS.get_or_init(WatchdogMetricsInner::new)
    }

    /// Record a finished check and its report
    pub fn record_check(&self, report: &DriftReport, compared: usize, duration_secs: f64) {
        let inner = self.inner();
        inner.checks.inc();
        inner.columns_compared.inc_by(compared as u64);
        inner.columns_drifted.inc_by(report.columns.len() as u64);
        inner.columns_skipped.inc_by(report.skipped.len() as u64);
        if report.schema_changes.is_some() {
            inner.schema_changes.inc();
        }
        inner.detection_latency_seconds.observe(duration_secs);
    }

    /// Count an alert dispatch outcome
    pub fn inc_alert(&self, outcome: &str) {
        self.inner().alerts.with_label_values(&[outcome]).inc();
    }

    /// Total checks recorded so far
    pub fn checks_total(&self) -> u64 {
        self.inner().checks.get()
    }

    /// Alerts recorded so far for an outcome label
    pub fn alerts_total(&self, outcome: &str) -> u64 {
        self.inner().alerts.with_label_values(&[outcome]).get()
    }

    /// Prometheus text exposition of the default registry
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Structured logger for drift events
///
/// Every event carries an `event` field and the alert channel label.
#[derive(Clone)]
pub struct StructuredLogger {
    channel: String,
}

impl StructuredLogger {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    /// Log the start of a check
    pub fn log_check_started(&self, old_columns: usize, new_columns: usize, threshold: f64) {
        debug!(
            event = "check_started",
            channel = %self.channel,
            old_columns = old_columns,
            new_columns = new_columns,
            threshold = threshold,
            "Comparing snapshots"
        );
    }

    /// Log a column that could not be compared
    pub fn log_column_skipped(&self, column: &str, reason: &ComputationError) {
        warn!(
            event = "column_skipped",
            channel = %self.channel,
            column = %column,
            reason = %reason,
            "Column skipped during drift comparison"
        );
    }

    /// Log the result of a check
    pub fn log_check_result(&self, report: &DriftReport) {
        if report.is_empty() {
            info!(
                event = "no_drift",
                channel = %self.channel,
                "No drift detected"
            );
            return;
        }

        let (added, removed) = report
            .schema_changes
            .as_ref()
            .map(|s| (s.added.len(), s.removed.len()))
            .unwrap_or((0, 0));

        warn!(
            event = "drift_detected",
            channel = %self.channel,
            columns_added = added,
            columns_removed = removed,
            columns_drifted = report.columns.len(),
            max_drift_percentage = ?report.max_drift_percentage(),
            "Drift detected"
        );
    }

    /// Log the outcome of an alert dispatch
    pub fn log_alert_outcome(&self, result: &DispatchResult) {
        match result {
            DispatchResult::Sent => {
                info!(
                    event = "alert_outcome",
                    channel = %self.channel,
                    outcome = "sent",
                    "Alert sent successfully"
                );
            }
            DispatchResult::SkippedNoTarget => {
                info!(
                    event = "alert_outcome",
                    channel = %self.channel,
                    outcome = "skipped",
                    "Webhook URL not provided, alert not sent"
                );
            }
            DispatchResult::Failed(reason) => {
                warn!(
                    event = "alert_outcome",
                    channel = %self.channel,
                    outcome = "failed",
                    reason = %reason,
                    "Alert delivery failed"
                );
            }
        }
    }
}
