//! Schema and mean-shift drift detection
//!
//! Compares an old and a new snapshot column by column. Columns that only
//! exist on one side are reported as schema changes; numeric columns present
//! on both sides are compared by their arithmetic mean, and flagged when the
//! relative shift exceeds the configured threshold.

use std::collections::BTreeSet;

use super::{ColumnDrift, ComputationError, DriftReport, SchemaDelta, SkippedColumn, Snapshot};
use crate::dataset::Dataset;

/// Default relative mean shift tolerated before a column is flagged (10%)
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Added to the baseline mean so a zero baseline never divides by zero
///
/// With a zero baseline any nonzero new mean yields a ratio around
/// `|new_mean| / 1e-9` and is always flagged.
pub const EPSILON: f64 = 1e-9;

/// Detects schema and statistical drift between two snapshots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftDetector {
    /// Drift ratio a column must exceed to be flagged
    pub threshold: f64,
}

impl DriftDetector {
    /// Create a detector with the given threshold
    ///
    /// Thresholds at or below zero flag any nonzero shift.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Compare two snapshots and assemble a drift report
    pub fn detect<O, N>(&self, old: &O, new: &N) -> DriftReport
    where
        O: Dataset + ?Sized,
        N: Dataset + ?Sized,
    {
        let mut report = DriftReport {
            schema_changes: schema_delta(old, new),
            ..Default::default()
        };

        // Only columns that are numeric in the old snapshot have a baseline.
        for name in old.column_names() {
            if !old.is_numeric(name) || !new.has_column(name) {
                continue;
            }

            match self.compare_column(old, new, name) {
                Ok(Some(drift)) => {
                    report.columns.insert(name.to_string(), drift);
                }
                Ok(None) => {}
                Err(reason) => report.skipped.push(SkippedColumn {
                    column: name.to_string(),
                    reason,
                }),
            }
        }

        report
    }

    fn compare_column<O, N>(
        &self,
        old: &O,
        new: &N,
        name: &str,
    ) -> Result<Option<ColumnDrift>, ComputationError>
    where
        O: Dataset + ?Sized,
        N: Dataset + ?Sized,
    {
        let new_values = new
            .numeric_values(name)
            .ok_or(ComputationError::TypeMismatch)?;
        let old_values = old.numeric_values(name).unwrap_or(&[]);

        let old_mean = finite_mean(old_values, Snapshot::Old)?;
        let new_mean = finite_mean(new_values, Snapshot::New)?;

        let ratio = drift_ratio(old_mean, new_mean);
        if ratio > self.threshold.max(0.0) {
            Ok(Some(ColumnDrift {
                old_mean,
                new_mean,
                drift_percentage: ratio * 100.0,
            }))
        } else {
            Ok(None)
        }
    }
}

impl Default for DriftDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

/// Compare two snapshots with the given threshold
pub fn detect<O, N>(old: &O, new: &N, threshold: f64) -> DriftReport
where
    O: Dataset + ?Sized,
    N: Dataset + ?Sized,
{
    DriftDetector::new(threshold).detect(old, new)
}

/// Arithmetic mean of the present values, skipping `None` and NaN
///
/// Returns `None` when nothing is left to average.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0_f64, 0_u64), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Relative shift of the mean against the baseline
fn drift_ratio(old_mean: f64, new_mean: f64) -> f64 {
    (new_mean - old_mean).abs() / (old_mean + EPSILON)
}

fn finite_mean(values: &[Option<f64>], snapshot: Snapshot) -> Result<f64, ComputationError> {
    let value = mean(values).ok_or(ComputationError::NoValues { snapshot })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::NonFiniteMean { snapshot })
    }
}

fn schema_delta<O, N>(old: &O, new: &N) -> Option<SchemaDelta>
where
    O: Dataset + ?Sized,
    N: Dataset + ?Sized,
{
    let old_names: BTreeSet<&str> = old.column_names().into_iter().collect();
    let new_names: BTreeSet<&str> = new.column_names().into_iter().collect();

    let delta = SchemaDelta {
        added: new_names
            .difference(&old_names)
            .map(|s| s.to_string())
            .collect(),
        removed: old_names
            .difference(&new_names)
            .map(|s| s.to_string())
            .collect(),
    };

    if delta.is_empty() {
        None
    } else {
        Some(delta)
    }
}
