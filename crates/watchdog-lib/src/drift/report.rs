//! Drift report model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ComputationError;

/// Column names that differ between the two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDelta {
    /// Columns present only in the new snapshot, sorted
    pub added: Vec<String>,
    /// Columns present only in the old snapshot, sorted
    pub removed: Vec<String>,
}

impl SchemaDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Mean shift of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnDrift {
    pub old_mean: f64,
    pub new_mean: f64,
    /// Drift ratio expressed as a percentage
    pub drift_percentage: f64,
}

impl ColumnDrift {
    pub fn drift_ratio(&self) -> f64 {
        self.drift_percentage / 100.0
    }
}

/// A column the detector could not compare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedColumn {
    pub column: String,
    pub reason: ComputationError,
}

/// Result of comparing two snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema_changes: Option<SchemaDelta>,

    /// Columns whose drift ratio exceeded the threshold
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub columns: BTreeMap<String, ColumnDrift>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<SkippedColumn>,
}

impl DriftReport {
    /// True when neither the schema nor any column drifted
    ///
    /// Skipped columns are diagnostics only and do not count as drift.
    pub fn is_empty(&self) -> bool {
        self.schema_changes.is_none() && self.columns.is_empty()
    }

    /// Names of the flagged columns, sorted
    pub fn drifted_columns(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Largest drift percentage among flagged columns
    pub fn max_drift_percentage(&self) -> Option<f64> {
        self.columns
            .values()
            .map(|d| d.drift_percentage)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Pretty JSON rendering used in alert messages
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
