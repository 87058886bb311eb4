//! Drift detection between two tabular snapshots
//!
//! This module provides:
//! - Schema comparison (columns added or removed)
//! - Mean-shift comparison for numeric columns against a relative threshold
//! - The report model handed to the alert dispatcher

mod detector;
mod report;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use detector::{detect, mean, DriftDetector, DEFAULT_THRESHOLD, EPSILON};
pub use report::{ColumnDrift, DriftReport, SchemaDelta, SkippedColumn};

/// Which side of the comparison a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Snapshot {
    Old,
    New,
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Snapshot::Old => write!(f, "old"),
            Snapshot::New => write!(f, "new"),
        }
    }
}

/// Why a numeric column could not be compared
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ComputationError {
    /// Column is empty or every entry is missing
    #[error("{snapshot} column has no values to average")]
    NoValues { snapshot: Snapshot },

    /// Mean overflowed or the column holds infinite values
    #[error("{snapshot} column mean is not finite")]
    NonFiniteMean { snapshot: Snapshot },

    /// Column is numeric in the old snapshot but not in the new one
    #[error("column is numeric in the old snapshot but not in the new one")]
    TypeMismatch,
}
