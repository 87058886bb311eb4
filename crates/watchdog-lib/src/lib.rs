//! Drift detection library for tabular data snapshots
//!
//! This crate provides the core functionality for:
//! - Schema comparison between two snapshots
//! - Mean-shift drift detection on numeric columns
//! - Alert delivery to Slack/Teams style webhooks
//! - Configuration loading and observability

pub mod alert;
pub mod config;
pub mod dataset;
pub mod drift;
pub mod observability;
pub mod watchdog;

pub use crate::alert::{AlertDispatcher, AlertPayload, DispatchResult, NotificationTarget, Notifier};
pub use crate::config::{ConfigError, WatchdogConfig};
pub use crate::dataset::{Column, ColumnData, Dataset, DatasetError, Table};
pub use crate::drift::{detect, ColumnDrift, DriftDetector, DriftReport, SchemaDelta};
pub use crate::observability::{StructuredLogger, WatchdogMetrics};
pub use crate::watchdog::{CheckOutcome, Watchdog, WatchdogError};
