//! Drift check commands

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use watchdog_lib::{CheckOutcome, Table, Watchdog, WatchdogConfig};

use crate::csv_source::load_csv;
use crate::output::{print_outcome, OutputFormat};

/// Flags shared by `check` and `demo`
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub threshold: Option<f64>,
    pub webhook_url: Option<String>,
    pub channel: Option<String>,
    pub no_alert: bool,
}

/// Load configuration and apply command line overrides
pub fn resolve_config(config_path: Option<&Path>, opts: &CheckOptions) -> Result<WatchdogConfig> {
    let mut config = WatchdogConfig::load(config_path).context("Failed to load configuration")?;

    if let Some(threshold) = opts.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(url) = &opts.webhook_url {
        config = config.with_webhook_url(url.clone());
    }
    if let Some(channel) = &opts.channel {
        config = config.with_alert_channel(channel.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Compare two CSV snapshots
pub fn run_check(
    old_path: &Path,
    new_path: &Path,
    config: WatchdogConfig,
    opts: &CheckOptions,
    format: OutputFormat,
) -> Result<CheckOutcome> {
    let old = load_csv(old_path)
        .with_context(|| format!("Failed to load old snapshot {}", old_path.display()))?;
    let new = load_csv(new_path)
        .with_context(|| format!("Failed to load new snapshot {}", new_path.display()))?;

    info!(
        old = %old_path.display(),
        new = %new_path.display(),
        old_rows = old.height(),
        new_rows = new.height(),
        "Loaded snapshots"
    );

    run(&old, &new, config, opts, format)
}

/// Compare the built-in sample snapshots
pub fn run_demo(
    config: WatchdogConfig,
    opts: &CheckOptions,
    format: OutputFormat,
) -> Result<CheckOutcome> {
    let (old, new) = demo_tables();
    run(&old, &new, config, opts, format)
}

fn run(
    old: &Table,
    new: &Table,
    config: WatchdogConfig,
    opts: &CheckOptions,
    format: OutputFormat,
) -> Result<CheckOutcome> {
    let mut watchdog = Watchdog::new(config).context("Failed to set up watchdog")?;
    if opts.no_alert {
        watchdog = watchdog.without_alerts();
    }

    let outcome = watchdog.check(old, new);
    print_outcome(&outcome, format)?;
    Ok(outcome)
}

/// Sample snapshots: column A shifts, column C appears
pub fn demo_tables() -> (Table, Table) {
    let old = Table::new()
        .with_numeric("A", [1.0, 2.0, 3.0])
        .with_numeric("B", [4.0, 5.0, 6.0]);
    let new = Table::new()
        .with_numeric("A", [1.0, 2.0, 100.0])
        .with_numeric("B", [4.0, 5.0, 6.0])
        .with_numeric("C", [7.0, 8.0, 9.0]);
    (old, new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use watchdog_lib::DispatchResult;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_demo_reports_drift() {
        let outcome = run_demo(
            WatchdogConfig::default(),
            &CheckOptions::default(),
            OutputFormat::Json,
        )
        .unwrap();

        assert!(outcome.has_drift());
        assert_eq!(outcome.report.drifted_columns(), vec!["A"]);
        assert_eq!(outcome.dispatch, Some(DispatchResult::SkippedNoTarget));
    }

    #[test]
    fn test_check_csv_files() {
        let old = csv_file("A,B\n1,4\n2,5\n3,6\n");
        let new = csv_file("A,B,C\n1,4,7\n2,5,8\n100,6,9\n");
        let opts = CheckOptions {
            no_alert: true,
            ..Default::default()
        };

        let outcome = run_check(
            old.path(),
            new.path(),
            WatchdogConfig::default(),
            &opts,
            OutputFormat::Table,
        )
        .unwrap();

        assert_eq!(
            outcome.report.schema_changes.as_ref().unwrap().added,
            vec!["C"]
        );
        assert!(outcome.report.columns.contains_key("A"));
        assert!(outcome.dispatch.is_none());
    }

    #[test]
    fn test_check_sends_webhook() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .with_status(200)
            .expect(1)
            .create();

        let config = WatchdogConfig::default().with_webhook_url(format!("{}/hook", server.url()));
        let outcome = run_demo(config, &CheckOptions::default(), OutputFormat::Json).unwrap();

        assert_eq!(outcome.dispatch, Some(DispatchResult::Sent));
        mock.assert();
    }

    #[test]
    fn test_missing_snapshot_is_error() {
        let new = csv_file("A\n1\n");
        let result = run_check(
            Path::new("/nonexistent/old.csv"),
            new.path(),
            WatchdogConfig::default(),
            &CheckOptions::default(),
            OutputFormat::Table,
        );
        assert!(result.is_err());
    }
}
