//! DataWatchdog CLI
//!
//! Compares two snapshots of tabular data for schema and statistical drift
//! and posts an alert to a Slack/Teams webhook when drift is found.

mod commands;
mod csv_source;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::check::{self, CheckOptions};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use watchdog_lib::WatchdogMetrics;

/// Exit code when `--fail-on-drift` is set and drift was found
const DRIFT_EXIT_CODE: u8 = 2;

/// DataWatchdog CLI
#[derive(Parser)]
#[command(name = "datawatchdog")]
#[command(author, version, about = "DataWatchdog: detect schema and statistical drift between datasets", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML); WATCHDOG_* env vars override it
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Print Prometheus metrics on stderr before exiting
    #[arg(long, global = true)]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every drift check
#[derive(clap::Args, Debug, Clone)]
pub struct AlertArgs {
    /// Relative mean shift tolerated before a column is flagged (0.1 = 10%)
    #[arg(long, short)]
    pub threshold: Option<f64>,

    /// Incoming webhook URL for alerts
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// Alert channel label (slack, teams)
    #[arg(long)]
    pub channel: Option<String>,

    /// Detect drift without sending an alert
    #[arg(long)]
    pub no_alert: bool,

    /// Exit with status 2 when drift is found
    #[arg(long)]
    pub fail_on_drift: bool,
}

impl From<&AlertArgs> for CheckOptions {
    fn from(args: &AlertArgs) -> Self {
        CheckOptions {
            threshold: args.threshold,
            webhook_url: args.webhook_url.clone(),
            channel: args.channel.clone(),
            no_alert: args.no_alert,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two CSV snapshots
    Check {
        /// Baseline snapshot
        #[arg(long)]
        old: PathBuf,

        /// Snapshot to compare against the baseline
        #[arg(long)]
        new: PathBuf,

        #[command(flatten)]
        alert: AlertArgs,
    },

    /// Run a check on built-in sample data
    Demo {
        #[command(flatten)]
        alert: AlertArgs,
    },
}

fn init_tracing(json: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let (outcome, fail_on_drift) = match &cli.command {
        Commands::Check { old, new, alert } => {
            let opts = CheckOptions::from(alert);
            let config = check::resolve_config(cli.config.as_deref(), &opts)?;
            let outcome = check::run_check(old, new, config, &opts, cli.format)?;
            (outcome, alert.fail_on_drift)
        }
        Commands::Demo { alert } => {
            let opts = CheckOptions::from(alert);
            let config = check::resolve_config(cli.config.as_deref(), &opts)?;
            let outcome = check::run_demo(config, &opts, cli.format)?;
            (outcome, alert.fail_on_drift)
        }
    };

    if cli.print_metrics {
        eprint!("{}", WatchdogMetrics::new().render());
    }

    if fail_on_drift && outcome.has_drift() {
        return Ok(ExitCode::from(DRIFT_EXIT_CODE));
    }
    Ok(ExitCode::SUCCESS)
}
