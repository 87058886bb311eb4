//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use watchdog_lib::{CheckOutcome, DispatchResult};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the drifted columns table
#[derive(Tabled)]
struct DriftRow {
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "Old Mean")]
    old_mean: String,
    #[tabled(rename = "New Mean")]
    new_mean: String,
    #[tabled(rename = "Drift")]
    drift: String,
}

/// Print a check outcome in the requested format
pub fn print_outcome(outcome: &CheckOutcome, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Table => print_outcome_table(outcome),
    }
    Ok(())
}

fn print_outcome_table(outcome: &CheckOutcome) {
    let report = &outcome.report;

    println!("{}", "Drift Report".bold());
    println!("{}", "=".repeat(60));
    println!(
        "Checked at: {}",
        outcome.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Threshold:  {}", format_percentage(outcome.threshold * 100.0));
    println!();

    if report.is_empty() {
        print_success("No drift detected");
    }

    if let Some(schema) = &report.schema_changes {
        println!("{}", "Schema changes".bold());
        for column in &schema.added {
            println!("  {} {}", "+".green().bold(), column.green());
        }
        for column in &schema.removed {
            println!("  {} {}", "-".red().bold(), column.red());
        }
        println!();
    }

    if !report.columns.is_empty() {
        let rows: Vec<DriftRow> = report
            .columns
            .iter()
            .map(|(name, drift)| DriftRow {
                column: name.clone(),
                old_mean: format_number(drift.old_mean),
                new_mean: format_number(drift.new_mean),
                drift: color_drift(drift.drift_percentage, outcome.threshold * 100.0),
            })
            .collect();
        println!("{}", "Drifted columns".bold());
        println!("{}", Table::new(rows).with(Style::rounded()));
        println!();
    }

    for skipped in &report.skipped {
        print_warning(&format!("Column '{}' skipped: {}", skipped.column, skipped.reason));
    }

    match &outcome.dispatch {
        Some(DispatchResult::Sent) => print_success("Alert sent"),
        Some(DispatchResult::SkippedNoTarget) => print_info("Webhook URL not provided, alert not sent"),
        Some(DispatchResult::Failed(reason)) => print_error(&format!("Alert failed: {}", reason)),
        None => {}
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a mean for display
pub fn format_number(value: f64) -> String {
    if value != 0.0 && (value.abs() >= 1e6 || value.abs() < 1e-3) {
        format!("{:.3e}", value)
    } else {
        format!("{:.3}", value)
    }
}

/// Format a percentage
pub fn format_percentage(percentage: f64) -> String {
    if percentage.abs() >= 1e6 {
        format!("{:.2e}%", percentage)
    } else {
        format!("{:.2}%", percentage)
    }
}

/// Color a drift percentage by how far it exceeds the threshold
pub fn color_drift(percentage: f64, threshold_percentage: f64) -> String {
    let formatted = format_percentage(percentage);
    if percentage >= threshold_percentage.max(1.0) * 5.0 {
        formatted.red().to_string()
    } else {
        formatted.yellow().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2.000");
        assert_eq!(format_number(34.333333), "34.333");
        assert_eq!(format_number(0.0), "0.000");
        assert_eq!(format_number(1.5e7), "1.500e7");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1616.6666), "1616.67%");
        assert_eq!(format_percentage(2e11), "2.00e11%");
    }
}
