//! Output formatting for reports, scorecards and migration plans.
//!
//! Three formats are supported:
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//! | [`Sarif`](OutputFormat::Sarif)   | [`sarif`]  | CI/CD integration       |
//!
//! Scorecards and migration plans have no SARIF rendering of their own: a
//! scorecard in SARIF lists the findings behind it, a plan falls back to
//! JSON.

pub mod json;
pub mod pretty;
pub mod sarif;

use crate::finding::{ArtifactReport, BatchReport};
use crate::migrate::MigrationPlan;
use crate::score::Scorecard;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text with summary tables.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for CI/CD tool integration.
    Sarif,
}

/// Formats a single-artifact [`ArtifactReport`].
///
/// # Examples
///
/// ```rust,no_run
/// use plugin_lint::output::{format_report, OutputFormat};
/// # use plugin_lint::finding::ArtifactReport;
/// # fn example(report: &ArtifactReport) {
/// let json = format_report(report, OutputFormat::Json);
/// println!("{json}");
/// # }
/// ```
pub fn format_report(report: &ArtifactReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(report),
        OutputFormat::Json => json::format(report),
        OutputFormat::Sarif => sarif::format(std::slice::from_ref(report)),
    }
}

/// Formats a bulk audit.
pub fn format_batch(batch: &BatchReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format_batch(batch),
        OutputFormat::Json => json::format_batch(batch),
        OutputFormat::Sarif => sarif::format(&batch.reports),
    }
}

/// Formats an `enhance` scorecard. `report` supplies the findings for SARIF.
pub fn format_scorecard(card: &Scorecard, report: &ArtifactReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format_scorecard(card),
        OutputFormat::Json => json::format_scorecard(card),
        OutputFormat::Sarif => sarif::format(std::slice::from_ref(report)),
    }
}

/// Formats migration plans. JSON output is an array when more than one
/// plan is given.
pub fn format_plans(plans: &[MigrationPlan], format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => plans.iter().map(pretty::format_plan).collect(),
        OutputFormat::Json | OutputFormat::Sarif => json::format_plans(plans),
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(mut text) => {
            text.push('\n');
            text
        }
        Err(e) => {
            tracing::error!(error = %e, "JSON serialization failed");
            String::from("{}\n")
        }
    }
}
