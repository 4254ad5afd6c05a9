//! JSON output formatter.
//!
//! Each document carries the artifact metadata, a severity summary and the
//! full finding list. Batches wrap the per-artifact documents with a status
//! summary.

use std::path::Path;

use crate::artifact::ArtifactKind;
use crate::finding::{ArtifactReport, ArtifactStatus, BatchReport, Finding};
use crate::migrate::{MigrationChange, MigrationPlan};
use crate::score::Scorecard;

use super::to_json;

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    kind: ArtifactKind,
    identity: &'a str,
    location: &'a Path,
    audit_timestamp: &'a str,
    status: ArtifactStatus,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_error: Option<&'a str>,
    summary: Summary,
    findings: &'a [Finding],
}

#[derive(serde::Serialize)]
struct Summary {
    critical: usize,
    warnings: usize,
    recommendations: usize,
    info: usize,
}

#[derive(serde::Serialize)]
struct JsonBatch<'a> {
    kind: ArtifactKind,
    total: usize,
    passed: bool,
    summary: BatchSummary,
    artifacts: Vec<JsonReport<'a>>,
}

#[derive(serde::Serialize)]
struct BatchSummary {
    valid: usize,
    warnings: usize,
    errors: usize,
    parse_errors: usize,
}

#[derive(serde::Serialize)]
struct JsonPlan<'a> {
    kind: ArtifactKind,
    identity: &'a str,
    location: &'a Path,
    has_mutations: bool,
    changes: &'a [MigrationChange],
    #[serde(skip_serializing_if = "Option::is_none")]
    migrated: Option<String>,
}

fn report_view(report: &ArtifactReport) -> JsonReport<'_> {
    let (critical, warnings, recommendations, info) = report.count_by_severity();
    JsonReport {
        kind: report.kind,
        identity: &report.identity,
        location: &report.location,
        audit_timestamp: &report.audit_timestamp,
        status: report.status,
        passed: report.passed,
        parse_error: report.parse_error.as_deref(),
        summary: Summary {
            critical,
            warnings,
            recommendations,
            info,
        },
        findings: &report.findings,
    }
}

pub fn format(report: &ArtifactReport) -> String {
    to_json(&report_view(report))
}

pub fn format_batch(batch: &BatchReport) -> String {
    let output = JsonBatch {
        kind: batch.kind,
        total: batch.reports.len(),
        passed: batch.passed(),
        summary: BatchSummary {
            valid: batch.count(ArtifactStatus::Valid),
            warnings: batch.count(ArtifactStatus::Warnings),
            errors: batch.count(ArtifactStatus::Errors),
            parse_errors: batch.count(ArtifactStatus::ParseError),
        },
        artifacts: batch.reports.iter().map(report_view).collect(),
    };
    to_json(&output)
}

pub fn format_scorecard(card: &Scorecard) -> String {
    to_json(card)
}

/// The migrated text is included only when the plan has automatic changes.
fn plan_view(plan: &MigrationPlan) -> JsonPlan<'_> {
    let migrated = if plan.has_mutations() {
        match plan.render() {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "could not render migrated artifact");
                None
            }
        }
    } else {
        None
    };
    JsonPlan {
        kind: plan.original.kind,
        identity: &plan.original.identity,
        location: &plan.original.location,
        has_mutations: plan.has_mutations(),
        changes: &plan.changes,
        migrated,
    }
}

pub fn format_plans(plans: &[MigrationPlan]) -> String {
    match plans {
        [plan] => to_json(&plan_view(plan)),
        _ => to_json(&plans.iter().map(plan_view).collect::<Vec<_>>()),
    }
}
