//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly report with ANSI color codes: a header,
//! individual findings with source locations and snippets, and a one-line
//! summary. Batches end with a compact table, scorecards with a category
//! table and recommendations, migration plans with their change log.

use colored::Colorize;

use crate::artifact::ArtifactKind;
use crate::finding::{ArtifactReport, ArtifactStatus, BatchReport, Finding, Severity};
use crate::migrate::{ChangeKind, MigrationPlan};
use crate::score::Scorecard;

fn title(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Agent => "Agent",
        ArtifactKind::Command => "Command",
        ArtifactKind::Hook => "Hook-set",
        ArtifactKind::Skill => "Skill",
    }
}

fn header(out: &mut String, text: String) {
    out.push_str(&format!("\n{}\n", text.bold().on_blue().white()));
}

fn severity_tag(severity: Severity) -> String {
    match severity {
        Severity::Critical => " CRIT".red().bold().to_string(),
        Severity::Warning => " WARN".yellow().bold().to_string(),
        Severity::Recommendation => "  REC".cyan().to_string(),
        Severity::Info => " INFO".blue().to_string(),
    }
}

fn status_str(status: ArtifactStatus) -> String {
    match status {
        ArtifactStatus::Valid => "VALID".green().bold().to_string(),
        ArtifactStatus::Warnings => "WARNINGS".yellow().bold().to_string(),
        ArtifactStatus::Errors => "ERRORS".red().bold().to_string(),
        ArtifactStatus::ParseError => "PARSE ERROR".red().bold().to_string(),
    }
}

fn push_finding(out: &mut String, finding: &Finding) {
    out.push_str(&format!(
        "  [{tag}] {rule_id:<32} {message}\n",
        tag = severity_tag(finding.severity),
        rule_id = finding.rule_id.dimmed(),
        message = finding.message,
    ));
    let location = match (&finding.file, finding.line) {
        (Some(f), Some(l)) => format!("{}:{}", f.display(), l),
        (Some(f), None) => format!("{}", f.display()),
        _ => String::new(),
    };
    if !location.is_empty() {
        out.push_str(&format!("         {}\n", location.dimmed()));
    }
    if let Some(ref snippet) = finding.snippet {
        out.push_str(&format!("         > {}\n", snippet.dimmed()));
    }
}

/// Formats an [`ArtifactReport`] as human-readable, ANSI-colored text.
///
/// Sections rendered (in order):
/// 1. **Header**: kind, identity, location and timestamp.
/// 2. **Findings**: severity, rule, message, location and snippet; or the
///    parse error when the artifact could not be decoded.
/// 3. **Summary**: status and severity counts.
pub fn format(report: &ArtifactReport) -> String {
    let mut out = String::new();

    header(
        &mut out,
        format!("  {} Validation: {}  ", title(report.kind), report.identity),
    );
    out.push_str(&format!("  Location:  {}\n", report.location.display()));
    out.push_str(&format!("  Timestamp: {}\n\n", report.audit_timestamp));

    if let Some(ref message) = report.parse_error {
        out.push_str(&format!("{}\n", "Parse Error".bold().underline()));
        out.push_str(&format!("  {}\n\n", message.red()));
    } else if !report.findings.is_empty() {
        out.push_str(&format!("{}\n", "Findings".bold().underline()));
        for finding in &report.findings {
            push_finding(&mut out, finding);
        }
        out.push('\n');
    }

    let (critical, warnings, recommendations, info) = report.count_by_severity();
    out.push_str(&format!(
        "Result: {}  |  {critical} critical, {warnings} warnings, {recommendations} recommendations, {info} info\n",
        status_str(report.status),
    ));

    out
}

/// Formats every report of a bulk audit followed by a summary table.
pub fn format_batch(batch: &BatchReport) -> String {
    let mut out = String::new();
    for report in &batch.reports {
        out.push_str(&format(report));
    }

    let separator = "─".repeat(60);
    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        format!("  Audit Summary: {} {}s", batch.reports.len(), batch.kind)
            .bold()
            .underline()
    ));
    out.push_str(&format!("{}\n", separator.dimmed()));

    for report in &batch.reports {
        let icon = match report.status {
            ArtifactStatus::Valid => "✓".green().to_string(),
            ArtifactStatus::Warnings => "⚠".yellow().to_string(),
            ArtifactStatus::Errors | ArtifactStatus::ParseError => "✗".red().to_string(),
        };
        let (c, w, r, i) = report.count_by_severity();
        out.push_str(&format!(
            "  {icon}  {name:<28} {status:<12} {c}c {w}w {r}r {i}i\n",
            name = report.identity,
            status = status_str(report.status),
        ));
    }

    out.push_str(&format!("{}\n", separator.dimmed()));
    if batch.reports.is_empty() {
        out.push_str(&format!("  No {}s found\n", batch.kind));
        return out;
    }
    out.push_str(&format!(
        "  Total: {}  {}  {}  {}\n",
        format!("{} errors", batch.count(ArtifactStatus::Errors)).red().bold(),
        format!("{} parse errors", batch.count(ArtifactStatus::ParseError))
            .red()
            .bold(),
        format!("{} warnings", batch.count(ArtifactStatus::Warnings))
            .yellow()
            .bold(),
        format!("{} valid", batch.count(ArtifactStatus::Valid))
            .green()
            .bold(),
    ));
    out
}

/// Formats an `enhance` scorecard: per-category scores, overall grade and
/// prioritised recommendations.
pub fn format_scorecard(card: &Scorecard) -> String {
    let mut out = String::new();

    header(
        &mut out,
        format!("  {} Quality: {}  ", title(card.kind), card.identity),
    );
    out.push('\n');

    out.push_str(&format!("{}\n", "Categories".bold().underline()));
    for category in &card.categories {
        let score = format!("{:>2}/{}", category.score, category.max);
        let score = if category.score == category.max {
            score.green().to_string()
        } else if category.findings.iter().any(|f| f.severity == Severity::Critical) {
            score.red().bold().to_string()
        } else {
            score.yellow().to_string()
        };
        out.push_str(&format!(
            "  {label:<22} {score}  {}\n",
            format!("{} findings", category.findings.len()).dimmed(),
            label = category.category.label(),
        ));
    }
    out.push('\n');

    let grade = match card.grade {
        'A' | 'B' => card.grade.to_string().green().bold(),
        'C' => card.grade.to_string().yellow().bold(),
        _ => card.grade.to_string().red().bold(),
    };
    out.push_str(&format!("Overall: {}%  Grade: {grade}\n", card.percentage));

    if !card.recommendations.is_empty() {
        out.push('\n');
        out.push_str(&format!("{}\n", "Recommendations".bold().underline()));
        for (n, rec) in card.recommendations.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} (score {})\n",
                n + 1,
                rec.category.label().bold(),
                rec.score,
            ));
            for action in &rec.actions {
                let hint = action.remediation.as_deref().unwrap_or(&action.message);
                out.push_str(&format!("       - {}\n", hint));
            }
        }
    }

    out.push('\n');
    let result = if card.passed {
        "PASSED".green().bold().to_string()
    } else if card.has_critical {
        "FAILED (critical findings)".red().bold().to_string()
    } else {
        "FAILED".red().bold().to_string()
    };
    out.push_str(&format!("Result: {result}\n"));
    out
}

/// Formats a migration plan's change log, with a preview of the migrated
/// text when the plan has automatic changes.
pub fn format_plan(plan: &MigrationPlan) -> String {
    let mut out = String::new();

    header(
        &mut out,
        format!(
            "  {} Migration: {}  ",
            title(plan.original.kind),
            plan.original.identity
        ),
    );
    out.push_str(&format!("  Location: {}\n\n", plan.original.location.display()));

    if plan.changes.is_empty() {
        out.push_str(&format!("  {}\n", "Already up to date".green()));
        return out;
    }

    out.push_str(&format!("{}\n", "Changes".bold().underline()));
    for change in &plan.changes {
        let tag = match change.kind {
            ChangeKind::Automatic => "  FIX".green().bold().to_string(),
            ChangeKind::Advisory => " NOTE".blue().to_string(),
            ChangeKind::Unrepairable => "MANUAL".red().bold().to_string(),
        };
        out.push_str(&format!(
            "  [{tag}] {rule_id:<30} {}\n",
            change.description,
            rule_id = change.rule_id.dimmed(),
        ));
    }
    out.push('\n');

    if plan.has_mutations() {
        match plan.render() {
            Ok(text) => {
                out.push_str(&format!("{}\n", "Preview".bold().underline()));
                for line in text.lines() {
                    out.push_str(&format!("  {}\n", line.dimmed()));
                }
                out.push('\n');
            }
            Err(e) => {
                out.push_str(&format!("  {}\n\n", format!("preview unavailable: {e}").red()));
            }
        }
    }

    let automatic = plan.changes_of(ChangeKind::Automatic).count();
    let advisory = plan.changes_of(ChangeKind::Advisory).count();
    let manual = plan.changes_of(ChangeKind::Unrepairable).count();
    let state = if automatic > 0 {
        "PENDING".yellow().bold().to_string()
    } else {
        "NO CHANGES".dimmed().to_string()
    };
    out.push_str(&format!(
        "Result: {state}  |  {automatic} automatic, {advisory} advisory, {manual} manual\n"
    ));
    out
}
