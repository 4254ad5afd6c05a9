//! SARIF 2.1.0 output formatter.
//!
//! One run covers every report passed in. Rule descriptors come from the
//! rule catalogue; a report that failed to parse contributes a single
//! `audit/parse-error` result pointing at its file.

use std::collections::BTreeSet;
use std::path::Path;

use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};

use crate::finding::{ArtifactReport, Severity};
use crate::rules;

const PARSE_ERROR_RULE: &str = "audit/parse-error";

fn level(severity: Severity) -> ResultLevel {
    match severity {
        Severity::Critical => ResultLevel::Error,
        Severity::Warning => ResultLevel::Warning,
        Severity::Recommendation | Severity::Info => ResultLevel::Note,
    }
}

fn location(file: &Path, line: Option<usize>) -> Location {
    let uri = file.to_string_lossy().replace('\\', "/");
    let mut physical = PhysicalLocation::builder().build();
    physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());
    if let Some(line) = line {
        physical.region = Some(Region::builder().start_line(line as i64).build());
    }
    let mut location = Location::builder().build();
    location.physical_location = Some(physical);
    location
}

fn descriptor(id: &str) -> ReportingDescriptor {
    let mut rule = ReportingDescriptor::builder().id(id.to_string()).build();
    let (short, help) = match rules::find_rule(id) {
        Some(info) => (info.message.to_string(), Some(info.remediation.to_string())),
        None if id == PARSE_ERROR_RULE => ("Artifact could not be read or decoded".to_string(), None),
        None => (id.to_string(), None),
    };
    rule.short_description = Some(MultiformatMessageString::builder().text(short).build());
    if let Some(help) = help {
        rule.help = Some(MultiformatMessageString::builder().text(help).build());
    }
    rule
}

fn result(rule_id: &str, rule_index: i64, level: ResultLevel, message: String) -> SarifResult {
    let mut result = SarifResult::builder()
        .message(Message::builder().text(message).build())
        .build();
    result.rule_id = Some(rule_id.to_string());
    result.rule_index = Some(rule_index);
    result.level = Some(level);
    result
}

/// Formats `reports` as a single-run SARIF log.
pub fn format(reports: &[ArtifactReport]) -> String {
    let mut ids: BTreeSet<&str> = reports
        .iter()
        .flat_map(|r| r.findings.iter().map(|f| f.rule_id.as_str()))
        .collect();
    if reports.iter().any(|r| r.parse_error.is_some()) {
        ids.insert(PARSE_ERROR_RULE);
    }
    let ids: Vec<&str> = ids.into_iter().collect();
    let index_of = |id: &str| ids.binary_search(&id).map_or(0, |i| i as i64);

    let mut results = Vec::new();
    for report in reports {
        if let Some(ref message) = report.parse_error {
            let mut r = result(
                PARSE_ERROR_RULE,
                index_of(PARSE_ERROR_RULE),
                ResultLevel::Error,
                message.clone(),
            );
            r.locations = Some(vec![location(&report.location, None)]);
            results.push(r);
        }
        for finding in &report.findings {
            let mut r = result(
                &finding.rule_id,
                index_of(&finding.rule_id),
                level(finding.severity),
                finding.message.clone(),
            );
            let file = finding.file.as_deref().unwrap_or(&report.location);
            r.locations = Some(vec![location(file, finding.line)]);
            results.push(r);
        }
    }

    let driver = ToolComponent::builder()
        .name("plugin-lint")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(ids.iter().map(|id| descriptor(id)).collect::<Vec<_>>())
        .build();
    let run = Run::builder()
        .tool(Tool::builder().driver(driver).build())
        .results(results)
        .build();
    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    super::to_json(&sarif)
}
