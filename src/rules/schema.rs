//! Required-field and description rules.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

use super::{finding, RuleInfo, AGENT_COMMAND_SKILL};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

static RE_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+").unwrap());

/// Phrases that tell the host when a skill should be auto-invoked.
pub const TRIGGER_PHRASES: &[&str] = &[
    "use when",
    "when the user",
    "when user",
    "whenever",
    "auto-invokes when",
    "automatically activated",
    "invoke when",
];

pub fn has_trigger_phrase(description: &str) -> bool {
    let lower = description.to_lowercase();
    TRIGGER_PHRASES.iter().any(|p| lower.contains(p))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub(crate) fn check_required(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    if matches!(a.kind, ArtifactKind::Agent | ArtifactKind::Skill)
        && a.field("name").is_none_or(is_blank)
    {
        out.push(finding(
            a,
            "schema/missing-name",
            "Missing required field 'name'",
        ));
    }
    if a.field("description").is_none_or(is_blank) {
        out.push(finding(
            a,
            "schema/missing-description",
            "Missing required field 'description'",
        ));
    }
}

pub(crate) fn check_description(a: &Artifact, config: &Config, out: &mut Vec<Finding>) {
    let Some(value) = a.field("description").filter(|v| !is_blank(v)) else {
        return;
    };
    let Some(description) = value.as_str() else {
        out.push(finding(
            a,
            "schema/description-not-string",
            "Field 'description' must be a string",
        ));
        return;
    };
    let Some((min, max)) = config.limits.description_bounds(a.kind) else {
        return;
    };

    let len = description.trim().chars().count();
    if len < min {
        out.push(finding(
            a,
            "schema/description-too-short",
            format!("Description is {len} characters (min {min})"),
        ));
    }
    if len > max {
        let severity = match a.kind {
            ArtifactKind::Skill => Severity::Critical,
            _ => Severity::Warning,
        };
        out.push(
            finding(
                a,
                "schema/description-too-long",
                format!("Description is {len} characters (max {max})"),
            )
            .with_severity(severity),
        );
    }
}

pub(crate) fn check_version(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let Some(value) = a.field("version") else {
        return;
    };
    let valid = value.as_str().is_some_and(|v| RE_VERSION.is_match(v.trim()));
    if !valid {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => serde_yaml::to_string(other)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        };
        out.push(finding(
            a,
            "schema/invalid-version",
            format!("Version '{shown}' is not semantic (expected N.N.N)"),
        ));
    }
}

pub(crate) fn check_trigger_phrase(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let Some(description) = a.field_str("description") else {
        return;
    };
    if description.trim().is_empty() || has_trigger_phrase(description) {
        return;
    }
    out.push(finding(
        a,
        "schema/trigger-phrase",
        "Description does not say when the skill should be used",
    ));
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "schema/missing-name",
            severity: Severity::Critical,
            category: Category::Schema,
            kinds: &[ArtifactKind::Agent, ArtifactKind::Skill],
            message: "Frontmatter must declare a non-empty 'name'",
            remediation: "Add 'name: <file-or-directory-name>' to the frontmatter",
        },
        RuleInfo {
            id: "schema/missing-description",
            severity: Severity::Critical,
            category: Category::Schema,
            kinds: AGENT_COMMAND_SKILL,
            message: "Frontmatter must declare a non-empty 'description'",
            remediation: "Add a 'description' explaining what the artifact does",
        },
        RuleInfo {
            id: "schema/description-not-string",
            severity: Severity::Critical,
            category: Category::Schema,
            kinds: AGENT_COMMAND_SKILL,
            message: "'description' must be a string",
            remediation: "Quote the description or rewrite it as plain text",
        },
        RuleInfo {
            id: "schema/description-too-short",
            severity: Severity::Warning,
            category: Category::Schema,
            kinds: AGENT_COMMAND_SKILL,
            message: "Description shorter than the kind's minimum (command 10, agent 10, skill 30)",
            remediation: "Expand the description so the host can tell what the artifact does",
        },
        RuleInfo {
            id: "schema/description-too-long",
            severity: Severity::Warning,
            category: Category::Schema,
            kinds: AGENT_COMMAND_SKILL,
            message: "Description longer than the kind's maximum (command 200, agent/skill 1024; critical for skills)",
            remediation: "Move detail into the body and keep the description to a summary",
        },
        RuleInfo {
            id: "schema/invalid-version",
            severity: Severity::Warning,
            category: Category::Schema,
            kinds: &[ArtifactKind::Skill],
            message: "'version' must be a semantic version string (N.N.N)",
            remediation: "Use a quoted semantic version, e.g. version: \"1.0.0\"",
        },
        RuleInfo {
            id: "schema/trigger-phrase",
            severity: Severity::Warning,
            category: Category::Schema,
            kinds: &[ArtifactKind::Skill],
            message: "Skill descriptions should state when the skill applies",
            remediation: "Add a trigger such as 'Use when the user asks to ...'",
        },
    ]
}
