//! Tool permission rules.

use super::{finding, RuleInfo, AGENT_COMMAND_SKILL};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

pub const KNOWN_TOOLS: &[&str] = &[
    "Read",
    "Write",
    "Edit",
    "Grep",
    "Glob",
    "Bash",
    "WebFetch",
    "WebSearch",
    "NotebookEdit",
    "Task",
    "TodoWrite",
    "BashOutput",
    "KillShell",
];

/// `true` when the body mentions input validation or sanitization.
pub fn mentions_validation(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("validation") || lower.contains("sanitize")
}

pub(crate) fn check_tools(a: &Artifact, config: &Config, out: &mut Vec<Finding>) {
    let tools = a.tools();
    if tools.is_empty() {
        return;
    }

    for tool in &tools {
        if !KNOWN_TOOLS.contains(&tool.as_str()) {
            out.push(finding(a, "tools/unknown", format!("Unknown tool '{tool}'")));
        }
    }

    let has = |name: &str| tools.iter().any(|t| t == name);

    if has("Bash") && !mentions_validation(a.body()) {
        out.push(finding(
            a,
            "tools/bash-without-validation",
            "Bash access granted but the body never mentions input validation",
        ));
    }
    if tools.len() > config.limits.max_tools {
        out.push(finding(
            a,
            "tools/too-many",
            format!(
                "{} tools granted (recommended max {})",
                tools.len(),
                config.limits.max_tools
            ),
        ));
    }
    if has("Write") && has("Edit") {
        out.push(finding(
            a,
            "tools/redundant-write",
            "Both Write and Edit granted; Edit alone covers most modifications",
        ));
    }
}

pub(crate) fn check_deprecated_field(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    if a.has_field("tools") {
        out.push(finding(
            a,
            "tools/deprecated-field",
            format!("Legacy 'tools' field used in a {}", a.kind),
        ));
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "tools/unknown",
            severity: Severity::Warning,
            category: Category::Tools,
            kinds: AGENT_COMMAND_SKILL,
            message: "Tool is not one of the 13 known tools",
            remediation: "Fix the tool name's spelling or remove it",
        },
        RuleInfo {
            id: "tools/bash-without-validation",
            severity: Severity::Critical,
            category: Category::Tools,
            kinds: AGENT_COMMAND_SKILL,
            message: "Bash granted without any input validation guidance in the body",
            remediation: "Document how inputs are validated/sanitized before shell use, or drop Bash",
        },
        RuleInfo {
            id: "tools/too-many",
            severity: Severity::Recommendation,
            category: Category::Tools,
            kinds: AGENT_COMMAND_SKILL,
            message: "More tools granted than the recommended maximum",
            remediation: "Grant only the tools the artifact actually needs",
        },
        RuleInfo {
            id: "tools/redundant-write",
            severity: Severity::Recommendation,
            category: Category::Tools,
            kinds: AGENT_COMMAND_SKILL,
            message: "Write granted alongside Edit",
            remediation: "Drop Write unless the artifact creates new files",
        },
        RuleInfo {
            id: "tools/deprecated-field",
            severity: Severity::Warning,
            category: Category::Tools,
            kinds: &[ArtifactKind::Command, ArtifactKind::Skill],
            message: "Legacy 'tools' field; commands and skills use 'allowed-tools'",
            remediation: "Rename 'tools' to 'allowed-tools' (plugin-lint migrate does this)",
        },
    ]
}
