//! Expected body sections per kind.

use super::{finding, RuleInfo, AGENT_COMMAND_SKILL};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

/// A section the body should contain: display name plus the heading words
/// that satisfy it (any one, case-insensitive).
struct Section {
    name: &'static str,
    keywords: &'static [&'static str],
}

#[rustfmt::skip]
const COMMAND_SECTIONS: &[Section] = &[
    Section { name: "Workflow", keywords: &["workflow", "steps", "process"] },
    Section { name: "Examples", keywords: &["example", "usage"] },
];

#[rustfmt::skip]
const SKILL_SECTIONS: &[Section] = &[
    Section { name: "When to Use", keywords: &["when to use"] },
    Section { name: "Examples", keywords: &["example"] },
];

#[rustfmt::skip]
const AGENT_SECTIONS: &[Section] = &[
    Section { name: "Capabilities", keywords: &["capabilit"] },
    Section { name: "Workflow", keywords: &["workflow"] },
    Section { name: "Examples", keywords: &["example"] },
];

fn sections_for(kind: ArtifactKind) -> &'static [Section] {
    match kind {
        ArtifactKind::Command => COMMAND_SECTIONS,
        ArtifactKind::Skill => SKILL_SECTIONS,
        ArtifactKind::Agent => AGENT_SECTIONS,
        ArtifactKind::Hook => &[],
    }
}

/// Names of expected sections with no matching Markdown heading in `body`.
pub fn missing_sections(kind: ArtifactKind, body: &str) -> Vec<&'static str> {
    let headings: Vec<String> = body
        .lines()
        .map(str::trim_start)
        .filter(|l| l.starts_with('#'))
        .map(|l| l.trim_start_matches('#').trim().to_lowercase())
        .collect();

    sections_for(kind)
        .iter()
        .filter(|s| {
            !headings
                .iter()
                .any(|h| s.keywords.iter().any(|k| h.contains(k)))
        })
        .map(|s| s.name)
        .collect()
}

pub(crate) fn check_sections(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let missing = missing_sections(a.kind, a.body());
    if !missing.is_empty() {
        out.push(finding(
            a,
            "content/missing-sections",
            format!("Body is missing sections: {}", missing.join(", ")),
        ));
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![RuleInfo {
        id: "content/missing-sections",
        severity: Severity::Recommendation,
        category: Category::Content,
        kinds: AGENT_COMMAND_SKILL,
        message: "Body lacks the sections expected for its kind",
        remediation: "Commands: Workflow + Examples; skills: When to Use + Examples; agents: Capabilities + Workflow + Examples",
    }]
}
