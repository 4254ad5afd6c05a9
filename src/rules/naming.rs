//! Identity and `name` field rules.
//!
//! Identities are never repaired automatically: renaming a file or directory
//! changes how the host resolves the artifact.

use std::sync::LazyLock;

use regex::Regex;

use super::{finding, RuleInfo, AGENT_COMMAND_SKILL};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

static RE_IDENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Leading verbs that make a command name read as an action.
pub const COMMAND_VERBS: &[&str] = &[
    "add", "build", "check", "clean", "commit", "create", "delete", "deploy", "generate", "get",
    "install", "list", "make", "new", "push", "remove", "review", "run", "search", "show", "test",
    "update", "validate",
];

const GERUND_WORDS: &[&str] = &["analyzing", "building", "creating"];

/// Returns `true` when a skill name already reads as an activity.
pub fn is_gerund_name(name: &str) -> bool {
    name.ends_with("ing")
        || name.split('-').any(|segment| segment.ends_with("ing"))
        || GERUND_WORDS.iter().any(|w| name.contains(w))
}

pub fn starts_with_verb(name: &str) -> bool {
    COMMAND_VERBS.iter().any(|verb| name.starts_with(verb))
}

pub(crate) fn check_identity(a: &Artifact, config: &Config, out: &mut Vec<Finding>) {
    let id = &a.identity;
    if !RE_IDENTITY.is_match(id) {
        out.push(finding(
            a,
            "naming/invalid-charset",
            format!("Name '{id}' must contain only lowercase letters, digits and hyphens"),
        ));
    }
    if id.contains('_') {
        out.push(finding(
            a,
            "naming/underscore",
            format!("Name '{id}' contains underscores"),
        ));
    }
    let len = id.chars().count();
    if len > config.limits.identity_max {
        out.push(finding(
            a,
            "naming/too-long",
            format!(
                "Name is {len} characters (max {})",
                config.limits.identity_max
            ),
        ));
    }
}

pub(crate) fn check_verb_first(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    if !starts_with_verb(&a.identity) {
        out.push(finding(
            a,
            "naming/verb-first",
            format!("Command name '{}' does not start with an action verb", a.identity),
        ));
    }
}

pub(crate) fn check_gerund(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    if !is_gerund_name(&a.identity) {
        out.push(finding(
            a,
            "naming/gerund-form",
            format!("Skill name '{}' is not in gerund form", a.identity),
        ));
    }
}

pub(crate) fn check_name_field(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    // A missing name is reported by the schema rules.
    let Some(name) = a.field_str("name") else {
        return;
    };
    if name != a.identity {
        let container = match a.kind {
            ArtifactKind::Skill => "directory",
            _ => "file",
        };
        out.push(finding(
            a,
            "naming/name-mismatch",
            format!(
                "Frontmatter name '{name}' does not match {container} name '{}'",
                a.identity
            ),
        ));
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "naming/invalid-charset",
            severity: Severity::Critical,
            category: Category::Naming,
            kinds: AGENT_COMMAND_SKILL,
            message: "Name must match ^[a-z0-9-]+$ (lowercase letters, digits, hyphens)",
            remediation: "Rename the file or directory to lowercase-kebab-case",
        },
        RuleInfo {
            id: "naming/underscore",
            severity: Severity::Critical,
            category: Category::Naming,
            kinds: AGENT_COMMAND_SKILL,
            message: "Name must not contain underscores",
            remediation: "Replace underscores with hyphens in the file or directory name",
        },
        RuleInfo {
            id: "naming/too-long",
            severity: Severity::Critical,
            category: Category::Naming,
            kinds: AGENT_COMMAND_SKILL,
            message: "Name must be at most 64 characters",
            remediation: "Shorten the name while keeping it descriptive",
        },
        RuleInfo {
            id: "naming/verb-first",
            severity: Severity::Recommendation,
            category: Category::Naming,
            kinds: &[ArtifactKind::Command],
            message: "Command names should start with an action verb (create, run, review, ...)",
            remediation: "Rename the command so it starts with a verb, e.g. 'review-pr'",
        },
        RuleInfo {
            id: "naming/gerund-form",
            severity: Severity::Recommendation,
            category: Category::Naming,
            kinds: &[ArtifactKind::Skill],
            message: "Skill names should use gerund form (building-x, analyzing-y)",
            remediation: "Rename the skill directory, e.g. 'pdf' -> 'processing-pdfs'",
        },
        RuleInfo {
            id: "naming/name-mismatch",
            severity: Severity::Warning,
            category: Category::Naming,
            kinds: &[ArtifactKind::Agent, ArtifactKind::Skill],
            message: "Frontmatter 'name' must equal the file or directory name",
            remediation: "Make the 'name' field match the file or directory name",
        },
    ]
}
