//! Command argument placeholder rules.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

use super::{finding, security, snippet, RuleInfo};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(ARGUMENTS\b|[1-9])").unwrap());

static RE_ARGS_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^##\s+(arguments|parameters)\b").unwrap());

static RE_SHELL_VALIDATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(validate|check|if\s+\[|test\s+)").unwrap());

/// `argument-hint` as a single string; list hints are joined with spaces.
pub fn argument_hint(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Value::Null => None,
        other => serde_yaml::to_string(other)
            .ok()
            .map(|s| s.trim().to_string()),
    }
}

/// 1-based body-relative line of the first placeholder, if any.
fn first_placeholder_line(body: &str) -> Option<usize> {
    body.lines()
        .position(|line| RE_PLACEHOLDER.is_match(line))
        .map(|i| i + 1)
}

pub(crate) fn check_arguments(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let body = a.body();
    let placeholder_line = first_placeholder_line(body).map(|l| a.body_line + l - 1);
    let hint = a.field("argument-hint").and_then(argument_hint);

    match (&hint, placeholder_line) {
        (None, Some(line)) => out.push(
            finding(
                a,
                "args/missing-hint",
                "Body uses argument placeholders but no 'argument-hint' is declared",
            )
            .with_line(line),
        ),
        (Some(_), None) => out.push(finding(
            a,
            "args/unused-hint",
            "'argument-hint' declared but the body never uses $ARGUMENTS or $1..$9",
        )),
        _ => {}
    }

    if let Some(hint) = &hint {
        if !hint.trim_start().starts_with('[') {
            out.push(finding(
                a,
                "args/hint-not-bracketed",
                format!("argument-hint '{hint}' should use [bracketed] placeholders"),
            ));
        }
    }

    if let Some(line) = placeholder_line {
        if !RE_ARGS_SECTION.is_match(body) {
            out.push(
                finding(
                    a,
                    "args/undocumented",
                    "Arguments are used but there is no '## Arguments' section",
                )
                .with_line(line),
            );
        }
    }
}

/// Shell blocks that expand `$1`..`$9` or `$ARGUMENTS` with no visible
/// validation anywhere in the same block.
pub(crate) fn check_shell_arguments(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    for block in security::shell_blocks(a.body()) {
        let Some(&(rel, line)) = block.iter().find(|(_, l)| RE_PLACEHOLDER.is_match(l)) else {
            continue;
        };
        if block.iter().any(|(_, l)| RE_SHELL_VALIDATION.is_match(l)) {
            continue;
        }
        out.push(
            finding(
                a,
                "args/unvalidated-shell-args",
                "Shell block uses $1..$9 or $ARGUMENTS without visible validation",
            )
            .with_line(a.body_line + rel - 1)
            .with_snippet(snippet(line)),
        );
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "args/missing-hint",
            severity: Severity::Warning,
            category: Category::Arguments,
            kinds: &[ArtifactKind::Command],
            message: "Placeholders used without an 'argument-hint'",
            remediation: "Add 'argument-hint: [arg]' describing the expected arguments",
        },
        RuleInfo {
            id: "args/hint-not-bracketed",
            severity: Severity::Warning,
            category: Category::Arguments,
            kinds: &[ArtifactKind::Command],
            message: "'argument-hint' should start with '['",
            remediation: "Wrap each argument in brackets, e.g. '[file] [mode]'",
        },
        RuleInfo {
            id: "args/undocumented",
            severity: Severity::Recommendation,
            category: Category::Arguments,
            kinds: &[ArtifactKind::Command],
            message: "Placeholders used without an Arguments/Parameters section",
            remediation: "Add a '## Arguments' section describing each argument",
        },
        RuleInfo {
            id: "args/unused-hint",
            severity: Severity::Recommendation,
            category: Category::Arguments,
            kinds: &[ArtifactKind::Command],
            message: "'argument-hint' declared but never used",
            remediation: "Reference $ARGUMENTS or $1..$9 in the body, or drop the hint",
        },
        RuleInfo {
            id: "args/unvalidated-shell-args",
            severity: Severity::Warning,
            category: Category::Arguments,
            kinds: &[ArtifactKind::Command],
            message: "Shell block expands arguments without validating them",
            remediation: "Check the argument first, e.g. if [[ -z \"$1\" ]]; then echo 'usage: ...'; exit 1; fi",
        },
    ]
}
