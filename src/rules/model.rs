//! Model field rules.
//!
//! Commands need a full version alias (`claude-haiku-4-5`). Agents take the
//! short aliases. Skills inherit the session model and must not set one.

use super::{finding, RuleInfo};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

pub const SHORT_ALIASES: &[&str] = &["haiku", "sonnet", "opus", "inherit"];

/// Model tiers that have a `claude-<tier>-…` version alias.
pub const TIERS: &[&str] = &["haiku", "sonnet", "opus"];

/// Full version alias a short command alias migrates to.
pub fn version_alias(tier: &str) -> String {
    format!("claude-{tier}-4-5")
}

/// The tier named by a `claude-<tier>-…` identifier, if any.
pub fn tier_of(model: &str) -> Option<&'static str> {
    let rest = model.strip_prefix("claude-")?;
    TIERS
        .iter()
        .copied()
        .find(|tier| rest.split('-').any(|part| part == *tier))
}

fn model_display(a: &Artifact) -> Option<String> {
    let value = a.field("model")?;
    Some(match value.as_str() {
        Some(s) => s.to_string(),
        None => serde_yaml::to_string(value)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    })
}

pub(crate) fn check_command_model(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let Some(model) = model_display(a) else {
        return;
    };
    if SHORT_ALIASES.contains(&model.as_str()) {
        out.push(finding(
            a,
            "model/short-alias",
            format!("Command uses short model alias '{model}'; commands need a version alias"),
        ));
    } else if !model.starts_with("claude-") {
        out.push(finding(
            a,
            "model/unrecognized",
            format!("Unrecognized model '{model}'"),
        ));
    }
}

pub(crate) fn check_agent_model(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let Some(model) = model_display(a) else {
        return;
    };
    if !SHORT_ALIASES.contains(&model.as_str()) && !model.starts_with("claude-") {
        out.push(finding(
            a,
            "model/unrecognized",
            format!("Unrecognized model '{model}'"),
        ));
    }
}

pub(crate) fn check_skill_model(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    if let Some(model) = model_display(a) {
        out.push(finding(
            a,
            "model/not-supported",
            format!("Skills cannot set a model (found '{model}')"),
        ));
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "model/short-alias",
            severity: Severity::Critical,
            category: Category::Model,
            kinds: &[ArtifactKind::Command],
            message: "Commands must not use short model aliases (haiku, sonnet, opus, inherit)",
            remediation: "Use a version alias such as claude-haiku-4-5, or remove 'model' to inherit",
        },
        RuleInfo {
            id: "model/unrecognized",
            severity: Severity::Warning,
            category: Category::Model,
            kinds: &[ArtifactKind::Agent, ArtifactKind::Command],
            message: "Model is neither a claude-* identifier nor a supported alias",
            remediation: "Use claude-<tier>-<version> (commands) or haiku/sonnet/opus/inherit (agents)",
        },
        RuleInfo {
            id: "model/not-supported",
            severity: Severity::Critical,
            category: Category::Model,
            kinds: &[ArtifactKind::Skill],
            message: "Skills must not declare a 'model' field",
            remediation: "Remove the 'model' field; skills run on the session model",
        },
    ]
}
