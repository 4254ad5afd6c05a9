//! Data-driven rule engine.
//!
//! Each artifact kind owns a [`RuleSet`]: an ordered static table of
//! [`Check`]s. The engine runs every check of the artifact's kind, collects
//! their findings, and drops those whose rule id is disabled in the
//! configuration. It never stops early on a severe finding.
//!
//! Every rule id a check can emit is described once in the catalogue
//! returned by [`all_rules`]; findings take their default severity,
//! category and remediation from it.
//!
//! | Module | Category |
//! |--------|----------|
//! | [`naming`] | identity charset, length, verb-first / gerund style |
//! | [`schema`] | required fields, description bounds, version, trigger phrases |
//! | [`model`] | model aliases per kind |
//! | [`tools`] | tool names, `Bash` validation, redundancy |
//! | [`arguments`] | `$ARGUMENTS` / `$1` placeholders vs `argument-hint` |
//! | [`security`] | dangerous shell patterns |
//! | [`hooks`] | hook-set structure |
//! | [`filesystem`] | referenced scripts and resource directories |
//! | [`content`] | expected body sections |

pub mod arguments;
pub mod content;
pub mod filesystem;
pub mod hooks;
pub mod model;
pub mod naming;
pub mod schema;
pub mod security;
pub mod tools;

use std::sync::LazyLock;

use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

/// Signature shared by every check: inspect the artifact, push findings.
pub type CheckFn = fn(&Artifact, &Config, &mut Vec<Finding>);

/// One entry of a kind's check table.
pub struct Check {
    /// Short name of the check, used in debug logs.
    pub id: &'static str,
    pub category: Category,
    pub run: CheckFn,
}

/// The ordered battery of checks for one artifact kind.
pub trait RuleSet: Sync {
    fn kind(&self) -> ArtifactKind;

    fn checks(&self) -> &'static [Check];

    /// Distinct categories covered by this rule set, in table order.
    fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = Vec::new();
        for check in self.checks() {
            if !categories.contains(&check.category) {
                categories.push(check.category);
            }
        }
        categories
    }
}

// ---------------------------------------------------------------------------
// Per-kind check tables
// ---------------------------------------------------------------------------

#[rustfmt::skip]
static AGENT_CHECKS: &[Check] = &[
    Check { id: "identity", category: Category::Naming, run: naming::check_identity },
    Check { id: "name-field", category: Category::Naming, run: naming::check_name_field },
    Check { id: "required-fields", category: Category::Schema, run: schema::check_required },
    Check { id: "description", category: Category::Schema, run: schema::check_description },
    Check { id: "model", category: Category::Model, run: model::check_agent_model },
    Check { id: "tools", category: Category::Tools, run: tools::check_tools },
    Check { id: "shell-blocks", category: Category::Security, run: security::check_body },
    Check { id: "sections", category: Category::Content, run: content::check_sections },
];

#[rustfmt::skip]
static COMMAND_CHECKS: &[Check] = &[
    Check { id: "identity", category: Category::Naming, run: naming::check_identity },
    Check { id: "verb-first", category: Category::Naming, run: naming::check_verb_first },
    Check { id: "required-fields", category: Category::Schema, run: schema::check_required },
    Check { id: "description", category: Category::Schema, run: schema::check_description },
    Check { id: "model", category: Category::Model, run: model::check_command_model },
    Check { id: "tools", category: Category::Tools, run: tools::check_tools },
    Check { id: "tools-field", category: Category::Tools, run: tools::check_deprecated_field },
    Check { id: "arguments", category: Category::Arguments, run: arguments::check_arguments },
    Check { id: "shell-args", category: Category::Arguments, run: arguments::check_shell_arguments },
    Check { id: "shell-blocks", category: Category::Security, run: security::check_body },
    Check { id: "sections", category: Category::Content, run: content::check_sections },
];

#[rustfmt::skip]
static SKILL_CHECKS: &[Check] = &[
    Check { id: "identity", category: Category::Naming, run: naming::check_identity },
    Check { id: "gerund", category: Category::Naming, run: naming::check_gerund },
    Check { id: "name-field", category: Category::Naming, run: naming::check_name_field },
    Check { id: "required-fields", category: Category::Schema, run: schema::check_required },
    Check { id: "description", category: Category::Schema, run: schema::check_description },
    Check { id: "version", category: Category::Schema, run: schema::check_version },
    Check { id: "trigger", category: Category::Schema, run: schema::check_trigger_phrase },
    Check { id: "model", category: Category::Model, run: model::check_skill_model },
    Check { id: "tools", category: Category::Tools, run: tools::check_tools },
    Check { id: "tools-field", category: Category::Tools, run: tools::check_deprecated_field },
    Check { id: "shell-blocks", category: Category::Security, run: security::check_body },
    Check { id: "scripts", category: Category::Filesystem, run: filesystem::check_skill_scripts },
    Check { id: "shebangs", category: Category::Filesystem, run: filesystem::check_skill_shebangs },
    Check { id: "base-dir", category: Category::Filesystem, run: filesystem::check_base_dir },
    Check { id: "sections", category: Category::Content, run: content::check_sections },
];

#[rustfmt::skip]
static HOOK_CHECKS: &[Check] = &[
    Check { id: "structure", category: Category::HookSchema, run: hooks::check_structure },
    Check { id: "commands", category: Category::Security, run: security::check_hook_commands },
    Check { id: "command-hygiene", category: Category::Security, run: security::check_hook_hygiene },
    Check { id: "scripts", category: Category::Filesystem, run: filesystem::check_hook_scripts },
];

struct AgentRules;
struct CommandRules;
struct SkillRules;
struct HookRules;

impl RuleSet for AgentRules {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Agent
    }
    fn checks(&self) -> &'static [Check] {
        AGENT_CHECKS
    }
}

impl RuleSet for CommandRules {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Command
    }
    fn checks(&self) -> &'static [Check] {
        COMMAND_CHECKS
    }
}

impl RuleSet for SkillRules {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Skill
    }
    fn checks(&self) -> &'static [Check] {
        SKILL_CHECKS
    }
}

impl RuleSet for HookRules {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Hook
    }
    fn checks(&self) -> &'static [Check] {
        HOOK_CHECKS
    }
}

/// Returns the rule set registered for `kind`.
pub fn rule_set(kind: ArtifactKind) -> &'static dyn RuleSet {
    match kind {
        ArtifactKind::Agent => &AgentRules,
        ArtifactKind::Command => &CommandRules,
        ArtifactKind::Skill => &SkillRules,
        ArtifactKind::Hook => &HookRules,
    }
}

/// Runs the full battery for the artifact's kind.
///
/// Findings come back in table order; disabled rule ids are filtered out.
pub fn run_checks(artifact: &Artifact, config: &Config) -> Vec<Finding> {
    let mut findings = Vec::new();
    for check in rule_set(artifact.kind).checks() {
        let before = findings.len();
        (check.run)(artifact, config, &mut findings);
        tracing::trace!(
            check = check.id,
            identity = %artifact.identity,
            emitted = findings.len() - before,
            "ran check"
        );
    }
    findings.retain(|f| config.is_rule_enabled(&f.rule_id));
    findings
}

// ---------------------------------------------------------------------------
// Rule catalogue
// ---------------------------------------------------------------------------

/// Metadata for a single rule.
///
/// Used by the `list-rules` and `explain` commands and as the source of a
/// finding's default severity, category and remediation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., `"tools/unknown"`).
    pub id: &'static str,
    pub severity: Severity,
    pub category: Category,
    /// Artifact kinds the rule applies to.
    pub kinds: &'static [ArtifactKind],
    /// Short description of what the rule checks.
    pub message: &'static str,
    /// Guidance on how to fix a violation.
    pub remediation: &'static str,
}

static CATALOGUE: LazyLock<Vec<RuleInfo>> = LazyLock::new(|| {
    let mut rules = Vec::new();
    rules.extend(naming::rules());
    rules.extend(schema::rules());
    rules.extend(model::rules());
    rules.extend(tools::rules());
    rules.extend(arguments::rules());
    rules.extend(security::rules());
    rules.extend(hooks::rules());
    rules.extend(filesystem::rules());
    rules.extend(content::rules());
    rules
});

/// Every rule the engine can emit, grouped by category.
pub fn all_rules() -> &'static [RuleInfo] {
    &CATALOGUE
}

pub fn find_rule(rule_id: &str) -> Option<&'static RuleInfo> {
    CATALOGUE.iter().find(|r| r.id == rule_id)
}

pub(crate) const AGENT_COMMAND_SKILL: &[ArtifactKind] =
    &[ArtifactKind::Agent, ArtifactKind::Command, ArtifactKind::Skill];

/// Builds a finding for `rule_id` located in the artifact's file.
///
/// Severity, category and remediation default to the catalogue entry.
pub(crate) fn finding(artifact: &Artifact, rule_id: &str, message: impl Into<String>) -> Finding {
    let (severity, category, remediation) = match find_rule(rule_id) {
        Some(r) => (r.severity, r.category, Some(r.remediation)),
        None => {
            tracing::warn!(rule_id, "finding emitted for uncatalogued rule");
            (Severity::Info, Category::Content, None)
        }
    };
    let mut f = Finding::new(rule_id, category, severity, message).at(artifact.location.clone(), None);
    if let Some(r) = remediation {
        f = f.with_remediation(r);
    }
    f
}

/// Truncates a line to 120 characters on a char boundary for use as a snippet.
pub(crate) fn snippet(line: &str) -> String {
    let line = line.trim();
    if line.chars().count() > 120 {
        let cut = line
            .char_indices()
            .nth(117)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        format!("{}...", &line[..cut])
    } else {
        line.to_string()
    }
}
