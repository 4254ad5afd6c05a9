//! Agent migrations.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use super::{insert_after, MigrationPlan};
use crate::artifact::{base_tool_name, split_tool_list, tool_names};
use crate::rules::content::missing_sections;
use crate::rules::model::tier_of;
use crate::rules::tools::mentions_validation;

pub const DESCRIPTION_PLACEHOLDER: &str = "Agent description needed";

const DESCRIPTION_MAX: usize = 1024;
const NAME_MAX: usize = 64;

static RE_YOU_ARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)You are (.*?)(?:[.!]|\n\n)").unwrap());

static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

static RE_NAME_INVALID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9-]+").unwrap());

static RE_DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

pub(crate) fn migrate(plan: &mut MigrationPlan) {
    model_short_alias(plan);
    extract_description(plan);
    drop_redundant_write(plan);
    bash_validation(plan);
    missing_sections_advice(plan);
}

/// Derives a description from an agent body.
///
/// Prefers the "You are ..." sentence, then the first non-heading paragraph
/// longer than 20 characters, else a placeholder. Capped at 1024 characters.
pub fn description_from_body(body: &str) -> String {
    if let Some(caps) = RE_YOU_ARE.captures(body) {
        let text = caps.get(1).map_or("", |m| m.as_str()).trim();
        if !text.is_empty() {
            return truncate(&collapse_whitespace(text), DESCRIPTION_MAX);
        }
    }
    body.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.starts_with('#') && !p.starts_with("```"))
        .find(|p| p.chars().count() > 20)
        .map(|p| truncate(&collapse_whitespace(p), DESCRIPTION_MAX))
        .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string())
}

/// Kebab-case name from the first level-one heading.
pub fn name_from_heading(body: &str) -> Option<String> {
    let heading = RE_HEADING.captures(body)?.get(1)?.as_str().trim().to_lowercase();
    let name = RE_NAME_INVALID.replace_all(&heading, "-");
    let name = RE_DASHES.replace_all(&name, "-");
    let name = truncate(name.trim_matches('-'), NAME_MAX);
    let name = name.trim_end_matches('-').to_string();
    (!name.is_empty()).then_some(name)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// `agent/add-frontmatter`: synthesises metadata for agents written before
/// frontmatter existed. The whole file stays as the body.
pub(crate) fn add_frontmatter(plan: &mut MigrationPlan) {
    let body = plan.body.clone().unwrap_or_default();
    let name = name_from_heading(&body).unwrap_or_else(|| plan.original.identity.clone());
    let description = description_from_body(&body);

    let mut fm = Mapping::new();
    fm.insert(Value::from("name"), Value::from(name.as_str()));
    fm.insert(Value::from("description"), Value::from(description.as_str()));
    fm.insert(Value::from("tools"), Value::from("Read, Grep, Glob"));
    fm.insert(Value::from("model"), Value::from("sonnet"));
    if let Some(slot) = plan.frontmatter_mut() {
        *slot = fm;
    }
    plan.automatic(
        "agent/add-frontmatter",
        format!("Added frontmatter (name '{name}', tools 'Read, Grep, Glob', model 'sonnet')"),
    );
}

/// `claude-sonnet-4-5` → `sonnet`.
fn model_short_alias(plan: &mut MigrationPlan) {
    let Some(fm) = plan.frontmatter_mut() else {
        return;
    };
    let Some(model) = fm.get("model").and_then(Value::as_str).map(str::to_string) else {
        return;
    };
    let Some(tier) = tier_of(&model) else {
        return;
    };
    fm.insert(Value::from("model"), Value::from(tier));
    plan.automatic(
        "agent/model-short-alias",
        format!("Migrated model '{model}' to short alias '{tier}'"),
    );
}

fn extract_description(plan: &mut MigrationPlan) {
    let blank = match plan.frontmatter_mut().and_then(|fm| fm.get("description")) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if !blank {
        return;
    }
    let description = description_from_body(plan.body.as_deref().unwrap_or_default());
    if let Some(fm) = plan.frontmatter_mut() {
        insert_after(fm, "name", "description", Value::from(description.as_str()));
    }
    let preview: String = description.chars().take(50).collect();
    plan.automatic(
        "agent/extract-description",
        format!("Extracted description from body: '{preview}'"),
    );
}

/// Removes `Write` when `Edit` is granted, keeping string or list shape.
fn drop_redundant_write(plan: &mut MigrationPlan) {
    let Some(fm) = plan.frontmatter_mut() else {
        return;
    };
    let Some(tools) = fm.get("tools").cloned() else {
        return;
    };
    let names = tool_names(&tools);
    if !(names.iter().any(|t| t == "Write") && names.iter().any(|t| t == "Edit")) {
        return;
    }

    let updated = match &tools {
        Value::String(s) => Value::from(
            split_tool_list(s)
                .into_iter()
                .filter(|t| base_tool_name(t) != "Write")
                .collect::<Vec<_>>()
                .join(", ")
                .as_str(),
        ),
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .filter(|v| v.as_str().map(base_tool_name) != Some("Write"))
                .cloned()
                .collect(),
        ),
        _ => return,
    };
    if updated == tools {
        return;
    }
    fm.insert(Value::from("tools"), updated);
    plan.automatic(
        "agent/drop-redundant-write",
        "Removed 'Write' from tools (Edit is granted)",
    );
}

fn bash_validation(plan: &mut MigrationPlan) {
    let has_bash = plan
        .frontmatter_mut()
        .and_then(|fm| fm.get("tools"))
        .map(tool_names)
        .is_some_and(|names| names.iter().any(|t| t == "Bash"));
    if has_bash && !mentions_validation(plan.body.as_deref().unwrap_or_default()) {
        plan.advisory(
            "agent/bash-validation",
            "Bash is granted but the body never mentions input validation; document it or drop Bash",
        );
    }
}

fn missing_sections_advice(plan: &mut MigrationPlan) {
    let missing = missing_sections(plan.original.kind, plan.body.as_deref().unwrap_or_default());
    if !missing.is_empty() {
        plan.advisory(
            "agent/missing-sections",
            format!("Consider adding sections: {}", missing.join(", ")),
        );
    }
}
