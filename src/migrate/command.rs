//! Command migrations.

use serde_yaml::Value;

use super::{remove_key, rename_tools_field, MigrationPlan};
use crate::rules::model::{version_alias, TIERS};

pub(crate) fn migrate(plan: &mut MigrationPlan) {
    model_version_alias(plan);
    argument_hint_format(plan);
    rename_tools_field(plan);
}

/// `haiku` → `claude-haiku-4-5`; `inherit` is dropped since omission inherits.
fn model_version_alias(plan: &mut MigrationPlan) {
    let Some(fm) = plan.frontmatter_mut() else {
        return;
    };
    let Some(model) = fm.get("model").and_then(Value::as_str).map(str::to_string) else {
        return;
    };

    if TIERS.contains(&model.as_str()) {
        let alias = version_alias(&model);
        fm.insert(Value::from("model"), Value::from(alias.as_str()));
        plan.automatic(
            "command/model-version-alias",
            format!("Migrated model '{model}' to '{alias}'"),
        );
    } else if model == "inherit" {
        remove_key(fm, "model");
        plan.automatic(
            "command/model-version-alias",
            "Removed model 'inherit' (omitting the field inherits the session model)",
        );
    }
}

fn argument_hint_format(plan: &mut MigrationPlan) {
    let Some(fm) = plan.frontmatter_mut() else {
        return;
    };
    let Some(hint) = fm.get("argument-hint").cloned() else {
        return;
    };

    let text = match hint {
        Value::Sequence(items) => {
            let joined = items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => serde_yaml::to_string(other)
                        .map(|s| s.trim().to_string())
                        .unwrap_or_default(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            fm.insert(Value::from("argument-hint"), Value::from(joined.as_str()));
            plan.automatic(
                "command/argument-hint-format",
                format!("Converted argument-hint list to string '{joined}'"),
            );
            joined
        }
        Value::String(s) => s,
        _ => return,
    };

    if text.trim().is_empty() || text.trim_start().starts_with('[') {
        return;
    }
    let bracketed = format!("[{}]", text.trim());
    if let Some(fm) = plan.frontmatter_mut() {
        fm.insert(Value::from("argument-hint"), Value::from(bracketed.as_str()));
    }
    plan.automatic(
        "command/argument-hint-format",
        format!("Added brackets to argument-hint: '{text}' -> '{bracketed}'"),
    );
}
