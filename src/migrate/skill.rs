//! Skill migrations.

use serde_yaml::Value;

use super::{remove_key, rename_tools_field, MigrationPlan};
use crate::rules::naming::is_gerund_name;
use crate::rules::schema::has_trigger_phrase;

pub(crate) fn migrate(plan: &mut MigrationPlan) {
    remove_model(plan);
    rename_tools_field(plan);
    gerund_name(plan);
    trigger_phrase(plan);
}

fn remove_model(plan: &mut MigrationPlan) {
    let Some(fm) = plan.frontmatter_mut() else {
        return;
    };
    if let Some(old) = remove_key(fm, "model") {
        let shown = old.as_str().map_or_else(
            || serde_yaml::to_string(&old).unwrap_or_default().trim().to_string(),
            str::to_string,
        );
        plan.automatic(
            "skill/remove-model",
            format!("Removed model '{shown}' (skills use the session model)"),
        );
    }
}

fn gerund_name(plan: &mut MigrationPlan) {
    let identity = plan.original.identity.clone();
    if !is_gerund_name(&identity) {
        plan.advisory(
            "skill/gerund-name",
            format!(
                "Consider a gerund-form name for '{identity}' (e.g. 'building-{identity}'); rename the directory by hand"
            ),
        );
    }
}

fn trigger_phrase(plan: &mut MigrationPlan) {
    let description = plan
        .original
        .field("description")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !description.trim().is_empty() && !has_trigger_phrase(description) {
        plan.advisory(
            "skill/trigger-phrase",
            "Add a trigger phrase such as 'Use when ...' to the description",
        );
    }
}
