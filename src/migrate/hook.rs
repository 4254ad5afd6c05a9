//! Hook-set migrations.
//!
//! Rules run in a fixed order: drop unknown events, drop empty lifecycle
//! matchers, default missing tool matchers to `*`, infer item types, then
//! advise on script paths.

use serde_json::{Map, Value};

use super::MigrationPlan;
use crate::rules::hooks::{
    is_rooted_script, is_tool_event, is_valid_event, script_references, ITEM_TYPES,
    PLUGIN_ROOT_VAR,
};

pub(crate) fn migrate(plan: &mut MigrationPlan) {
    let has_events = plan
        .hooks_mut()
        .and_then(|root| root.get("hooks"))
        .is_some_and(Value::is_object);
    if !has_events {
        plan.unrepairable(
            "hook/remove-invalid-events",
            "No top-level 'hooks' object; the file must be restructured by hand",
        );
        return;
    }

    remove_invalid_events(plan);
    remove_empty_matchers(plan);
    add_default_matcher(plan);
    infer_item_type(plan);
    plugin_root_paths(plan);
}

fn events_mut(plan: &mut MigrationPlan) -> Option<&mut Map<String, Value>> {
    plan.hooks_mut()?.get_mut("hooks")?.as_object_mut()
}

/// Groups of every valid event whose value is an array, as
/// `(event, index, group)`.
fn for_each_group(
    plan: &mut MigrationPlan,
    mut f: impl FnMut(&str, usize, &mut Map<String, Value>, &mut Vec<Note>),
) {
    let mut notes = Vec::new();
    if let Some(events) = events_mut(plan) {
        for (event, groups) in events.iter_mut() {
            let Some(groups) = groups.as_array_mut() else {
                continue;
            };
            for (g, group) in groups.iter_mut().enumerate() {
                if let Some(group) = group.as_object_mut() {
                    f(event.as_str(), g, group, &mut notes);
                }
            }
        }
    }
    for note in notes {
        match note {
            Note::Automatic(id, text) => plan.automatic(id, text),
            Note::Advisory(id, text) => plan.advisory(id, text),
            Note::Unrepairable(id, text) => plan.unrepairable(id, text),
        }
    }
}

/// Change log entries collected while the hook tree is mutably borrowed.
enum Note {
    Automatic(&'static str, String),
    Advisory(&'static str, String),
    Unrepairable(&'static str, String),
}

fn remove_invalid_events(plan: &mut MigrationPlan) {
    let Some(events) = events_mut(plan) else {
        return;
    };
    let invalid: Vec<String> = events
        .keys()
        .filter(|k| !is_valid_event(k))
        .cloned()
        .collect();
    for event in &invalid {
        events.shift_remove(event);
    }
    for event in invalid {
        plan.automatic(
            "hook/remove-invalid-events",
            format!("Removed invalid event '{event}'"),
        );
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn remove_empty_matchers(plan: &mut MigrationPlan) {
    for_each_group(plan, |event, g, group, notes| {
        if is_tool_event(event) {
            return;
        }
        let matcher = group.get("matcher").map(|m| (is_blank(m), m.to_string()));
        match matcher {
            Some((true, _)) => {
                group.shift_remove("matcher");
                notes.push(Note::Automatic(
                    "hook/remove-empty-matchers",
                    format!("Removed empty matcher from {event}[{g}]"),
                ));
            }
            Some((false, m)) => notes.push(Note::Advisory(
                "hook/remove-empty-matchers",
                format!(
                    "{event}[{g}] has matcher {m}; lifecycle events ignore matchers, consider removing it"
                ),
            )),
            None => {}
        }
    });
}

/// Tool-event groups whose matcher is missing, blank or not a string get `*`.
fn add_default_matcher(plan: &mut MigrationPlan) {
    for_each_group(plan, |event, g, group, notes| {
        let usable = group
            .get("matcher")
            .and_then(Value::as_str)
            .is_some_and(|m| !m.trim().is_empty());
        if !is_tool_event(event) || usable {
            return;
        }
        let replaced = group
            .get("matcher")
            .filter(|m| !is_blank(m))
            .map(Value::to_string);
        let rest = std::mem::take(group);
        group.insert("matcher".to_string(), Value::from("*"));
        group.extend(rest.into_iter().filter(|(k, _)| k != "matcher"));
        let description = match replaced {
            Some(old) => format!("Replaced non-string matcher {old} with '*' in {event}[{g}]"),
            None => format!("Added default matcher '*' to {event}[{g}]"),
        };
        notes.push(Note::Automatic("hook/add-default-matcher", description));
    });
}

fn infer_item_type(plan: &mut MigrationPlan) {
    for_each_group(plan, |event, g, group, notes| {
        let Some(items) = group.get_mut("hooks").and_then(Value::as_array_mut) else {
            notes.push(Note::Unrepairable(
                "hook/infer-item-type",
                format!("{event}[{g}] has no 'hooks' array"),
            ));
            return;
        };
        for (i, item) in items.iter_mut().enumerate() {
            let Some(item) = item.as_object_mut() else {
                notes.push(Note::Unrepairable(
                    "hook/infer-item-type",
                    format!("{event}[{g}].hooks[{i}] is not an object"),
                ));
                continue;
            };
            let at = format!("{event}[{g}].hooks[{i}]");
            let has = |field: &str| item.get(field).is_some_and(|v| !is_blank(v));
            let current = item.get("type").and_then(Value::as_str);

            if let Some(kind) = current.filter(|t| ITEM_TYPES.contains(t)) {
                if !has(kind) {
                    notes.push(Note::Unrepairable(
                        "hook/infer-item-type",
                        format!("{at}: '{kind}' hook has no '{kind}' value"),
                    ));
                }
                continue;
            }

            let inferred = match (has("command"), has("prompt")) {
                (true, false) => "command",
                (false, true) => "prompt",
                _ => {
                    notes.push(Note::Unrepairable(
                        "hook/infer-item-type",
                        format!("{at}: cannot infer type (needs exactly one of 'command' or 'prompt')"),
                    ));
                    continue;
                }
            };
            let old = item
                .get("type")
                .map_or_else(|| "<missing>".to_string(), Value::to_string);
            item.insert("type".to_string(), Value::from(inferred));
            notes.push(Note::Automatic(
                "hook/infer-item-type",
                format!("{at}: set type {old} -> \"{inferred}\""),
            ));
        }
    });
}

fn plugin_root_paths(plan: &mut MigrationPlan) {
    for_each_group(plan, |event, g, group, notes| {
        let Some(items) = group.get("hooks").and_then(Value::as_array) else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            let Some(command) = item.get("command").and_then(Value::as_str) else {
                continue;
            };
            for script in script_references(command) {
                if !is_rooted_script(script) {
                    notes.push(Note::Advisory(
                        "hook/plugin-root-paths",
                        format!(
                            "{event}[{g}].hooks[{i}]: use '{PLUGIN_ROOT_VAR}/{}' instead of '{script}'",
                            script.trim_start_matches("./")
                        ),
                    ));
                }
            }
        }
    });
}
