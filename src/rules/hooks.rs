//! Hook-set structure rules.
//!
//! A hook-set maps event names to ordered lists of groups:
//!
//! ```json
//! { "hooks": { "PreToolUse": [ { "matcher": "Write|Edit",
//!                                 "hooks": [ { "type": "command", "command": "..." } ] } ] } }
//! ```
//!
//! Tool events need a `matcher`; lifecycle events must not carry one.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{finding, RuleInfo};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

pub const TOOL_EVENTS: &[&str] = &["PreToolUse", "PostToolUse"];

pub const LIFECYCLE_EVENTS: &[&str] = &[
    "UserPromptSubmit",
    "Stop",
    "SessionStart",
    "Notification",
    "SubagentStop",
    "PreCompact",
];

pub const ITEM_TYPES: &[&str] = &["command", "prompt"];

/// Placeholder the host expands to the plugin's root directory.
pub const PLUGIN_ROOT_VAR: &str = "${CLAUDE_PLUGIN_ROOT}";

static RE_SCRIPT_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:bash|sh)\s+["']?([^\s"';&|]+)"#).unwrap());

pub fn is_tool_event(event: &str) -> bool {
    TOOL_EVENTS.contains(&event)
}

pub fn is_valid_event(event: &str) -> bool {
    is_tool_event(event) || LIFECYCLE_EVENTS.contains(&event)
}

/// Script paths a hook command runs through `bash <path>` or `sh <path>`.
pub fn script_references(command: &str) -> Vec<&str> {
    RE_SCRIPT_REF
        .captures_iter(command)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|p| !p.starts_with('-'))
        .collect()
}

/// `true` for script paths the host resolves independently of the working
/// directory.
pub fn is_rooted_script(path: &str) -> bool {
    path.starts_with(PLUGIN_ROOT_VAR)
        || path.starts_with("$CLAUDE_PLUGIN_ROOT")
        || path.starts_with('/')
}

/// One entry of a group's `hooks` list.
#[derive(Debug, Clone, Copy)]
pub struct HookItem<'a> {
    pub event: &'a str,
    pub group: usize,
    pub index: usize,
    pub value: &'a Value,
}

impl<'a> HookItem<'a> {
    pub fn item_type(&self) -> Option<&'a str> {
        self.value.get("type").and_then(Value::as_str)
    }

    pub fn command(&self) -> Option<&'a str> {
        self.value.get("command").and_then(Value::as_str)
    }

    pub fn prompt(&self) -> Option<&'a str> {
        self.value.get("prompt").and_then(Value::as_str)
    }

    /// `hooks.<Event>[g].hooks[i]`, used in messages.
    pub fn path(&self) -> String {
        format!("hooks.{}[{}].hooks[{}]", self.event, self.group, self.index)
    }
}

/// Every hook item reachable through well-formed events and groups.
pub fn hook_items(root: &Value) -> Vec<HookItem<'_>> {
    let Some(events) = root.get("hooks").and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut items = Vec::new();
    for (event, groups) in events {
        let Some(groups) = groups.as_array() else {
            continue;
        };
        for (g, group) in groups.iter().enumerate() {
            let Some(list) = group.get("hooks").and_then(Value::as_array) else {
                continue;
            };
            for (i, value) in list.iter().enumerate() {
                items.push(HookItem {
                    event: event.as_str(),
                    group: g,
                    index: i,
                    value,
                });
            }
        }
    }
    items
}

pub(crate) fn check_structure(a: &Artifact, config: &Config, out: &mut Vec<Finding>) {
    let Some(root) = a.hooks() else {
        return;
    };
    let Some(events) = root.get("hooks").and_then(Value::as_object) else {
        out.push(finding(
            a,
            "hooks/missing-hooks-object",
            "Hook file has no top-level 'hooks' object",
        ));
        return;
    };

    for (event, groups) in events {
        if !is_valid_event(event) {
            out.push(finding(
                a,
                "hooks/invalid-event",
                format!("Unknown hook event '{event}'"),
            ));
            continue;
        }
        let Some(groups) = groups.as_array() else {
            out.push(finding(
                a,
                "hooks/event-not-array",
                format!("hooks.{event} must be an array of hook groups"),
            ));
            continue;
        };
        for (g, group) in groups.iter().enumerate() {
            check_matcher(a, event, g, group, out);
            check_group_items(a, config, event, g, group, out);
        }
    }
}

fn check_matcher(a: &Artifact, event: &str, g: usize, group: &Value, out: &mut Vec<Finding>) {
    let at = format!("hooks.{event}[{g}]");
    let matcher = group.get("matcher");
    let text = matcher.and_then(Value::as_str).map(str::trim);

    if !is_tool_event(event) {
        match text {
            Some("") => out.push(finding(
                a,
                "hooks/empty-matcher",
                format!("{at}: lifecycle event has an empty 'matcher' key"),
            )),
            Some(m) => out.push(finding(
                a,
                "hooks/unexpected-matcher",
                format!("{at}: lifecycle event ignores matcher '{m}'"),
            )),
            None if matcher.is_some_and(|m| !m.is_null()) => out.push(finding(
                a,
                "hooks/unexpected-matcher",
                format!("{at}: lifecycle event has a non-string 'matcher'"),
            )),
            None => {}
        }
        return;
    }

    let Some(m) = text.filter(|m| !m.is_empty()) else {
        out.push(finding(
            a,
            "hooks/missing-matcher",
            format!("{at}: {event} requires a non-empty 'matcher'"),
        ));
        return;
    };

    if m == "*" {
        out.push(finding(
            a,
            "hooks/wildcard-matcher",
            format!("{at}: matcher '*' runs on every tool"),
        ));
        return;
    }
    // Matchers support look-around and backreferences, which `regex` rejects.
    if let Err(e) = fancy_regex::Regex::new(m) {
        out.push(finding(
            a,
            "hooks/invalid-matcher",
            format!("{at}: matcher '{m}' is not a valid regular expression: {e}"),
        ));
    }
    if m.contains("\\|") {
        out.push(finding(
            a,
            "hooks/escaped-pipe",
            format!("{at}: matcher '{m}' escapes '|' and will match a literal pipe"),
        ));
    }
}

fn check_group_items(
    a: &Artifact,
    config: &Config,
    event: &str,
    g: usize,
    group: &Value,
    out: &mut Vec<Finding>,
) {
    let Some(list) = group.get("hooks").and_then(Value::as_array) else {
        out.push(finding(
            a,
            "hooks/missing-hook-list",
            format!("hooks.{event}[{g}] has no 'hooks' array"),
        ));
        return;
    };

    for (i, value) in list.iter().enumerate() {
        let item = HookItem {
            event,
            group: g,
            index: i,
            value,
        };
        let at = item.path();
        let Some(kind) = item.item_type().filter(|t| ITEM_TYPES.contains(t)) else {
            let shown = item
                .value
                .get("type")
                .map_or_else(|| "<missing>".to_string(), Value::to_string);
            out.push(finding(
                a,
                "hooks/invalid-type",
                format!("{at}: type {shown} is not 'command' or 'prompt'"),
            ));
            continue;
        };

        let payload = item
            .value
            .get(kind)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty());
        let Some(payload) = payload else {
            out.push(finding(
                a,
                "hooks/missing-payload",
                format!("{at}: '{kind}' hook has no '{kind}' value"),
            ));
            continue;
        };

        if kind == "command" {
            for script in script_references(payload) {
                if !is_rooted_script(script) {
                    out.push(
                        finding(
                            a,
                            "hooks/relative-script",
                            format!("{at}: script '{script}' is relative to the working directory"),
                        )
                        .with_snippet(super::snippet(payload)),
                    );
                }
            }
        } else if payload.chars().count() < config.limits.hook_prompt_min {
            out.push(finding(
                a,
                "hooks/short-prompt",
                format!(
                    "{at}: prompt is shorter than {} characters",
                    config.limits.hook_prompt_min
                ),
            ));
        }
    }
}

pub fn rules() -> Vec<RuleInfo> {
    const HOOK: &[ArtifactKind] = &[ArtifactKind::Hook];
    vec![
        RuleInfo {
            id: "hooks/missing-hooks-object",
            severity: Severity::Critical,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Hook file must contain a top-level 'hooks' object",
            remediation: "Wrap event definitions in { \"hooks\": { ... } }",
        },
        RuleInfo {
            id: "hooks/invalid-event",
            severity: Severity::Critical,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Event name is not one of the 8 supported hook events",
            remediation: "Use PreToolUse, PostToolUse, UserPromptSubmit, Stop, SessionStart, Notification, SubagentStop or PreCompact",
        },
        RuleInfo {
            id: "hooks/event-not-array",
            severity: Severity::Critical,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Event value must be an array of hook groups",
            remediation: "Wrap the group object in [ ... ]",
        },
        RuleInfo {
            id: "hooks/missing-matcher",
            severity: Severity::Critical,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "PreToolUse/PostToolUse groups need a non-empty matcher",
            remediation: "Add \"matcher\": \"ToolName\" or \"*\" for every tool",
        },
        RuleInfo {
            id: "hooks/empty-matcher",
            severity: Severity::Warning,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Lifecycle event group has an empty matcher key",
            remediation: "Remove the 'matcher' key from lifecycle events",
        },
        RuleInfo {
            id: "hooks/unexpected-matcher",
            severity: Severity::Warning,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Lifecycle events do not use matchers",
            remediation: "Remove the 'matcher' key; lifecycle hooks always run",
        },
        RuleInfo {
            id: "hooks/invalid-matcher",
            severity: Severity::Critical,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Matcher is not a valid regular expression",
            remediation: "Fix the regex syntax, e.g. 'Write|Edit'",
        },
        RuleInfo {
            id: "hooks/wildcard-matcher",
            severity: Severity::Info,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Matcher '*' runs the hook for every tool",
            remediation: "Narrow the matcher if the hook only concerns specific tools",
        },
        RuleInfo {
            id: "hooks/escaped-pipe",
            severity: Severity::Warning,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Matcher contains '\\|', which matches a literal pipe",
            remediation: "Use an unescaped '|' to alternate between tools",
        },
        RuleInfo {
            id: "hooks/missing-hook-list",
            severity: Severity::Critical,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Hook group lacks a 'hooks' array",
            remediation: "Add \"hooks\": [ { \"type\": \"command\", \"command\": \"...\" } ]",
        },
        RuleInfo {
            id: "hooks/invalid-type",
            severity: Severity::Critical,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Hook type must be 'command' or 'prompt'",
            remediation: "Set \"type\" to \"command\" or \"prompt\"",
        },
        RuleInfo {
            id: "hooks/missing-payload",
            severity: Severity::Critical,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Hook item lacks its 'command' or 'prompt' value",
            remediation: "Add the field named by the hook's type",
        },
        RuleInfo {
            id: "hooks/relative-script",
            severity: Severity::Recommendation,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Script path is relative to the working directory",
            remediation: "Prefix script paths with ${CLAUDE_PLUGIN_ROOT}/",
        },
        RuleInfo {
            id: "hooks/short-prompt",
            severity: Severity::Recommendation,
            category: Category::HookSchema,
            kinds: HOOK,
            message: "Prompt hook text is very short",
            remediation: "Give the prompt enough context to act on",
        },
    ]
}
