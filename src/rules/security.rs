//! Dangerous shell pattern detection.
//!
//! Shell code is never executed; each line is matched against a fixed table
//! of regular expressions. Every pattern that matches a line produces its
//! own finding. Lines that are shell comments are skipped (shebangs are not).
//!
//! Sources of shell code:
//! - fenced code blocks tagged `bash`, `sh`, `shell` or `zsh` in the body of
//!   agents, commands and skills;
//! - every `command` string of a hook-set.
//!
//! Hook commands are also checked for unguarded positional parameters and a
//! missing `set -euo pipefail`.

use std::sync::LazyLock;

use regex::Regex;

use super::{finding, hooks, snippet, RuleInfo};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

struct ShellPattern {
    id: &'static str,
    severity: Severity,
    regex: &'static LazyLock<Regex>,
    message: &'static str,
    remediation: &'static str,
}

// Code execution

static RE_EVAL_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\beval\s+["']?\$"#).unwrap());

static RE_PIPE_TO_SHELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(curl|wget)\b[^|]*\|\s*(sudo\s+)?(bash|sh|zsh)\b").unwrap()
});

// Destructive operations

static RE_RM_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\brm\s+(-[rRfF]+\s+)+/(\*)?(\s|;|&|\||$)").unwrap());

static RE_RM_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\brm\s+(-[rRfF]+\s+)+["']?\$\{?[A-Za-z_]"#).unwrap());

static RE_DISK_WRITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(>\s*/dev/(sd|nvme|hd)|\bdd\b.*\bof=/dev/(sd|nvme|hd)|\bmkfs(\.\w+)?\b)")
        .unwrap()
});

// Injection-prone constructs

static RE_CMD_SUBST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\([^(]").unwrap());

static RE_BACKTICK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]+`").unwrap());

static RE_UNQUOTED_CHAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\x22\w])\$\{?[A-Za-z_][A-Za-z0-9_]*\}?\s*(&&|\|\||\||;)").unwrap()
});

static RE_CHMOD_777: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bchmod\s+(-R\s+)?0?777\b").unwrap());

static PATTERNS: &[ShellPattern] = &[
    ShellPattern {
        id: "security/eval-variable",
        severity: Severity::Critical,
        regex: &RE_EVAL_VAR,
        message: "eval of a variable expansion allows arbitrary code execution",
        remediation: "Never eval user input; call explicit commands or use a case statement",
    },
    ShellPattern {
        id: "security/pipe-to-shell",
        severity: Severity::Critical,
        regex: &RE_PIPE_TO_SHELL,
        message: "Downloaded content piped straight into a shell",
        remediation: "Download to a file, verify its checksum, then run it explicitly",
    },
    ShellPattern {
        id: "security/rm-root",
        severity: Severity::Critical,
        regex: &RE_RM_ROOT,
        message: "rm -rf on the filesystem root",
        remediation: "Scope deletions to a specific, validated directory",
    },
    ShellPattern {
        id: "security/rm-variable",
        severity: Severity::Critical,
        regex: &RE_RM_VAR,
        message: "rm -rf with a variable target; an empty value deletes the wrong tree",
        remediation: "Validate the variable is non-empty (${VAR:?}) and quote it",
    },
    ShellPattern {
        id: "security/disk-device-write",
        severity: Severity::Critical,
        regex: &RE_DISK_WRITE,
        message: "Raw write to a disk device or filesystem creation",
        remediation: "Block-device writes and mkfs never belong in plugin artifacts",
    },
    ShellPattern {
        id: "security/command-substitution",
        severity: Severity::Warning,
        regex: &RE_CMD_SUBST,
        message: "Command substitution $(...) may execute injected input",
        remediation: "Make sure substituted commands never include unvalidated input",
    },
    ShellPattern {
        id: "security/backtick-execution",
        severity: Severity::Warning,
        regex: &RE_BACKTICK,
        message: "Backtick command execution may execute injected input",
        remediation: "Prefer $(...) with validated input, or avoid substitution entirely",
    },
    ShellPattern {
        id: "security/unquoted-variable-chain",
        severity: Severity::Warning,
        regex: &RE_UNQUOTED_CHAIN,
        message: "Unquoted variable chained into further commands",
        remediation: "Quote the variable (\"$VAR\") before chaining with &&, ||, | or ;",
    },
    ShellPattern {
        id: "security/chmod-777",
        severity: Severity::Warning,
        regex: &RE_CHMOD_777,
        message: "chmod 777 makes files world-writable",
        remediation: "Use the narrowest mode that works, e.g. 755 or u+x",
    },
];

static RE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(```+|~~~+)\s*([A-Za-z0-9_+-]*)").unwrap());

const SHELL_LANGS: &[&str] = &["bash", "sh", "shell", "zsh"];

/// Every shell-tagged fenced block in `body`, as its lines with 1-based
/// body-relative line numbers. An unterminated block runs to the end.
pub fn shell_blocks(body: &str) -> Vec<Vec<(usize, &str)>> {
    let mut blocks = Vec::new();
    // (fence marker, lines if the block is shell) of the currently open block
    let mut open: Option<(&str, Option<Vec<(usize, &str)>>)> = None;

    for (idx, line) in body.lines().enumerate() {
        if let Some(caps) = RE_FENCE.captures(line) {
            let marker = caps.get(1).map_or("", |m| m.as_str());
            match open.take() {
                Some((open_marker, lines)) if marker.starts_with(open_marker) => {
                    blocks.extend(lines);
                    continue;
                }
                None => {
                    let lang = caps.get(2).map_or("", |m| m.as_str()).to_lowercase();
                    let lines = SHELL_LANGS.contains(&lang.as_str()).then(Vec::new);
                    open = Some((marker, lines));
                    continue;
                }
                still_open => open = still_open,
            }
        }
        if let Some((_, Some(lines))) = open.as_mut() {
            lines.push((idx + 1, line));
        }
    }
    if let Some((_, Some(lines))) = open {
        blocks.push(lines);
    }
    blocks
}

/// Lines of every shell-tagged fenced block in `body`, with their 1-based
/// body-relative line numbers.
pub fn shell_block_lines(body: &str) -> Vec<(usize, &str)> {
    shell_blocks(body).into_iter().flatten().collect()
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') && !trimmed.starts_with("#!")
}

/// Matches one line against the pattern table.
///
/// Returns `(rule id, severity)` for every matching pattern, in table order.
pub fn scan_line(line: &str) -> Vec<(&'static str, Severity)> {
    if is_comment(line) {
        return Vec::new();
    }
    PATTERNS
        .iter()
        .filter(|p| p.regex.is_match(line))
        .map(|p| (p.id, p.severity))
        .collect()
}

pub(crate) fn check_body(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    for (rel, line) in shell_block_lines(a.body()) {
        for (id, _) in scan_line(line) {
            let message = pattern_message(id);
            out.push(
                finding(a, id, message)
                    .with_line(a.body_line + rel - 1)
                    .with_snippet(snippet(line)),
            );
        }
    }
}

pub(crate) fn check_hook_commands(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let Some(root) = a.hooks() else {
        return;
    };
    for item in hooks::hook_items(root) {
        let Some(command) = item.command() else {
            continue;
        };
        for line in command.lines() {
            for (id, _) in scan_line(line) {
                out.push(
                    finding(
                        a,
                        id,
                        format!("{} ({} hook)", pattern_message(id), item.event),
                    )
                    .with_snippet(snippet(line)),
                );
            }
        }
    }
}

static RE_HOOK_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$[1-9@]").unwrap());

static RE_BASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bbash\b").unwrap());

const HOOK_PARAM_GUARDS: &[&str] = &["[[ ", "if ", "case "];

const STRICT_MODE: &str = "set -euo pipefail";

/// Hook commands that take positional parameters without guarding them, and
/// bash commands that do not enable strict mode.
pub(crate) fn check_hook_hygiene(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let Some(root) = a.hooks() else {
        return;
    };
    for item in hooks::hook_items(root) {
        let Some(command) = item.command() else {
            continue;
        };
        if RE_HOOK_PARAM.is_match(command) && !HOOK_PARAM_GUARDS.iter().any(|g| command.contains(g)) {
            out.push(
                finding(
                    a,
                    "security/unvalidated-hook-params",
                    format!("{}: uses $1/$@ without a visible check", item.path()),
                )
                .with_snippet(snippet(command)),
            );
        }
        if RE_BASH.is_match(command) && !command.contains(STRICT_MODE) {
            out.push(
                finding(
                    a,
                    "security/missing-strict-mode",
                    format!("{}: bash command without '{STRICT_MODE}'", item.path()),
                )
                .with_snippet(snippet(command)),
            );
        }
    }
}

fn pattern_message(id: &str) -> &'static str {
    PATTERNS
        .iter()
        .find(|p| p.id == id)
        .map_or("Dangerous shell pattern", |p| p.message)
}

pub fn rules() -> Vec<RuleInfo> {
    let mut rules: Vec<RuleInfo> = PATTERNS
        .iter()
        .map(|p| RuleInfo {
            id: p.id,
            severity: p.severity,
            category: Category::Security,
            kinds: &ArtifactKind::ALL,
            message: p.message,
            remediation: p.remediation,
        })
        .collect();
    rules.extend([
        RuleInfo {
            id: "security/unvalidated-hook-params",
            severity: Severity::Warning,
            category: Category::Security,
            kinds: &[ArtifactKind::Hook],
            message: "Hook command uses positional parameters without validation",
            remediation: "Guard parameters before use, e.g. [[ -n \"$1\" ]] || exit 1",
        },
        RuleInfo {
            id: "security/missing-strict-mode",
            severity: Severity::Recommendation,
            category: Category::Security,
            kinds: &[ArtifactKind::Hook],
            message: "Bash hook command does not enable strict mode",
            remediation: "Start inline scripts with 'set -euo pipefail' so failures stop the hook",
        },
    ]);
    rules
}
