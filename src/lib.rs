//! # plugin-lint
//!
//! Validation, scoring and schema migration for the declarative artifacts of
//! an AI-assistant plugin system: agents, commands, hook-sets and skills.
//!
//! Agents, commands and skills are Markdown files with YAML frontmatter;
//! hook-sets are `hooks.json` documents. One data-driven rule engine and one
//! migrator serve all four kinds.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use plugin_lint::{artifact::ArtifactKind, audit, config::Config, output};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let batch = audit::run_audit(ArtifactKind::Command, Path::new("."), &config);
//!
//! let text = output::format_batch(&batch, output::OutputFormat::Pretty);
//! print!("{text}");
//! std::process::exit(batch.exit_code());
//! ```
//!
//! ## Architecture
//!
//! 1. **[`locator`]**: resolve a name or path; discover artifacts for bulk runs.
//! 2. **[`parser`]**: split frontmatter and body, decode hook JSON, render back.
//! 3. **[`rules`]**: fixed per-kind check tables producing [`finding::Finding`]s.
//! 4. **[`finding`]**, **[`score`]**, **[`output`]**: statuses, scorecards and
//!    pretty / JSON / SARIF rendering.
//! 5. **[`migrate`]**: ordered, idempotent schema migrations per kind.
//! 6. **[`writer`]**, **[`prompt`]**: backup-then-write with restore on
//!    failure, behind a yes/no gate.
//! 7. **[`permissions`]**: make referenced scripts executable.
//! 8. **[`audit`]**: per-artifact isolated batch runs.
//!
//! Shell commands found in artifacts are only pattern-matched, never run.

pub mod artifact;
pub mod audit;
pub mod config;
pub mod error;
pub mod finding;
pub mod locator;
pub mod migrate;
pub mod output;
pub mod parser;
pub mod permissions;
pub mod prompt;
pub mod rules;
pub mod score;
pub mod writer;
