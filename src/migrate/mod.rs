//! Schema migration.
//!
//! A migration takes a loaded [`Artifact`] and produces a [`MigrationPlan`]:
//! the migrated metadata and body plus an ordered change log. Each kind has a
//! fixed list of rules that run in order; a rule either mutates the plan and
//! records an [`ChangeKind::Automatic`] change, or only records an advisory
//! or unrepairable entry.
//!
//! Every rule is idempotent: migrating an already migrated artifact records
//! no automatic change and renders byte-identical text.
//!
//! Planning never touches the disk. [`apply`] hands a plan with mutations to
//! the [`writer`](crate::writer).

pub mod agent;
pub mod command;
pub mod hook;
pub mod skill;

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::artifact::{identity_for, Artifact, ArtifactKind, Metadata};
use crate::config::BackupStyle;
use crate::error::{Error, Result};
use crate::{parser, writer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Already applied to the plan's metadata or body.
    Automatic,
    /// A recommendation; nothing was changed.
    Advisory,
    /// A defect the migrator cannot repair.
    Unrepairable,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MigrationChange {
    pub rule_id: &'static str,
    pub description: String,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone)]
pub struct MigrationPlan {
    pub original: Artifact,
    pub metadata: Metadata,
    pub body: Option<String>,
    pub changes: Vec<MigrationChange>,
}

impl MigrationPlan {
    fn new(original: &Artifact) -> Self {
        MigrationPlan {
            metadata: original.metadata.clone(),
            body: original.body.clone(),
            original: original.clone(),
            changes: Vec::new(),
        }
    }

    /// `true` when at least one automatic change was applied.
    pub fn has_mutations(&self) -> bool {
        self.changes.iter().any(|c| c.kind == ChangeKind::Automatic)
    }

    pub fn changes_of(&self, kind: ChangeKind) -> impl Iterator<Item = &MigrationChange> {
        self.changes.iter().filter(move |c| c.kind == kind)
    }

    /// Renders the migrated artifact as file text.
    pub fn render(&self) -> Result<String> {
        parser::render(&self.metadata, self.body.as_deref())
    }

    pub(crate) fn automatic(&mut self, rule_id: &'static str, description: impl Into<String>) {
        self.push(rule_id, description, ChangeKind::Automatic);
    }

    pub(crate) fn advisory(&mut self, rule_id: &'static str, description: impl Into<String>) {
        self.push(rule_id, description, ChangeKind::Advisory);
    }

    pub(crate) fn unrepairable(&mut self, rule_id: &'static str, description: impl Into<String>) {
        self.push(rule_id, description, ChangeKind::Unrepairable);
    }

    fn push(&mut self, rule_id: &'static str, description: impl Into<String>, kind: ChangeKind) {
        self.changes.push(MigrationChange {
            rule_id,
            description: description.into(),
            kind,
        });
    }

    pub(crate) fn frontmatter_mut(&mut self) -> Option<&mut Mapping> {
        match &mut self.metadata {
            Metadata::Frontmatter(m) => Some(m),
            Metadata::Hooks(_) => None,
        }
    }

    pub(crate) fn hooks_mut(&mut self) -> Option<&mut serde_json::Value> {
        match &mut self.metadata {
            Metadata::Hooks(v) => Some(v),
            Metadata::Frontmatter(_) => None,
        }
    }
}

/// Runs the migration rules of the artifact's kind.
pub fn plan(artifact: &Artifact) -> MigrationPlan {
    let mut plan = MigrationPlan::new(artifact);
    match artifact.kind {
        ArtifactKind::Command => command::migrate(&mut plan),
        ArtifactKind::Skill => skill::migrate(&mut plan),
        ArtifactKind::Agent => agent::migrate(&mut plan),
        ArtifactKind::Hook => hook::migrate(&mut plan),
    }
    tracing::debug!(
        identity = %artifact.identity,
        changes = plan.changes.len(),
        mutations = plan.has_mutations(),
        "planned migration"
    );
    plan
}

/// Loads the artifact at `location` and plans its migration.
///
/// Agents written before frontmatter existed are accepted: their whole file
/// becomes the body and `agent/add-frontmatter` synthesises the metadata.
pub fn plan_path(kind: ArtifactKind, location: &Path) -> Result<MigrationPlan> {
    match parser::load(kind, location) {
        Ok(artifact) => Ok(plan(&artifact)),
        Err(Error::MissingFrontmatter) if kind == ArtifactKind::Agent => {
            let content =
                std::fs::read_to_string(location).map_err(|e| Error::io(location, e))?;
            let artifact = Artifact {
                kind,
                identity: identity_for(kind, location),
                metadata: Metadata::Frontmatter(Mapping::new()),
                body: Some(content),
                location: location.to_path_buf(),
                body_line: 1,
            };
            let mut plan = MigrationPlan::new(&artifact);
            agent::add_frontmatter(&mut plan);
            agent::migrate(&mut plan);
            Ok(plan)
        }
        Err(e) => Err(e),
    }
}

/// Writes a plan's rendered text over the original file, after a backup.
///
/// Returns the backup path, or `None` when the plan has no automatic change
/// and nothing was written.
pub fn apply(plan: &MigrationPlan, style: BackupStyle) -> Result<Option<PathBuf>> {
    if !plan.has_mutations() {
        return Ok(None);
    }
    let text = plan.render()?;
    let backup = writer::write_with_backup(&plan.original.location, &text, style)?;
    tracing::info!(
        path = %plan.original.location.display(),
        backup = %backup.display(),
        "applied migration"
    );
    Ok(Some(backup))
}

// ---------------------------------------------------------------------------
// Order-preserving mapping edits
// ---------------------------------------------------------------------------

/// Removes `key`, keeping the order of the remaining entries.
pub(crate) fn remove_key(mapping: &mut Mapping, key: &str) -> Option<Value> {
    let mut removed = None;
    let entries = std::mem::take(mapping);
    for (k, v) in entries {
        if removed.is_none() && k.as_str() == Some(key) {
            removed = Some(v);
        } else {
            mapping.insert(k, v);
        }
    }
    removed
}

/// Renames `from` to `to` in place. No-op when `from` is absent.
pub(crate) fn rename_key(mapping: &mut Mapping, from: &str, to: &str) {
    let entries = std::mem::take(mapping);
    for (k, v) in entries {
        if k.as_str() == Some(from) {
            mapping.insert(Value::String(to.to_string()), v);
        } else {
            mapping.insert(k, v);
        }
    }
}

/// Inserts `key: value` directly after `after`, or at the end when `after`
/// is absent. Replaces the value in place if `key` already exists.
pub(crate) fn insert_after(mapping: &mut Mapping, after: &str, key: &str, value: Value) {
    if let Some(slot) = mapping.get_mut(key) {
        *slot = value;
        return;
    }
    if !mapping.contains_key(after) {
        mapping.insert(Value::String(key.to_string()), value);
        return;
    }
    let entries = std::mem::take(mapping);
    let mut pending = Some(value);
    for (k, v) in entries {
        let is_anchor = k.as_str() == Some(after);
        mapping.insert(k, v);
        if is_anchor {
            if let Some(value) = pending.take() {
                mapping.insert(Value::String(key.to_string()), value);
            }
        }
    }
}

/// `shared/rename-tools-field`: legacy `tools` becomes `allowed-tools` for
/// commands and skills.
pub(crate) fn rename_tools_field(plan: &mut MigrationPlan) {
    let Some(fm) = plan.frontmatter_mut() else {
        return;
    };
    if !fm.contains_key("tools") {
        return;
    }
    if fm.contains_key("allowed-tools") {
        plan.advisory(
            "shared/rename-tools-field",
            "Both 'tools' and 'allowed-tools' are present; merge them into 'allowed-tools' by hand",
        );
        return;
    }
    rename_key(fm, "tools", "allowed-tools");
    plan.automatic(
        "shared/rename-tools-field",
        "Renamed 'tools' to 'allowed-tools'",
    );
}
