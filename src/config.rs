//! Configuration loading.
//!
//! The default configuration file is `plugin-lint.toml` in the current working
//! directory. Every field has a default, so the file can be omitted entirely:
//!
//! ```toml
//! [limits]
//! max_tools = 8
//!
//! [scoring]
//! pass_threshold = 70
//!
//! [strict]
//! enabled = true
//!
//! [rules]
//! disabled = ["tools/too-many", "naming/verb-first"]
//!
//! [backup]
//! style = "timestamp"
//! ```

use std::path::Path;

use crate::artifact::ArtifactKind;
use crate::error::{Error, Result};
use crate::finding::Severity;

pub const DEFAULT_CONFIG_FILE: &str = "plugin-lint.toml";

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub limits: LimitsConfig,
    pub scoring: ScoringConfig,
    /// When strict mode is enabled, warnings are promoted to failures.
    pub strict: StrictConfig,
    pub rules: RulesConfig,
    pub backup: BackupConfig,
}

/// Length bounds enforced by the naming, schema and tools rules.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub identity_max: usize,
    pub command_description_min: usize,
    pub command_description_max: usize,
    pub skill_description_min: usize,
    pub skill_description_max: usize,
    pub agent_description_min: usize,
    pub agent_description_max: usize,
    pub max_tools: usize,
    pub hook_prompt_min: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            identity_max: 64,
            command_description_min: 10,
            command_description_max: 200,
            skill_description_min: 30,
            skill_description_max: 1024,
            agent_description_min: 10,
            agent_description_max: 1024,
            max_tools: 6,
            hook_prompt_min: 20,
        }
    }
}

impl LimitsConfig {
    /// `(min, max)` description length for `kind`. Hook-sets have no description.
    pub fn description_bounds(&self, kind: ArtifactKind) -> Option<(usize, usize)> {
        match kind {
            ArtifactKind::Command => {
                Some((self.command_description_min, self.command_description_max))
            }
            ArtifactKind::Skill => Some((self.skill_description_min, self.skill_description_max)),
            ArtifactKind::Agent => Some((self.agent_description_min, self.agent_description_max)),
            ArtifactKind::Hook => None,
        }
    }
}

/// Scorecard parameters used by `enhance`.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Starting score of every category.
    pub baseline: u32,
    pub critical_penalty: u32,
    pub warning_penalty: u32,
    pub recommendation_penalty: u32,
    pub info_penalty: u32,
    /// Overall percentage below which `enhance` exits non-zero.
    pub pass_threshold: u32,
    /// Categories scoring below this are listed as recommendations.
    pub recommend_below: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            baseline: 10,
            critical_penalty: 3,
            warning_penalty: 2,
            recommendation_penalty: 1,
            info_penalty: 0,
            pass_threshold: 60,
            recommend_below: 7,
        }
    }
}

impl ScoringConfig {
    pub fn penalty(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical_penalty,
            Severity::Warning => self.warning_penalty,
            Severity::Recommendation => self.recommendation_penalty,
            Severity::Info => self.info_penalty,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StrictConfig {
    /// Set to `true` to treat warnings as errors.
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule ids whose findings are dropped.
    pub disabled: Vec<String>,
}

/// How the writer names the backup of a file it is about to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupStyle {
    /// `<file>.bak`
    Suffix,
    /// `<file>.pre-migration-<YYYYmmdd_HHMMSS>`
    Timestamp,
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Overrides the per-kind default when set.
    pub style: Option<BackupStyle>,
}

impl BackupConfig {
    /// Agents keep timestamped backups so repeated migrations never clobber
    /// an earlier copy; everything else uses a `.bak` suffix.
    pub fn style_for(&self, kind: ArtifactKind) -> BackupStyle {
        self.style.unwrap_or(match kind {
            ArtifactKind::Agent => BackupStyle::Timestamp,
            _ => BackupStyle::Suffix,
        })
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `plugin-lint.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when the explicit path does not exist, the file
    /// cannot be read, or the TOML fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    p.display()
                )))
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        let Some(path) = config_path else {
            return Ok(Config::default());
        };
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("failed to read config {}: {e}", path.display()))
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("failed to parse config {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Returns `true` unless `rule_id` is listed under `[rules] disabled`.
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.rules.disabled.iter().any(|d| d == rule_id)
    }
}
