use clap::{Parser, Subcommand};
use plugin_lint::artifact::ArtifactKind;
use plugin_lint::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "plugin-lint",
    version,
    about = "Validate, score and migrate assistant plugin agents, commands, hooks and skills"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the rule engine on one artifact
    Validate {
        /// Artifact kind
        #[arg(value_enum)]
        kind: ArtifactKind,

        /// Artifact name or path
        target: String,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory to search (defaults to the current directory)
        #[arg(long, short)]
        directory: Option<PathBuf>,
    },

    /// Audit every artifact of a kind found below a directory
    Audit {
        /// Artifact kind
        #[arg(value_enum)]
        kind: ArtifactKind,

        /// Directory to search (defaults to the current directory)
        #[arg(long, short)]
        directory: Option<PathBuf>,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score one artifact per category and suggest improvements
    Enhance {
        /// Artifact kind
        #[arg(value_enum)]
        kind: ArtifactKind,

        /// Artifact name or path
        target: String,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory to search (defaults to the current directory)
        #[arg(long, short)]
        directory: Option<PathBuf>,
    },

    /// Preview or apply schema migrations (every artifact of the kind when no target is given)
    Migrate {
        /// Artifact kind
        #[arg(value_enum)]
        kind: ArtifactKind,

        /// Artifact name or path
        target: Option<String>,

        /// Write the migrated artifacts (a backup is kept)
        #[arg(long, conflicts_with = "dry_run")]
        apply: bool,

        /// Only show what would change (the default)
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory to search (defaults to the current directory)
        #[arg(long, short)]
        directory: Option<PathBuf>,
    },

    /// Make the scripts a skill or hook-set references executable
    #[command(name = "fix-permissions")]
    FixPermissions {
        /// Artifact kind (skill or hook)
        #[arg(value_enum)]
        kind: ArtifactKind,

        /// Artifact name or path
        target: String,

        /// Directory to search (defaults to the current directory)
        #[arg(long, short)]
        directory: Option<PathBuf>,
    },

    /// List all built-in rules with descriptions
    ListRules {
        /// Only list rules that apply to this kind
        #[arg(long, value_enum)]
        kind: Option<ArtifactKind>,
    },

    /// Show full explanation for a rule
    Explain {
        /// Rule ID (e.g., "model/not-supported")
        rule_id: String,
    },
}
