mod cli;

use std::path::{Path, PathBuf};

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use plugin_lint::artifact::ArtifactKind;
use plugin_lint::config::Config;
use plugin_lint::finding::Severity;
use plugin_lint::migrate::{self, ChangeKind, MigrationPlan};
use plugin_lint::output::{self, OutputFormat};
use plugin_lint::score::Scorecard;
use plugin_lint::{audit, locator, parser, permissions, prompt, rules};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Commands::Validate {
            kind,
            target,
            format,
            strict,
            config,
            directory,
        } => {
            let config = load_config(config.as_deref(), strict);
            let path = resolve_or_exit(kind, &target, directory.as_deref());
            let report = audit::validate_path(kind, &path, &config);
            print!("{}", output::format_report(&report, format));
            if report.passed {
                0
            } else {
                1
            }
        }

        Commands::Audit {
            kind,
            directory,
            format,
            strict,
            config,
        } => {
            let config = load_config(config.as_deref(), strict);
            let dir = search_dir(directory.as_deref());
            if !dir.is_dir() {
                eprintln!("Error: directory does not exist: {}", dir.display());
                std::process::exit(1);
            }
            let batch = audit::run_audit(kind, &dir, &config);
            print!("{}", output::format_batch(&batch, format));
            batch.exit_code()
        }

        Commands::Enhance {
            kind,
            target,
            format,
            config,
            directory,
        } => {
            let config = load_config(config.as_deref(), false);
            let path = resolve_or_exit(kind, &target, directory.as_deref());
            let report = audit::validate_path(kind, &path, &config);
            if let Some(ref message) = report.parse_error {
                eprintln!("Error: {message}");
                std::process::exit(1);
            }
            let card = Scorecard::from_report(&report, &config.scoring);
            print!("{}", output::format_scorecard(&card, &report, format));
            card.exit_code()
        }

        Commands::Migrate {
            kind,
            target,
            apply,
            dry_run: _,
            yes,
            format,
            config,
            directory,
        } => {
            let config = load_config(config.as_deref(), false);
            run_migrate(kind, target.as_deref(), directory.as_deref(), apply, yes, format, &config)
        }

        Commands::FixPermissions {
            kind,
            target,
            directory,
        } => run_fix_permissions(kind, &target, directory.as_deref()),

        Commands::ListRules { kind } => {
            list_rules(kind);
            0
        }

        Commands::Explain { rule_id } => match rules::find_rule(&rule_id) {
            Some(rule) => {
                let kinds: Vec<String> = rule.kinds.iter().map(|k| k.to_string()).collect();
                println!("{}", rule.id.bold());
                println!();
                println!("  Category:     {}", rule.category.label());
                println!("  Severity:     {}", rule.severity);
                println!("  Applies to:   {}", kinds.join(", "));
                println!("  Description:  {}", rule.message);
                println!("  Remediation:  {}", rule.remediation);
                0
            }
            None => {
                eprintln!("Unknown rule: {rule_id}");
                eprintln!("Use 'plugin-lint list-rules' to see all available rules.");
                1
            }
        },
    };

    std::process::exit(code);
}

/// `-v` selects debug, `-vv` trace; otherwise `RUST_LOG` or `warn`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("plugin_lint=debug"),
        _ => EnvFilter::new("plugin_lint=trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: Option<&Path>, strict: bool) -> Config {
    let mut config = Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    if strict {
        config.strict.enabled = true;
    }
    config
}

fn search_dir(directory: Option<&Path>) -> PathBuf {
    directory
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_or_exit(kind: ArtifactKind, target: &str, directory: Option<&Path>) -> PathBuf {
    locator::resolve(kind, target, &search_dir(directory)).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

fn run_migrate(
    kind: ArtifactKind,
    target: Option<&str>,
    directory: Option<&Path>,
    apply: bool,
    yes: bool,
    format: OutputFormat,
    config: &Config,
) -> i32 {
    let paths = match target {
        Some(target) => vec![resolve_or_exit(kind, target, directory)],
        None => {
            let dir = search_dir(directory);
            let found = locator::discover(kind, &dir);
            if found.is_empty() {
                eprintln!("No {kind}s found in {}", dir.display());
                return 0;
            }
            found
        }
    };

    let mut failures = 0usize;
    let mut plans: Vec<MigrationPlan> = Vec::new();
    for path in &paths {
        match migrate::plan_path(kind, path) {
            Ok(plan) => plans.push(plan),
            Err(e) => {
                eprintln!("{} {}: {e}", "Skipped".red().bold(), path.display());
                failures += 1;
            }
        }
    }

    print!("{}", output::format_plans(&plans, format));

    let pending: Vec<&MigrationPlan> = plans.iter().filter(|p| p.has_mutations()).collect();
    if apply && !pending.is_empty() {
        let question = format!("Apply migrations to {} file(s)?", pending.len());
        let approved = yes
            || prompt::confirm(&question, std::io::stdin().lock(), std::io::stderr())
                .unwrap_or_else(|e| {
                    eprintln!("Error: {e}");
                    false
                });
        if !approved {
            eprintln!("Aborted: no files were changed.");
        } else {
            let style = config.backup.style_for(kind);
            for plan in pending {
                match migrate::apply(plan, style) {
                    Ok(Some(backup)) => eprintln!(
                        "{} {} (backup: {})",
                        "Migrated".green().bold(),
                        plan.original.location.display(),
                        backup.display()
                    ),
                    Ok(None) => {}
                    Err(e) => {
                        eprintln!("{} {e}", "Failed".red().bold());
                        failures += 1;
                    }
                }
            }
        }
    } else if !pending.is_empty() {
        eprintln!(
            "Dry run: {} file(s) would change. Re-run with --apply to write them.",
            pending.len()
        );
    }

    let unrepairable = plans
        .iter()
        .any(|p| p.changes_of(ChangeKind::Unrepairable).next().is_some());
    if failures > 0 || unrepairable {
        1
    } else {
        0
    }
}

fn run_fix_permissions(kind: ArtifactKind, target: &str, directory: Option<&Path>) -> i32 {
    if !matches!(kind, ArtifactKind::Skill | ArtifactKind::Hook) {
        eprintln!("Error: fix-permissions applies to skills and hooks, not {kind}s");
        return 2;
    }
    let path = resolve_or_exit(kind, target, directory);
    let artifact = match parser::load(kind, &path) {
        Ok(artifact) => artifact,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };
    match permissions::fix_permissions(&artifact) {
        Ok(fixed) if fixed.is_empty() => {
            println!("Nothing to fix: every referenced script is executable.");
            0
        }
        Ok(fixed) => {
            for path in &fixed {
                println!("  {} {}", "chmod +x".green(), path.display());
            }
            println!("Fixed {} script(s).", fixed.len());
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn list_rules(kind: Option<ArtifactKind>) {
    let rules: Vec<_> = rules::all_rules()
        .iter()
        .filter(|r| kind.is_none_or(|k| r.kinds.contains(&k)))
        .collect();
    println!("{}", "Built-in Rules".bold().underline());
    println!();

    let mut current = None;
    for rule in &rules {
        if current != Some(rule.category) {
            if current.is_some() {
                println!();
            }
            println!("  {}", rule.category.label().bold());
            current = Some(rule.category);
        }

        let severity = match rule.severity {
            Severity::Critical => " CRIT".red().bold().to_string(),
            Severity::Warning => " WARN".yellow().bold().to_string(),
            Severity::Recommendation => "  REC".cyan().to_string(),
            Severity::Info => " INFO".blue().to_string(),
        };

        println!(
            "    [{severity}] {id:<34} {message}",
            id = rule.id,
            message = rule.message,
        );
    }

    println!();
    println!("  Total: {} rules", rules.len());
}
