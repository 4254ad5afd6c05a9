//! Validation and bulk audit orchestration.
//!
//! [`validate_path`] is the per-artifact boundary: load errors become a
//! `parse_error` report instead of propagating. [`audit_paths`] runs it over
//! a batch in sequence, isolating each item so a panic in one artifact is
//! recorded as that artifact's failure and the batch continues.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crate::artifact::{identity_for, Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{ArtifactReport, BatchReport};
use crate::{locator, parser, rules};

/// Runs the rule battery on an already loaded artifact.
pub fn validate_artifact(artifact: &Artifact, config: &Config) -> ArtifactReport {
    let findings = rules::run_checks(artifact, config);
    ArtifactReport::from_findings(
        artifact.kind,
        &artifact.identity,
        artifact.location.clone(),
        findings,
        config.strict.enabled,
    )
}

/// Loads and validates the artifact at `path`.
///
/// Read and decode failures yield a report with status `parse_error`
/// carrying the error message; no rule runs in that case.
pub fn validate_path(kind: ArtifactKind, path: &Path, config: &Config) -> ArtifactReport {
    match parser::load(kind, path) {
        Ok(artifact) => validate_artifact(&artifact, config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not load artifact");
            ArtifactReport::parse_error(kind, &identity_for(kind, path), path.to_path_buf(), e.to_string())
        }
    }
}

/// Validates each path in order.
pub fn audit_paths(kind: ArtifactKind, paths: &[PathBuf], config: &Config) -> BatchReport {
    let reports = paths
        .iter()
        .map(|path| {
            panic::catch_unwind(AssertUnwindSafe(|| validate_path(kind, path, config)))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(path = %path.display(), %message, "validation panicked");
                    ArtifactReport::internal_error(
                        kind,
                        &identity_for(kind, path),
                        path.clone(),
                        message,
                    )
                })
        })
        .collect();
    BatchReport { kind, reports }
}

/// Discovers every artifact of `kind` below `dir` and audits them.
pub fn run_audit(kind: ArtifactKind, dir: &Path, config: &Config) -> BatchReport {
    let paths = locator::discover(kind, dir);
    tracing::info!(kind = %kind, count = paths.len(), "auditing");
    audit_paths(kind, &paths, config)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
