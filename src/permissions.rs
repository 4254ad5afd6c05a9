//! The `fix-permissions` operation: sets execute bits on scripts the rule
//! engine reports as `fs/not-executable`.

use std::path::PathBuf;

use crate::artifact::{Artifact, ArtifactKind};
use crate::error::Result;
use crate::rules::filesystem::{hook_script_paths, is_executable, skill_script_files};

/// Scripts `fix_permissions` would touch: existing, non-executable files
/// under a skill's `scripts/` directory or referenced by a hook-set.
pub fn candidates(artifact: &Artifact) -> Vec<PathBuf> {
    let scripts = match artifact.kind {
        ArtifactKind::Skill => skill_script_files(artifact.base_dir()),
        ArtifactKind::Hook => hook_script_paths(artifact),
        ArtifactKind::Agent | ArtifactKind::Command => Vec::new(),
    };
    scripts
        .into_iter()
        .filter(|p| p.is_file() && !is_executable(p))
        .collect()
}

/// Adds `u+x,g+x,o+x` to every candidate script and returns the fixed paths.
///
/// On non-Unix platforms there is nothing to do and the result is empty.
pub fn fix_permissions(artifact: &Artifact) -> Result<Vec<PathBuf>> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut fixed = Vec::new();
        for path in candidates(artifact) {
            let metadata = std::fs::metadata(&path).map_err(|e| crate::error::Error::io(&path, e))?;
            let mut perms = metadata.permissions();
            perms.set_mode(perms.mode() | 0o111);
            std::fs::set_permissions(&path, perms)
                .map_err(|e| crate::error::Error::io(&path, e))?;
            tracing::info!(path = %path.display(), "made script executable");
            fixed.push(path);
        }
        Ok(fixed)
    }
    #[cfg(not(unix))]
    {
        let _ = artifact;
        Ok(Vec::new())
    }
}
