//! Artifact staging: materialise application files in the serving root.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! Staging is a full replace: whatever was previously deployed under the
//! target directory is removed before the copy, so no file from an earlier
//! deployment survives. Removal and copy failures are fatal; ownership and
//! mode failures are soft. A source that overlaps the target is refused
//! before anything is removed.

use std::path::{Path, PathBuf};

use crate::application::ports::{DeployFs, ProgressReporter};
use crate::domain::error::{FatalError, SoftError};
use crate::domain::request::DeploymentTarget;

/// Directory mode: owner rwx, group r-x, no access for others.
pub const DIR_MODE: u32 = 0o750;
/// File mode: owner rw, group r, no access for others.
pub const FILE_MODE: u32 = 0o640;

/// Identity staged files are handed to.
#[derive(Debug, Clone, Copy)]
pub struct Ownership<'a> {
    pub user: &'a str,
    pub group: &'a str,
}

/// Result of a successful stage.
#[derive(Debug)]
pub struct Staged {
    pub deploy_dir: PathBuf,
    pub files_copied: u64,
    /// Set when ownership or modes could not be applied.
    pub degraded: Option<SoftError>,
}

/// Copy `source` into `target.deploy_dir`, replacing any prior deployment.
///
/// A directory source has its contents copied recursively; a file source is
/// copied into the deploy directory under its own file name.
///
/// # Errors
///
/// - [`FatalError::SourceNotFound`] if `source` does not exist now.
/// - [`FatalError::StageOverlap`] if `source` and the deploy directory are the
///   same path or one contains the other.
/// - [`FatalError::StageRemovalFailed`] if the old deployment cannot be removed.
/// - [`FatalError::StageCopyFailed`] if the directory cannot be created or
///   the copy does not complete.
pub fn stage(
    fs: &impl DeployFs,
    reporter: &impl ProgressReporter,
    source: &Path,
    target: &DeploymentTarget,
    owner: Ownership<'_>,
) -> Result<Staged, FatalError> {
    if !fs.exists(source) {
        return Err(FatalError::SourceNotFound(source.to_path_buf()));
    }
    let deploy_dir = &target.deploy_dir;
    ensure_disjoint(fs, source, deploy_dir)?;

    if fs.exists(deploy_dir) {
        reporter.step(&format!(
            "removing previous deployment at {}",
            deploy_dir.display()
        ));
        fs.remove_all(deploy_dir)
            .map_err(|e| FatalError::StageRemovalFailed {
                path: deploy_dir.clone(),
                reason: format!("{e:#}"),
            })?;
    }

    let copy_failed = |e: anyhow::Error| FatalError::StageCopyFailed {
        source_path: source.to_path_buf(),
        deploy_dir: deploy_dir.clone(),
        reason: format!("{e:#}"),
    };

    fs.create_dir_all(deploy_dir).map_err(copy_failed)?;
    let files_copied = if fs.is_dir(source) {
        fs.copy_tree(source, deploy_dir).map_err(copy_failed)?
    } else {
        let file_name = source
            .file_name()
            .ok_or_else(|| copy_failed(anyhow::anyhow!("source has no file name")))?;
        fs.copy_file(source, &deploy_dir.join(file_name))
            .map_err(copy_failed)?;
        1
    };

    let degraded = apply_policy(fs, deploy_dir, owner).err();
    Ok(Staged {
        deploy_dir: deploy_dir.clone(),
        files_copied,
        degraded,
    })
}

/// Refuse a source and deploy directory that are equal or nested either way.
///
/// Both sides are compared after symlink resolution, so a link into the
/// serving root is caught too. `deploy_dir` need not exist yet.
///
/// # Errors
///
/// Returns [`FatalError::StageOverlap`] on any overlap.
pub fn ensure_disjoint(
    fs: &impl DeployFs,
    source: &Path,
    deploy_dir: &Path,
) -> Result<(), FatalError> {
    let real_source = resolve(fs, source);
    let real_deploy = resolve(fs, deploy_dir);
    if real_source.starts_with(&real_deploy) || real_deploy.starts_with(&real_source) {
        tracing::debug!(
            source = %real_source.display(),
            deploy_dir = %real_deploy.display(),
            "source overlaps deploy directory"
        );
        return Err(FatalError::StageOverlap {
            source_path: source.to_path_buf(),
            deploy_dir: deploy_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonicalise the deepest existing ancestor of `path` and re-append the
/// rest. Falls back to `path` itself when no ancestor resolves.
fn resolve(fs: &impl DeployFs, path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut cursor = path;
    loop {
        if fs.exists(cursor) {
            if let Ok(mut real) = fs.canonicalize(cursor) {
                real.extend(missing.iter().rev());
                return real;
            }
        }
        match (cursor.parent(), cursor.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                cursor = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Hand the tree to the service identity and restrict its modes.
///
/// Both halves are attempted even if the first fails.
fn apply_policy(fs: &impl DeployFs, dir: &Path, owner: Ownership<'_>) -> Result<(), SoftError> {
    let mut problems = Vec::new();
    if let Err(e) = fs.chown_recursive(dir, owner.user, owner.group) {
        problems.push(format!("{e:#}"));
    }
    if let Err(e) = fs.set_modes_recursive(dir, DIR_MODE, FILE_MODE) {
        problems.push(format!("{e:#}"));
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(SoftError::PermissionApply(problems.join("; ")))
    }
}
