//! Filesystem infrastructure: implements `DeployFs` over `std::fs`.
//!
//! Tree walks use `walkdir`; user and group names are resolved with `nix`.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nix::unistd::{Group, User};
use walkdir::WalkDir;

use crate::application::ports::DeployFs;

/// Production filesystem implementation of `DeployFs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl DeployFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        std::fs::canonicalize(path).with_context(|| format!("resolving {}", path.display()))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "removing");
        let meta = std::fs::symlink_metadata(path)
            .with_context(|| format!("inspecting {}", path.display()))?;
        if meta.is_dir() {
            std::fs::remove_dir_all(path)
                .with_context(|| format!("removing directory {}", path.display()))
        } else {
            std::fs::remove_file(path).with_context(|| format!("removing file {}", path.display()))
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<u64> {
        tracing::debug!(src = %src.display(), dest = %dest.display(), "copying tree");
        let mut files = 0;
        for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
            let entry = entry.with_context(|| format!("walking {}", src.display()))?;
            let rel = entry
                .path()
                .strip_prefix(src)
                .with_context(|| format!("relativising {}", entry.path().display()))?;
            let target = dest.join(rel);
            let file_type = entry.file_type();
            if file_type.is_dir() {
                std::fs::create_dir_all(&target)
                    .with_context(|| format!("creating directory {}", target.display()))?;
            } else if file_type.is_symlink() {
                let link = std::fs::read_link(entry.path())
                    .with_context(|| format!("reading link {}", entry.path().display()))?;
                std::os::unix::fs::symlink(&link, &target)
                    .with_context(|| format!("creating link {}", target.display()))?;
            } else {
                std::fs::copy(entry.path(), &target).with_context(|| {
                    format!("copying {} to {}", entry.path().display(), target.display())
                })?;
                files += 1;
            }
        }
        Ok(files)
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> Result<()> {
        std::fs::copy(src, dest)
            .with_context(|| format!("copying {} to {}", src.display(), dest.display()))?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading file {}", path.display()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        tracing::debug!(path = %path.display(), "writing");
        std::fs::write(path, content).with_context(|| format!("writing file {}", path.display()))
    }

    fn append(&self, path: &Path, content: &str) -> Result<()> {
        tracing::debug!(path = %path.display(), "appending");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening {} for append", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("appending to {}", path.display()))
    }

    fn chown_recursive(&self, path: &Path, user: &str, group: &str) -> Result<()> {
        let uid = User::from_name(user)
            .with_context(|| format!("looking up user {user}"))?
            .ok_or_else(|| anyhow::anyhow!("no such user: {user}"))?
            .uid;
        let gid = Group::from_name(group)
            .with_context(|| format!("looking up group {group}"))?
            .ok_or_else(|| anyhow::anyhow!("no such group: {group}"))?
            .gid;
        tracing::debug!(path = %path.display(), user, group, "chown -R");
        for entry in WalkDir::new(path).follow_links(false) {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            std::os::unix::fs::lchown(entry.path(), Some(uid.as_raw()), Some(gid.as_raw()))
                .with_context(|| format!("chown {}", entry.path().display()))?;
        }
        Ok(())
    }

    fn set_modes_recursive(&self, path: &Path, dir_mode: u32, file_mode: u32) -> Result<()> {
        tracing::debug!(path = %path.display(), dir_mode, file_mode, "chmod -R");
        for entry in WalkDir::new(path).follow_links(false) {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            let file_type = entry.file_type();
            // Link permissions are not meaningful on Linux; chmod would
            // follow the link out of the tree.
            if file_type.is_symlink() {
                continue;
            }
            let mode = if file_type.is_dir() { dir_mode } else { file_mode };
            std::fs::set_permissions(entry.path(), std::fs::Permissions::from_mode(mode))
                .with_context(|| format!("chmod {:o} {}", mode, entry.path().display()))?;
        }
        Ok(())
    }
}
