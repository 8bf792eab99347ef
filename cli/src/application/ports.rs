//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::DeployConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Host Collaborator Ports ───────────────────────────────────────────────────

/// System package manager. Each call reports success through the exit status
/// of the returned `Output`.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Refresh the package index.
    async fn refresh_index(&self) -> Result<Output>;
    /// Install `package` non-interactively.
    async fn install(&self, package: &str) -> Result<Output>;
}

/// Service manager for long-running units.
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Free-text status of `service`. A non-zero exit is not an error here;
    /// callers interpret the text.
    async fn status(&self, service: &str) -> Result<Output>;
    /// Start `service`.
    async fn start(&self, service: &str) -> Result<Output>;
    /// Restart `service`, reloading its configuration.
    async fn restart(&self, service: &str) -> Result<Output>;
}

/// Web-server specific primitives that are not service management.
#[allow(async_fn_in_trait)]
pub trait WebServer {
    /// Probe the server binary. `Err` means the executable is absent.
    async fn version(&self) -> Result<Output>;
    /// Activate a site configuration file by its file name.
    async fn enable_site(&self, site_file: &str) -> Result<Output>;
}

/// Filesystem operations used to stage files and write host artifacts.
pub trait DeployFs {
    /// Returns `true` if `path` exists (following symlinks).
    fn exists(&self, path: &Path) -> bool;
    /// Absolute path with every symlink and `..` resolved. `path` must exist.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
    /// Returns `true` if `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;
    /// Remove `path` and everything beneath it, whether file or directory.
    fn remove_all(&self, path: &Path) -> Result<()>;
    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Recursively copy the contents of directory `src` into existing
    /// directory `dest`, preserving structure. Returns the number of files copied.
    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<u64>;
    /// Copy a single file.
    fn copy_file(&self, src: &Path, dest: &Path) -> Result<()>;
    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Create or truncate `path` with `content`.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Append `content` to `path`, creating it if missing.
    fn append(&self, path: &Path, content: &str) -> Result<()>;
    /// Recursively set ownership of `path` to `user:group`.
    fn chown_recursive(&self, path: &Path, user: &str, group: &str) -> Result<()>;
    /// Recursively apply `dir_mode` to directories and `file_mode` to files.
    fn set_modes_recursive(&self, path: &Path, dir_mode: u32, file_mode: u32) -> Result<()>;
}

/// Reports whether the process holds the rights needed to mutate the host.
pub trait PrivilegeProbe {
    /// `true` when running with elevated (root) rights.
    fn is_elevated(&self) -> bool;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message. Used for soft failures.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts loading of the deploy configuration.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if no file exists.
    fn load(&self) -> Result<DeployConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> PathBuf;
}
