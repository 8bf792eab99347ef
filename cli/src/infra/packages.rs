//! Infrastructure implementation of the `PackageManager` port over `apt-get`.

use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, PackageManager};
use crate::infra::command_runner::{PACKAGE_TIMEOUT, TokioCommandRunner};

/// Routes package operations through a `CommandRunner`.
///
/// Generic over `R` so tests can inject a recording runner.
pub struct AptPackageManager<R: CommandRunner> {
    runner: R,
    timeout: Duration,
}

impl<R: CommandRunner> AptPackageManager<R> {
    pub fn new(runner: R, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

impl AptPackageManager<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::new(PACKAGE_TIMEOUT), PACKAGE_TIMEOUT)
    }
}

impl<R: CommandRunner> PackageManager for AptPackageManager<R> {
    async fn refresh_index(&self) -> Result<Output> {
        self.runner
            .run_with_timeout("apt-get", &["update", "-q"], self.timeout)
            .await
            .context("apt-get update")
    }

    async fn install(&self, package: &str) -> Result<Output> {
        self.runner
            .run_with_timeout("apt-get", &["install", "-y", "-q", package], self.timeout)
            .await
            .with_context(|| format!("apt-get install {package}"))
    }
}
