//! Infrastructure implementation of the `ServiceManager` port over `systemctl`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ServiceManager};
use crate::infra::command_runner::TokioCommandRunner;

/// Routes service operations through a `CommandRunner`.
pub struct SystemctlServiceManager<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SystemctlServiceManager<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl SystemctlServiceManager<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> ServiceManager for SystemctlServiceManager<R> {
    async fn status(&self, service: &str) -> Result<Output> {
        // `systemctl status` exits 3 for inactive units; the caller reads stdout.
        self.runner
            .run("systemctl", &["status", "--no-pager", service])
            .await
            .with_context(|| format!("systemctl status {service}"))
    }

    async fn start(&self, service: &str) -> Result<Output> {
        self.runner
            .run("systemctl", &["start", service])
            .await
            .with_context(|| format!("systemctl start {service}"))
    }

    async fn restart(&self, service: &str) -> Result<Output> {
        self.runner
            .run("systemctl", &["restart", service])
            .await
            .with_context(|| format!("systemctl restart {service}"))
    }
}
