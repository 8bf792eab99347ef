//! Infrastructure implementation of the `WebServer` port for Apache.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, WebServer};
use crate::infra::command_runner::TokioCommandRunner;

/// Site-enable helper shipped with Debian's Apache packaging.
pub const SITE_ENABLE_PROGRAM: &str = "a2ensite";

/// Probes the server binary and enables sites through `a2ensite`.
pub struct ApacheServer<R: CommandRunner> {
    runner: R,
    binary: String,
}

impl<R: CommandRunner> ApacheServer<R> {
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }
}

impl ApacheServer<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(binary: &str) -> Self {
        Self::new(TokioCommandRunner::default(), binary)
    }
}

impl<R: CommandRunner> WebServer for ApacheServer<R> {
    async fn version(&self) -> Result<Output> {
        self.runner
            .run(&self.binary, &["-v"])
            .await
            .with_context(|| format!("{} -v", self.binary))
    }

    async fn enable_site(&self, site_file: &str) -> Result<Output> {
        self.runner
            .run(SITE_ENABLE_PROGRAM, &[site_file])
            .await
            .with_context(|| format!("{SITE_ENABLE_PROGRAM} {site_file}"))
    }
}
