//! Application context: unified state passed to the command handler.
//!
//! `AppContext` owns the output context, the loaded configuration and the
//! production adapters for every host port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::application::services::provision::Host;
use crate::domain::DeployConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::infra::packages::AptPackageManager;
use crate::infra::privilege::EffectiveUid;
use crate::infra::service::SystemctlServiceManager;
use crate::infra::web_server::ApacheServer;
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

/// Production adapters bound to the loaded configuration.
pub struct HostAdapters {
    pub packages: AptPackageManager<TokioCommandRunner>,
    pub services: SystemctlServiceManager<TokioCommandRunner>,
    pub web: ApacheServer<TokioCommandRunner>,
    pub fs: LocalFs,
    pub privilege: EffectiveUid,
}

/// Unified application context.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to the
/// command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Host layout and collaborator bindings.
    pub config: DeployConfig,
    /// Production adapters.
    pub adapters: HostAdapters,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let store = YamlConfigStore::resolve(flags.config);
        let config_path = store.path();
        let config = store
            .load()
            .with_context(|| format!("loading configuration {}", config_path.display()))?;
        tracing::debug!(?config, path = %config_path.display(), "configuration loaded");

        let adapters = HostAdapters {
            packages: AptPackageManager::default_runner(),
            services: SystemctlServiceManager::default_runner(),
            web: ApacheServer::default_runner(&config.server_binary),
            fs: LocalFs,
            privilege: EffectiveUid,
        };

        Ok(Self {
            // JSON mode keeps stdout clean for the report.
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config,
            adapters,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Borrow the adapters as the orchestrator's host capabilities.
    #[must_use]
    pub fn host(
        &self,
    ) -> Host<
        '_,
        AptPackageManager<TokioCommandRunner>,
        SystemctlServiceManager<TokioCommandRunner>,
        ApacheServer<TokioCommandRunner>,
        LocalFs,
        EffectiveUid,
    > {
        Host {
            packages: &self.adapters.packages,
            services: &self.adapters.services,
            web: &self.adapters.web,
            fs: &self.adapters.fs,
            privilege: &self.adapters.privilege,
        }
    }

    /// Progress reporter writing to the terminal.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Renderer for the final summary.
    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }
}
