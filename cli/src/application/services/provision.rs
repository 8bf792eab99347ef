//! Application service: the provisioning pass.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The pass is linear and forward-only:
//!
//! ```text
//! Unchecked → PrivilegeVerified → ServerInstalled → ServerRunning → Staged
//!           → Configured → Registered → Restarted → Done
//! ```
//!
//! A fatal failure stops the pass where it happened. Soft failures are
//! reported, recorded in the report, and the pass moves on. Nothing is
//! retried or rolled back; re-running is the recovery path because every
//! step is either a no-op when satisfied or a full replace.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::application::ports::{
    DeployFs, PackageManager, PrivilegeProbe, ProgressReporter, ServiceManager, WebServer,
};
use crate::application::services::stage::Ownership;
use crate::application::services::{hostname, privilege, server, site_config, stage};
use crate::domain::error::{Failure, FatalError, SoftError};
use crate::domain::DeployConfig;
use crate::domain::request::ProvisioningRequest;
use crate::domain::service::ServerState;
use crate::domain::site::SiteConfig;

/// Position in the provisioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionState {
    Unchecked,
    PrivilegeVerified,
    ServerInstalled,
    ServerRunning,
    Staged,
    Configured,
    Registered,
    Restarted,
    Done,
}

impl ProvisionState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::PrivilegeVerified => "privilege_verified",
            Self::ServerInstalled => "server_installed",
            Self::ServerRunning => "server_running",
            Self::Staged => "staged",
            Self::Configured => "configured",
            Self::Registered => "registered",
            Self::Restarted => "restarted",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host capabilities the pass drives.
pub struct Host<'a, PM, SM, WS, FS, PP> {
    pub packages: &'a PM,
    pub services: &'a SM,
    pub web: &'a WS,
    pub fs: &'a FS,
    pub privilege: &'a PP,
}

/// What the operator asked to deploy.
#[derive(Debug, Clone)]
pub struct ProvisionInput<'a> {
    pub source: &'a Path,
    pub name: Option<&'a str>,
}

/// A soft failure and the step it happened in.
#[derive(Debug, Clone, Serialize)]
pub struct SoftFailure {
    pub state: ProvisionState,
    pub message: String,
    #[serde(skip)]
    pub error: SoftError,
}

/// Outcome of a pass that reached `Done`.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub application_name: String,
    pub deploy_dir: PathBuf,
    pub site_config_path: PathBuf,
    pub server_alias: String,
    pub url: String,
    /// Server state observed before any mutation.
    pub server_before: ServerState,
    pub installed_server: bool,
    pub started_server: bool,
    pub files_copied: u64,
    pub alias_registered: bool,
    pub soft_failures: Vec<SoftFailure>,
    pub transitions: Vec<ProvisionState>,
}

impl ProvisionReport {
    /// `true` if any soft failure was recorded.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.soft_failures.is_empty()
    }
}

/// A fatal failure and the last state reached before it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ProvisionError {
    pub state: ProvisionState,
    pub error: FatalError,
}

/// Tracks the state machine and collects soft failures.
struct Run<'r, R> {
    state: ProvisionState,
    transitions: Vec<ProvisionState>,
    soft_failures: Vec<SoftFailure>,
    reporter: &'r R,
}

impl<'r, R: ProgressReporter> Run<'r, R> {
    fn new(reporter: &'r R) -> Self {
        Self {
            state: ProvisionState::Unchecked,
            transitions: vec![ProvisionState::Unchecked],
            soft_failures: Vec::new(),
            reporter,
        }
    }

    fn advance(&mut self, next: ProvisionState) {
        debug_assert!(
            next > self.state,
            "transition {} -> {next} goes backwards",
            self.state
        );
        tracing::debug!(from = %self.state, to = %next, "transition");
        self.state = next;
        self.transitions.push(next);
    }

    /// Decide halt or continue for a step heading into `next`.
    ///
    /// Fatal → `Err`, state unchanged. Soft → warn, record, `Ok(None)`.
    fn settle<T, E: Into<Failure>>(
        &mut self,
        next: ProvisionState,
        result: Result<T, E>,
    ) -> Result<Option<T>, ProvisionError> {
        match result.map_err(Into::into) {
            Ok(value) => Ok(Some(value)),
            Err(Failure::Fatal(error)) => Err(ProvisionError {
                state: self.state,
                error,
            }),
            Err(Failure::Soft(error)) => {
                self.reporter.warn(&error.to_string());
                self.soft_failures.push(SoftFailure {
                    state: next,
                    message: error.to_string(),
                    error,
                });
                Ok(None)
            }
        }
    }

    /// For steps whose value the rest of the pass depends on. Such steps
    /// can only fail fatally.
    fn require<T>(&self, result: Result<T, FatalError>) -> Result<T, ProvisionError> {
        result.map_err(|error| ProvisionError {
            state: self.state,
            error,
        })
    }
}

/// Run one provisioning pass for one application.
///
/// Accepts port trait bounds so the caller can inject real or fake
/// implementations. The service never touches any presentation type.
///
/// # Errors
///
/// Returns [`ProvisionError`] on the first fatal failure. Soft failures are
/// returned inside the report.
pub async fn provision<PM, SM, WS, FS, PP>(
    host: &Host<'_, PM, SM, WS, FS, PP>,
    config: &DeployConfig,
    input: &ProvisionInput<'_>,
    reporter: &impl ProgressReporter,
) -> Result<ProvisionReport, ProvisionError>
where
    PM: PackageManager,
    SM: ServiceManager,
    WS: WebServer,
    FS: DeployFs,
    PP: PrivilegeProbe,
{
    let mut run = Run::new(reporter);

    // Step 1: Nothing may touch the host before this passes.
    run.require(privilege::ensure_elevated(host.privilege))?;
    run.advance(ProvisionState::PrivilegeVerified);

    // Source must exist and yield a usable name before any mutation.
    let request = run.require(resolve_request(host.fs, input))?;

    let target = request.target(&config.serving_root);
    // Overlap is fatal before any host mutation.
    run.require(stage::ensure_disjoint(
        host.fs,
        &request.source_path,
        &target.deploy_dir,
    ))?;
    let service = config.service.as_str();

    // Step 2: Install if absent.
    let installed_before = server::is_installed(host.web).await;
    let installed_server = if installed_before {
        reporter.success(&format!("{} already installed", config.package));
        false
    } else {
        reporter.step(&format!("installing {}...", config.package));
        run.settle(
            ProvisionState::ServerInstalled,
            server::install(host.packages, &config.package).await,
        )?;
        reporter.success(&format!("{} installed", config.package));
        true
    };
    run.advance(ProvisionState::ServerInstalled);

    // Step 3: Start if stopped. Queried now, not reused from earlier.
    let running_before = server::is_running(host.services, service).await;
    let started_server = if running_before {
        reporter.success(&format!("{service} running"));
        false
    } else {
        reporter.step(&format!("starting {service}..."));
        run.settle(
            ProvisionState::ServerRunning,
            server::start(host.services, service).await,
        )?;
        reporter.success(&format!("{service} started"));
        true
    };
    run.advance(ProvisionState::ServerRunning);

    // Step 4: Stage files (full replace).
    reporter.step(&format!(
        "staging {} into {}...",
        request.source_path.display(),
        target.deploy_dir.display()
    ));
    let owner = Ownership {
        user: &config.service_user,
        group: &config.service_group,
    };
    let staged = run.require(stage::stage(
        host.fs,
        reporter,
        &request.source_path,
        &target,
        owner,
    ))?;
    if let Some(soft) = staged.degraded.clone() {
        run.settle::<(), _>(ProvisionState::Staged, Err(soft))?;
    }
    reporter.success(&format!("staged {} file(s)", staged.files_copied));
    run.advance(ProvisionState::Staged);

    // Step 5: Write and enable the virtual host.
    reporter.step("writing site configuration...");
    let site = SiteConfig::new(&target, config.listen_port, &config.server_admin);
    let site_config_path = site.path_in(&config.sites_available_dir);
    let configured = run.settle(
        ProvisionState::Configured,
        site_config::generate(host.fs, host.web, &config.sites_available_dir, &site).await,
    )?;
    if configured.is_some() {
        reporter.success(&format!("site {} enabled", site.file_name()));
    }
    run.advance(ProvisionState::Configured);

    // Step 6: Register the alias.
    let alias = target.server_alias();
    let registered = run.settle(
        ProvisionState::Registered,
        hostname::register_alias(host.fs, &config.hosts_file, &config.loopback, &alias),
    )?;
    let alias_registered = registered.unwrap_or(false);
    match registered {
        Some(true) => reporter.success(&format!(
            "registered {alias} in {}",
            config.hosts_file.display()
        )),
        Some(false) => reporter.success(&format!("{alias} already registered")),
        None => {}
    }
    run.advance(ProvisionState::Registered);

    // Step 7: Apply configuration. Best effort.
    reporter.step(&format!("restarting {service}..."));
    let restarted = server::restart(host.services, service).await;
    if run.settle(ProvisionState::Restarted, restarted)?.is_some() {
        reporter.success(&format!("{service} restarted"));
    }
    run.advance(ProvisionState::Restarted);

    run.advance(ProvisionState::Done);
    Ok(ProvisionReport {
        application_name: request.application_name,
        deploy_dir: staged.deploy_dir,
        site_config_path,
        url: format!("http://{alias}/"),
        server_alias: alias,
        server_before: ServerState {
            installed: installed_before,
            running: running_before,
        },
        installed_server,
        started_server,
        files_copied: staged.files_copied,
        alias_registered,
        soft_failures: run.soft_failures,
        transitions: run.transitions,
    })
}

/// Build the request, checking the source exists right now.
fn resolve_request(
    fs: &impl DeployFs,
    input: &ProvisionInput<'_>,
) -> Result<ProvisioningRequest, FatalError> {
    if !fs.exists(input.source) {
        return Err(FatalError::SourceNotFound(input.source.to_path_buf()));
    }
    ProvisioningRequest::new(input.source.to_path_buf(), input.name)
}
