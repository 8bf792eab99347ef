//! Web server lifecycle: installed/running queries and their mutations.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Install and start failures are fatal; restart failures are soft because
//! the staged content is already in place.

use std::process::Output;

use crate::application::ports::{PackageManager, ServiceManager, WebServer};
use crate::domain::error::{FatalError, SoftError};
use crate::domain::service::parse_running;

/// Whether the server binary responds to a version probe.
///
/// A missing executable shows up as a spawn error and maps to `false`.
pub async fn is_installed(web: &impl WebServer) -> bool {
    web.version().await.is_ok_and(|o| o.status.success())
}

/// Whether the service manager reports the unit as running.
///
/// Fails closed: a query error or any text other than the running marker
/// yields `false`.
pub async fn is_running(services: &impl ServiceManager, service: &str) -> bool {
    match services.status(service).await {
        Ok(output) => parse_running(&String::from_utf8_lossy(&output.stdout)),
        Err(e) => {
            tracing::debug!(service, error = %e, "status query failed");
            false
        }
    }
}

/// Refresh the package index, then install `package`.
///
/// # Errors
///
/// Returns [`FatalError::InstallError`] if either step cannot run or exits
/// non-zero.
pub async fn install(packages: &impl PackageManager, package: &str) -> Result<(), FatalError> {
    let refresh = packages.refresh_index().await;
    check(refresh, "package index refresh").map_err(FatalError::InstallError)?;
    let install = packages.install(package).await;
    check(install, &format!("installing {package}")).map_err(FatalError::InstallError)
}

/// Start `service`.
///
/// # Errors
///
/// Returns [`FatalError::StartError`] if the service manager reports failure.
pub async fn start(services: &impl ServiceManager, service: &str) -> Result<(), FatalError> {
    let result = services.start(service).await;
    check(result, &format!("starting {service}")).map_err(FatalError::StartError)
}

/// Restart `service` to apply new configuration.
///
/// # Errors
///
/// Returns [`SoftError::Restart`] if the service manager reports failure.
pub async fn restart(services: &impl ServiceManager, service: &str) -> Result<(), SoftError> {
    let result = services.restart(service).await;
    check(result, &format!("restarting {service}")).map_err(SoftError::Restart)
}

/// Collapse a command result into `Ok` or a one-line reason.
fn check(result: anyhow::Result<Output>, what: &str) -> Result<(), String> {
    match result {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            Err(format!("{what} exited with {code}: {}", stderr.trim()))
        }
        Err(e) => Err(format!("{what}: {e:#}")),
    }
}
