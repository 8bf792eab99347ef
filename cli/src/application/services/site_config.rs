//! Virtual-host generation and activation.
//!
//! Every failure here is soft: a missing virtual host costs reachability by
//! name but leaves the staged files intact.

use std::path::{Path, PathBuf};

use crate::application::ports::{DeployFs, WebServer};
use crate::domain::error::SoftError;
use crate::domain::site::SiteConfig;

/// Write the rendered artifact to `sites_dir`, overwriting any previous
/// version for the same application.
///
/// # Errors
///
/// Returns [`SoftError::Config`] if the file cannot be written.
pub fn write(fs: &impl DeployFs, sites_dir: &Path, site: &SiteConfig) -> Result<PathBuf, SoftError> {
    let path = site.path_in(sites_dir);
    fs.write(&path, &site.render())
        .map_err(|e| SoftError::Config(format!("{e:#}")))?;
    Ok(path)
}

/// Activate a written artifact through the server's site-enable primitive.
///
/// # Errors
///
/// Returns [`SoftError::Config`] if the primitive cannot run or exits non-zero.
pub async fn activate(web: &impl WebServer, site: &SiteConfig) -> Result<(), SoftError> {
    let file_name = site.file_name();
    match web.enable_site(&file_name).await {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => Err(SoftError::Config(format!(
            "enabling {file_name} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
        Err(e) => Err(SoftError::Config(format!("enabling {file_name}: {e:#}"))),
    }
}

/// Write then activate. Returns the artifact path.
///
/// # Errors
///
/// Returns [`SoftError::Config`] from whichever half failed first.
pub async fn generate(
    fs: &impl DeployFs,
    web: &impl WebServer,
    sites_dir: &Path,
    site: &SiteConfig,
) -> Result<PathBuf, SoftError> {
    let path = write(fs, sites_dir, site)?;
    activate(web, site).await?;
    Ok(path)
}
