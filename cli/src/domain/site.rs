//! Virtual-host configuration artifact.
//!
//! Pure rendering: the template is fixed and parameterised only by the
//! deployment target plus the listen port and admin contact from config.

use std::path::{Path, PathBuf};

use crate::domain::request::DeploymentTarget;

/// Everything the virtual-host file depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub application_name: String,
    pub deploy_dir: PathBuf,
    pub server_alias: String,
    pub listen_port: u16,
    pub server_admin: String,
}

impl SiteConfig {
    #[must_use]
    pub fn new(target: &DeploymentTarget, listen_port: u16, server_admin: &str) -> Self {
        Self {
            application_name: target.application_name.clone(),
            deploy_dir: target.deploy_dir.clone(),
            server_alias: target.server_alias(),
            listen_port,
            server_admin: server_admin.to_owned(),
        }
    }

    /// File name under the sites directory, also the argument to the
    /// site-enable primitive.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.conf", self.application_name)
    }

    /// Full path of the artifact under `sites_dir`.
    #[must_use]
    pub fn path_in(&self, sites_dir: &Path) -> PathBuf {
        sites_dir.join(self.file_name())
    }

    /// Render the virtual-host block.
    ///
    /// `${APACHE_LOG_DIR}` is left for the server to expand at load time.
    #[must_use]
    pub fn render(&self) -> String {
        let name = &self.application_name;
        let lines = [
            format!("<VirtualHost *:{}>", self.listen_port),
            format!("    ServerAdmin {}", self.server_admin),
            format!("    DocumentRoot {}", self.deploy_dir.display()),
            format!("    ServerName {name}"),
            format!("    ServerAlias {}", self.server_alias),
            format!("    ErrorLog ${{APACHE_LOG_DIR}}/{name}_error.log"),
            format!("    CustomLog ${{APACHE_LOG_DIR}}/{name}_access.log combined"),
            "</VirtualHost>".to_owned(),
        ];
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
