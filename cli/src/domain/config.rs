//! Domain types for siteup configuration.
//!
//! Pure types only: no I/O, no async, no filesystem access.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Host layout and collaborator bindings, stored in `/etc/siteup/config.yaml`.
///
/// Every field has a default targeting a Debian/Ubuntu Apache host, so an
/// absent or partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Canonical serving root; each application gets one subdirectory.
    pub serving_root: PathBuf,
    /// Directory the per-application virtual-host files are written to.
    pub sites_available_dir: PathBuf,
    /// Static name-resolution table.
    pub hosts_file: PathBuf,
    /// Package providing the web server.
    pub package: String,
    /// Service-manager unit name of the web server.
    pub service: String,
    /// Executable probed to decide whether the server is installed.
    pub server_binary: String,
    /// Identity the server runs as; staged files are owned by it.
    pub service_user: String,
    /// Group of the service identity.
    pub service_group: String,
    /// Port in the `<VirtualHost *:PORT>` directive.
    pub listen_port: u16,
    /// `ServerAdmin` contact.
    pub server_admin: String,
    /// Address aliases are mapped to in the hosts table.
    pub loopback: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            serving_root: PathBuf::from("/var/www"),
            sites_available_dir: PathBuf::from("/etc/apache2/sites-available"),
            hosts_file: PathBuf::from("/etc/hosts"),
            package: "apache2".to_string(),
            service: "apache2".to_string(),
            server_binary: "apache2".to_string(),
            service_user: "www-data".to_string(),
            service_group: "www-data".to_string(),
            listen_port: 80,
            server_admin: "webmaster@localhost".to_string(),
            loopback: "127.0.0.1".to_string(),
        }
    }
}
