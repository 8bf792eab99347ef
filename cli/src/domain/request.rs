//! Provisioning request and deployment target.
//!
//! Pure functions only. Whether `source_path` exists is checked by the
//! application layer through the filesystem port.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::FatalError;

/// Suffix appended to the application name to form its local alias.
pub const ALIAS_SUFFIX: &str = ".local";

/// Valid names are usable both as a directory name and a DNS label.
pub static APPLICATION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("valid regex")
});

/// What the operator asked for, after name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    pub source_path: PathBuf,
    pub application_name: String,
}

impl ProvisioningRequest {
    /// Build a request, deriving the application name from the final path
    /// component of `source_path` when no override is given.
    ///
    /// # Errors
    ///
    /// Returns [`FatalError::InvalidApplicationName`] if the resulting name is
    /// empty or not a valid directory name / host-name label.
    pub fn new(source_path: PathBuf, name_override: Option<&str>) -> Result<Self, FatalError> {
        let application_name = match name_override {
            Some(name) => name.to_owned(),
            None => derive_application_name(&source_path).ok_or_else(|| {
                FatalError::InvalidApplicationName(source_path.display().to_string())
            })?,
        };
        validate_application_name(&application_name)?;
        Ok(Self {
            source_path,
            application_name,
        })
    }

    /// Where this request deploys to under `serving_root`.
    #[must_use]
    pub fn target(&self, serving_root: &Path) -> DeploymentTarget {
        DeploymentTarget::new(&self.application_name, serving_root)
    }
}

/// Final path component of `source`, if it is valid UTF-8.
#[must_use]
pub fn derive_application_name(source: &Path) -> Option<String> {
    source
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
}

/// Check that `name` is a non-empty directory name and host-name label.
///
/// # Errors
///
/// Returns [`FatalError::InvalidApplicationName`] otherwise.
pub fn validate_application_name(name: &str) -> Result<(), FatalError> {
    if APPLICATION_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(FatalError::InvalidApplicationName(name.to_owned()))
    }
}

/// Canonical location of one application's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub application_name: String,
    pub deploy_dir: PathBuf,
}

impl DeploymentTarget {
    #[must_use]
    pub fn new(application_name: &str, serving_root: &Path) -> Self {
        Self {
            application_name: application_name.to_owned(),
            deploy_dir: serving_root.join(application_name),
        }
    }

    /// `<name>.local`
    #[must_use]
    pub fn server_alias(&self) -> String {
        format!("{}{ALIAS_SUFFIX}", self.application_name)
    }
}
