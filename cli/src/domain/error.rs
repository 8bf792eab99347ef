//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//!
//! Failures are split by policy rather than by origin: a [`FatalError`] halts
//! the provisioning pass, a [`SoftError`] is logged and the pass continues.
//! Each step returns the narrower of the two; the orchestrator lifts results
//! into [`Failure`] and branches on the variant.

use std::path::PathBuf;

use thiserror::Error;

// ── Fatal errors ──────────────────────────────────────────────────────────────

/// Failures that abort the run. No further transitions are attempted.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("Insufficient privilege: siteup must run as root (try: sudo siteup ...)")]
    InsufficientPrivilege,

    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error(
        "Invalid application name '{0}': must match ^[A-Za-z0-9]([A-Za-z0-9-]{{0,61}}[A-Za-z0-9])?$"
    )]
    InvalidApplicationName(String),

    #[error("Failed to install server package: {0}")]
    InstallError(String),

    #[error("Failed to start server: {0}")]
    StartError(String),

    #[error(
        "Source {} and deploy directory {} overlap; staging would destroy the source",
        .source_path.display(),
        .deploy_dir.display()
    )]
    StageOverlap {
        source_path: PathBuf,
        deploy_dir: PathBuf,
    },

    #[error("Failed to remove previous deployment at {}: {reason}", .path.display())]
    StageRemovalFailed { path: PathBuf, reason: String },

    #[error("Failed to copy {} into {}: {reason}", .source_path.display(), .deploy_dir.display())]
    StageCopyFailed {
        source_path: PathBuf,
        deploy_dir: PathBuf,
        reason: String,
    },
}

impl FatalError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientPrivilege => "INSUFFICIENT_PRIVILEGE",
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::InvalidApplicationName(_) => "INVALID_APPLICATION_NAME",
            Self::InstallError(_) => "INSTALL_FAILED",
            Self::StartError(_) => "START_FAILED",
            Self::StageOverlap { .. } => "STAGE_OVERLAP",
            Self::StageRemovalFailed { .. } => "STAGE_REMOVAL_FAILED",
            Self::StageCopyFailed { .. } => "STAGE_COPY_FAILED",
        }
    }
}

// ── Soft errors ───────────────────────────────────────────────────────────────

/// Failures that degrade the deployment but never stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoftError {
    #[error("Could not apply ownership/permissions: {0}")]
    PermissionApply(String),

    #[error("Could not write or enable site configuration: {0}")]
    Config(String),

    #[error("Could not register host name: {0}")]
    Registration(String),

    #[error("Could not restart server: {0}")]
    Restart(String),
}

// ── Step outcome ──────────────────────────────────────────────────────────────

/// Failure of a single provisioning step, tagged with its policy.
#[derive(Debug, Error)]
pub enum Failure {
    #[error(transparent)]
    Fatal(#[from] FatalError),

    #[error(transparent)]
    Soft(#[from] SoftError),
}
