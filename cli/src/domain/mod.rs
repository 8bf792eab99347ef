//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod hosts;
pub mod request;
pub mod service;
pub mod site;

pub use config::DeployConfig;
pub use error::{Failure, FatalError, SoftError};
pub use request::{DeploymentTarget, ProvisioningRequest};
pub use service::ServerState;
pub use site::SiteConfig;
