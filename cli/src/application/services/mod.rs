//! Application services: use-case orchestration.
//!
//! Each service module implements a single step of the provisioning pass by
//! composing domain logic with port trait calls; `provision` sequences them.
//! Services import only from `crate::domain` and `crate::application::ports`,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

pub mod hostname;
pub mod privilege;
pub mod provision;
pub mod server;
pub mod site_config;
pub mod stage;
