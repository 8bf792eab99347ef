//! Privilege guard: must pass before anything touches the host.

use crate::application::ports::PrivilegeProbe;
use crate::domain::error::FatalError;

/// Fail with [`FatalError::InsufficientPrivilege`] unless the process is
/// elevated.
///
/// # Errors
///
/// Returns [`FatalError::InsufficientPrivilege`] when the probe reports no
/// elevated rights.
pub fn ensure_elevated(probe: &impl PrivilegeProbe) -> Result<(), FatalError> {
    if probe.is_elevated() {
        Ok(())
    } else {
        Err(FatalError::InsufficientPrivilege)
    }
}
