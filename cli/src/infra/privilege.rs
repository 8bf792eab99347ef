//! Infrastructure implementation of the `PrivilegeProbe` port.

use nix::unistd::geteuid;

use crate::application::ports::PrivilegeProbe;

/// Elevated means an effective uid of 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct EffectiveUid;

impl PrivilegeProbe for EffectiveUid {
    fn is_elevated(&self) -> bool {
        let euid = geteuid();
        tracing::debug!(euid = euid.as_raw(), "checked effective uid");
        euid.is_root()
    }
}
