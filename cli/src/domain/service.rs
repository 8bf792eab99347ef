//! Server state as observed from the host.

use serde::Serialize;

/// Substring the service manager prints for a live unit.
pub const RUNNING_MARKER: &str = "active (running)";

/// Live server state. Never cached: every query reflects the host at the
/// moment it is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerState {
    pub installed: bool,
    pub running: bool,
}

/// Interpret free-text status output from the service manager.
///
/// This is a brittle contract with `systemctl status` wording: only the
/// explicit [`RUNNING_MARKER`] counts as running. Any other text, including
/// `active (exited)` and `activating`, is treated as not running.
#[must_use]
pub fn parse_running(status_text: &str) -> bool {
    status_text.contains(RUNNING_MARKER)
}
