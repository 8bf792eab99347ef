//! Local host-name registration.

use std::path::Path;

use crate::application::ports::DeployFs;
use crate::domain::error::SoftError;
use crate::domain::hosts;

/// Ensure `alias` resolves to `loopback` via the hosts table.
///
/// Returns `true` if a line was appended, `false` if the alias was already
/// present. Existing lines are never rewritten. A missing table is treated as
/// empty and created on append.
///
/// # Errors
///
/// Returns [`SoftError::Registration`] if the table cannot be read or appended.
pub fn register_alias(
    fs: &impl DeployFs,
    hosts_file: &Path,
    loopback: &str,
    alias: &str,
) -> Result<bool, SoftError> {
    let current = if fs.exists(hosts_file) {
        fs.read_to_string(hosts_file)
            .map_err(|e| SoftError::Registration(format!("{e:#}")))?
    } else {
        String::new()
    };

    let Some(addition) = hosts::append_for(&current, loopback, alias) else {
        return Ok(false);
    };
    fs.append(hosts_file, &addition)
        .map_err(|e| SoftError::Registration(format!("{e:#}")))?;
    Ok(true)
}
