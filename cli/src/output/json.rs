//! JSON output helpers for `--json`.

use anyhow::{Context, Result};

use crate::application::services::provision::{ProvisionError, ProvisionReport};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a fatal provisioning failure, including the state it stopped in.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_provision_error(err: &ProvisionError) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": err.error.to_string(),
        "code": err.error.code(),
        "state": err.state,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a completed provisioning report.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &ProvisionReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("JSON serialization failed")
}
