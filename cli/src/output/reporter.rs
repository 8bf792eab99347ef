//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, timestamp};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// Every line starts with a `[YYYY-MM-DD HH:MM:SS]` timestamp.
///
/// - `step()` prints `→ {message}` to stdout (suppressed when `ctx.quiet`)
/// - `success()` prints `✓ {message}` to stdout (suppressed when `ctx.quiet`)
/// - `warn()` delegates to [`OutputContext::warn`]: stderr, never suppressed
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    fn stamp(&self) -> String {
        format!("[{}]", timestamp())
            .style(self.ctx.styles.dim)
            .to_string()
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("{} {} {message}", self.stamp(), "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            println!("{} {} {message}", self.stamp(), "✓".style(self.ctx.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }
}
