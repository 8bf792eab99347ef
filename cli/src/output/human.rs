//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::provision::{ProvisionError, ProvisionReport};
use crate::output::{OutputContext, timestamp};

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the final deployment summary.
    ///
    /// Soft failures were already printed live on stderr; the recap goes to
    /// the same stream through [`OutputContext::warn`]. Under `--quiet` only
    /// the live lines remain.
    pub fn render_report(&self, report: &ProvisionReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        if report.is_degraded() {
            self.ctx.header(&format!(
                "Deployed '{}' with {} warning(s).",
                report.application_name,
                report.soft_failures.len()
            ));
        } else {
            self.ctx
                .success(&format!("Deployed '{}'.", report.application_name));
        }
        self.ctx.kv("Path:", &report.deploy_dir.display().to_string());
        self.ctx
            .kv("Site config:", &report.site_config_path.display().to_string());
        self.ctx.kv("URL:", &report.url);

        for failure in &report.soft_failures {
            self.ctx.warn(&format!("[{}] {}", failure.state, failure.message));
        }
    }

    /// Name the state a halted pass stopped in. Goes to stderr and is never
    /// suppressed; the error itself is printed by `main`.
    pub fn render_halt(&self, err: &ProvisionError) {
        eprintln!(
            "{} {} stopped after state '{}' ({})",
            format!("[{}]", timestamp()).style(self.ctx.styles.dim),
            "✗".style(self.ctx.styles.error),
            err.state,
            err.error.code()
        );
    }
}
