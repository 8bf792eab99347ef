//! Stylesheet for terminal output.
//!
//! Every style starts plain; `colorize` switches them on when the terminal
//! and flags allow it.

use owo_colors::Style;

/// Styles for each kind of transcript line.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` marks and the success summary.
    pub success: Style,
    /// `!` soft-failure marks and the degraded summary.
    pub warning: Style,
    /// `✗` mark on a halted pass.
    pub error: Style,
    /// `→` step marks.
    pub step: Style,
    /// Timestamps and summary keys.
    pub dim: Style,
    /// Section titles.
    pub header: Style,
}

impl Styles {
    /// Turn on ANSI colors.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red().bold();
        self.step = Style::new().cyan();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold();
    }
}
