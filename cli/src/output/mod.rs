//! Output formatting module

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use std::io::Write;

use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// `strftime` pattern for transcript timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time rendered with [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles, quiet }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a timestamped warning prefixed with `!` to stderr. Never
    /// suppressed: soft failures stay visible under `--quiet`.
    pub fn warn(&self, msg: &str) {
        let _ = self.write_warn(&mut std::io::stderr().lock(), msg);
    }

    /// Write the warning line `warn` prints to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn write_warn(&self, out: &mut impl Write, msg: &str) -> std::io::Result<()> {
        writeln!(
            out,
            "{} {} {msg}",
            format!("[{}]", timestamp()).style(self.styles.dim),
            "!".style(self.styles.warning)
        )
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<14}{value}", key.style(self.styles.dim));
        }
    }
}
