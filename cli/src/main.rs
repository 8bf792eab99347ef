//! siteup - provision a web server host and deploy a site onto it

use clap::Parser;
use tracing_subscriber::EnvFilter;

use siteup_cli::cli::{Cli, interrupted, run_until_interrupted};

/// Environment variable holding the `tracing` filter directive.
const LOG_ENV: &str = "SITEUP_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = run_until_interrupted(cli.run(), interrupted()).await;
    std::process::exit(code);
}
