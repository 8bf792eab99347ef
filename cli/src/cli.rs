//! CLI argument parsing with clap derive

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::output::{json, timestamp};

/// Exit code for a fatal failure.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the operator interrupts the run (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Install a web server and deploy a site onto it
#[derive(Parser)]
#[command(name = "siteup", version, arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub deploy: commands::deploy::DeployArgs,

    /// Configuration file [default: $SITEUP_CONFIG or /etc/siteup/config.yaml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output the final report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// Execute the deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the provisioning
    /// pass fails fatally.
    pub async fn run(self) -> Result<()> {
        let Cli {
            deploy,
            config,
            json,
            quiet,
            no_color,
        } = self;
        let app = match AppContext::new(AppFlags {
            no_color,
            quiet,
            json,
            config,
        }) {
            Ok(app) => app,
            Err(e) => {
                if json {
                    println!("{}", json::format_error(&format!("{e:#}"), "CONFIG_INVALID")?);
                }
                return Err(e);
            }
        };
        commands::deploy::run(&deploy, &app).await
    }
}

/// Drive `run` to completion unless `signal` resolves first, and map the
/// outcome to a process exit code.
///
/// Errors are printed timestamped to stderr. On interruption the run future
/// is dropped, which kills any child it spawned; changes already applied
/// stay in place.
pub async fn run_until_interrupted<F, S>(run: F, signal: S) -> i32
where
    F: Future<Output = Result<()>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        biased;
        () = signal => {
            eprintln!(
                "[{}] Interrupted. Changes already applied are kept; re-run to finish.",
                timestamp()
            );
            EXIT_INTERRUPTED
        }
        result = run => match result {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("[{}] Error: {e:#}", timestamp());
                EXIT_FAILURE
            }
        },
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
