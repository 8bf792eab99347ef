//! `siteup <SOURCE>`: provision the server and deploy one application.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::provision::{self as service, ProvisionInput};
use crate::output::json;

/// Arguments for the deploy command.
#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    /// Application source: a directory whose contents are served, or a single file
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Application name [default: final component of SOURCE]
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Run the provisioning pass and report the outcome.
///
/// # Errors
///
/// Returns an error if the pass stops on a fatal failure.
pub async fn run(args: &DeployArgs, app: &AppContext) -> Result<()> {
    let reporter = app.terminal_reporter();
    let input = ProvisionInput {
        source: &args.source,
        name: args.name.as_deref(),
    };

    match service::provision(&app.host(), &app.config, &input, &reporter).await {
        Ok(report) => {
            if app.is_json() {
                println!("{}", json::format_report(&report)?);
            } else {
                app.renderer().render_report(&report);
            }
            Ok(())
        }
        Err(err) => {
            tracing::debug!(state = %err.state, "provisioning halted");
            if app.is_json() {
                println!("{}", json::format_provision_error(&err)?);
            } else {
                app.renderer().render_halt(&err);
            }
            Err(err.into())
        }
    }
}
