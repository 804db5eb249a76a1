use std::process::ExitCode;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio::config::Config;
use folio::workflow::{
    log_progress, GenerationWorkflow, HttpStatusSource, StdoutNavigator, WorkflowOutcome,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("folio={0},folio_watch={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting folio-watch v{}", env!("CARGO_PKG_VERSION"));

    let source = HttpStatusSource::new(&config.check_status_url, config.request_timeout)?;
    let workflow = GenerationWorkflow::new(config.workflow(), source, StdoutNavigator);

    let progress = tokio::spawn(log_progress(workflow.subscribe()));

    let outcome = tokio::select! {
        outcome = workflow.run() => Some(outcome),
        _ = tokio::signal::ctrl_c() => None,
    };
    if outcome.is_some() {
        // Stops by itself once it has logged the terminal state.
        let _ = progress.await;
    } else {
        progress.abort();
    }

    match outcome {
        Some(WorkflowOutcome::Complete { redirect_url }) => {
            info!(redirect_url = %redirect_url, "Done");
            Ok(ExitCode::SUCCESS)
        }
        Some(WorkflowOutcome::Exhausted {
            checks,
            errors,
            retry_url,
        }) => {
            warn!(checks, errors, "Generation did not finish in time");
            if let Some(url) = retry_url {
                warn!(retry_url = %url, "Restart generation from the templates page");
            }
            Ok(ExitCode::FAILURE)
        }
        None => {
            info!("Interrupted, abandoning status polling");
            Ok(ExitCode::from(130))
        }
    }
}
