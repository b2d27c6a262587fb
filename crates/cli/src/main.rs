//! Build notifier entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** from flags and the environment; a missing
//!    webhook URL stops the process before anything else happens.
//! 2. **Wire logging** through `tracing-subscriber`.
//! 3. **Construct infrastructure** once: the chat webhook dispatcher, the
//!    credential provider, and the Cloud Build client. They are shared,
//!    read-only, by every invocation.
//! 4. **Select the mode**:
//!    - `serve` receives Pub/Sub push deliveries until Ctrl+C.
//!    - `handle` runs the pipeline once on a message read from a file or stdin.

mod config;
mod envelope;
mod observability;

use std::sync::Arc;

use anyhow::Context;
use chat::WebhookDispatcher;
use clap::Parser;
use cloudbuild::{discover_credentials, CloudBuildClient};
use pipeline::{LookupFailurePolicy, Notifier};
use tracing::{info, warn};

use crate::config::{Cli, Command};

async fn build_notifier(cli: &Cli) -> anyhow::Result<Notifier> {
    let dispatcher = WebhookDispatcher::new(cli.webhook_url()?)?;

    let tokens = discover_credentials(cli.access_token.clone()).await?;
    let lookup = CloudBuildClient::with_endpoint(&cli.cloudbuild_endpoint, tokens)?;

    let policy: LookupFailurePolicy = cli.lookup_failure.into();
    info!(?policy, endpoint = %cli.cloudbuild_endpoint, "Notifier configured");

    Ok(Notifier::new(Arc::new(lookup), Arc::new(dispatcher)).with_lookup_failure_policy(policy))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C; shutting down"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    observability::init(cli.log_format)?;

    let notifier = Arc::new(
        build_notifier(&cli)
            .await
            .context("failed to initialise the notifier")?,
    );

    match cli.command {
        Command::Serve { address, port } => {
            let socket = listener::bind(&format!("{address}:{port}")).await?;
            listener::serve(socket, notifier, shutdown_signal()).await?;
        }
        Command::Handle { envelope: source } => {
            let message = envelope::read_envelope(&source).await?;
            let outcome = notifier.handle(&message).await?;
            info!(?outcome, "Invocation finished");
        }
    }

    Ok(())
}
