//! PlanPilot CLI Application
//!
//! Command-line front end of the lesson planning wizard.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use cli::Cli;
use log::{info, warn};
use planpilot_core::{generation::abort_pair, PlannerBuilder};
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        offline,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .offline(offline)
        .build()
        .await
        .context("Failed to initialize planner")?;

    let renderer = TerminalRenderer::new(!no_color);

    // Ctrl-C cancels a running generation request; the draft stays as it was.
    let (abort, signal) = abort_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling generation");
            abort.abort();
        }
    });

    info!("PlanPilot started with {} generator", planner.generator_name());

    Cli::new(planner, renderer, signal).run(command).await
}
