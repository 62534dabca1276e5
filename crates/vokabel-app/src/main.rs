use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use vokabel_config::Config;
use vokabel_core::Session;
use vokabel_store::{FileBackend, MemoryBackend, Store};
use vokabel_translator::{ChatEnricher, Enricher};

mod cli;
mod controller;
mod events;
mod io;
mod logging;
mod terminal;


use cli::Cli;
use controller::AppController;
use events::event_loop;
use logging::init_tracing;
use terminal::TerminalSurface;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.store {
        config.store.path = path.clone();
    }

    let store = if cli.ephemeral {
        tracing::info!("Using in-memory vocabulary");
        Store::load(MemoryBackend::new())
    } else {
        tracing::info!("Vocabulary file: {}", config.store.path.display());
        Store::load(FileBackend::new(&config.store.path))
    };

    let enricher: Arc<dyn Enricher> = Arc::new(ChatEnricher::new(&config.translator)?);
    let metadata = enricher.metadata();
    tracing::info!(
        "Enrichment via {} ({}), configured: {}",
        metadata.name,
        metadata.model,
        enricher.is_configured()
    );

    let controller = AppController::new();
    let host = TerminalSurface::new(cli.command.document());
    let session = Session::new(
        &config,
        host,
        store,
        enricher,
        controller.completion_sender(),
    );

    let input = if cli.command.is_interactive() {
        Some(controller.spawn_input())
    } else {
        let tx = controller.event_sender();
        for event in cli.command.into_events() {
            tx.send(event).await?;
        }
        None
    };

    let events_rx = controller.event_receiver();
    let completions_rx = controller.completion_receiver();

    tokio::select! {
        result = event_loop(session, events_rx, completions_rx) => {
            result?;
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            controller.shutdown();
            // A blocking stdin read would otherwise hold the runtime open
            std::process::exit(130);
        }
    }

    controller.shutdown();
    if let Some(input) = input {
        match input.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Input watcher failed: {}", e),
            Err(e) => tracing::error!("Input watcher panicked: {}", e),
        }
    }

    Ok(())
}
