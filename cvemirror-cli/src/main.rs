mod args;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{Args, Command};
use cvemirror_api::state::AppState;
use cvemirror_db::CveStore;
use cvemirror_sync::{NvdClient, SyncConfig, run_sync};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing based on verbosity
    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let store = match args.db_path {
        Some(ref path) => CveStore::open(path)?,
        None => CveStore::open_default()?,
    };

    let client = NvdClient::new(args.feed_url.clone(), Duration::from_secs(args.timeout_secs))
        .context("failed to build feed client")?;
    let sync_config = SyncConfig {
        page_size: args.page_size,
    };

    match args.command {
        Command::Serve { listen } => {
            let state = Arc::new(AppState::new(store, Arc::new(client), sync_config));
            cvemirror_api::start_server(listen, state).await
        }
        Command::Sync => {
            info!(feed_url = %args.feed_url, page_size = args.page_size, "starting sync pass");
            let store = tokio::sync::Mutex::new(store);

            // Ctrl+C cancels between pages/records instead of killing mid-write.
            let cancel = CancellationToken::new();
            let cancel_on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received, finishing current record");
                    cancel_on_signal.cancel();
                }
            });

            let summary = run_sync(&client, &store, &sync_config, &cancel).await;
            println!(
                "{} inserted, {} skipped, {} failed across {} pages",
                summary.inserted, summary.skipped, summary.failed, summary.pages
            );
            if let Some(reason) = summary.incomplete {
                println!("sync incomplete: {reason}");
            }
            Ok(())
        }
    }
}
