//! Garden Cache - line-protocol front end for the content cache
//!
//! Reads one command per line on stdin and writes one JSON response per line
//! on stdout. Logs go to stderr.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garden_cache::protocol::handle_line;
use garden_cache::{spawn_sweeper, Config, ContentCache};

/// Main entry point for the garden cache.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the content cache
/// 4. Start the expiry sweeper if an interval is configured
/// 5. Serve stdin commands until EOF, Ctrl+C or SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" for this crate, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garden_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting garden cache");

    let config = Config::from_env();
    info!(
        content_root = %config.content_root.display(),
        ttl_secs = config.ttl.as_secs(),
        max_entries = config.max_entries.get(),
        sweep_interval_secs = config.sweep_interval.map(|d| d.as_secs()),
        "Configuration loaded"
    );
    if !config.content_root.is_dir() {
        warn!(
            content_root = %config.content_root.display(),
            "Content root is not a directory; every lookup will miss"
        );
    }

    let cache = Arc::new(ContentCache::from_config(&config));

    let sweeper = config
        .sweep_interval
        .map(|interval| spawn_sweeper(Arc::clone(cache.store()), interval));
    if sweeper.is_some() {
        info!("Background expiry sweeper started");
    }

    let result = tokio::select! {
        result = serve_stdin(Arc::clone(&cache)) => result,
        _ = shutdown_signal() => Ok(()),
    };

    if let Some(handle) = sweeper {
        handle.abort();
        warn!("Expiry sweeper aborted");
    }

    let stats = cache.stats();
    info!(
        hits = stats.store.hits,
        misses = stats.store.misses,
        loads = stats.loads,
        "Garden cache shutdown complete"
    );
    result
}

/// Answers stdin commands until EOF.
async fn serve_stdin(cache: Arc<ContentCache>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        // Loading is blocking file I/O
        let cache = Arc::clone(&cache);
        let response = tokio::task::spawn_blocking(move || handle_line(&cache, &line))
            .await
            .context("command task panicked")?;

        if let Some(response) = response {
            let mut out = response.to_json_line();
            out.push('\n');
            stdout
                .write_all(out.as_bytes())
                .await
                .context("failed to write response")?;
            stdout.flush().await.context("failed to flush stdout")?;
        }
    }

    info!("stdin closed");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
