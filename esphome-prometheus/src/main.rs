//! Prometheus exporter for ESPHome-style entity state.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use esphome_common::load_snapshot;
use esphome_prometheus::{EntityStore, ExporterConfig, HttpServer, MetricRenderer};

/// Prometheus exporter for ESPHome-style entity state.
#[derive(Parser, Debug)]
#[command(name = "esphome-prometheus")]
#[command(about = "Serve ESPHome entity state as Prometheus metrics")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<String>,

    /// HTTP listen address (overrides config).
    #[arg(long)]
    listen: Option<String>,

    /// Entity state snapshot (overrides config).
    #[arg(long)]
    state_file: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

/// Load the snapshot into the store, keeping the previous entities on failure.
fn reload(store: &EntityStore, path: &str) {
    match load_snapshot(path) {
        Ok(entities) => {
            debug!(path = %path, entities = entities.len(), "Loaded state snapshot");
            store.replace_all(entities);
        }
        Err(e) => {
            warn!(
                path = %path,
                error = %e,
                "Failed to load state snapshot, keeping previous state"
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = if let Some(config_path) = &args.config {
        ExporterConfig::load_from_file(config_path)?
    } else {
        ExporterConfig::default()
    };

    if let Some(listen) = args.listen {
        config.prometheus.listen = listen;
    }
    if let Some(state_file) = args.state_file {
        config.source.state_file = Some(state_file);
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    esphome_common::init_tracing(&config.logging)?;

    info!("Starting ESPHome Prometheus exporter");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let relabel = config.relabel_store()?;
    info!(entities = relabel.len(), "Loaded relabel overrides");
    let renderer = Arc::new(MetricRenderer::new(relabel, config.render_options()));
    info!(kinds = ?renderer.kinds(), "Rendering entity kinds");

    let store = Arc::new(EntityStore::new());

    let listen_addr = config
        .prometheus
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    let http_server = HttpServer::new(
        renderer,
        store.clone(),
        listen_addr,
        config.prometheus.path.clone(),
    );

    // Snapshot reload task
    let reload_task = config.source.state_file.clone().map(|path| {
        let reload_store = store.clone();
        let reload_interval = Duration::from_secs(config.source.reload_interval_secs);
        let mut reload_shutdown = shutdown_rx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(reload_interval);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        reload(&reload_store, &path);
                    }
                    _ = reload_shutdown.changed() => {
                        if *reload_shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    });

    if reload_task.is_none() {
        warn!("No state file configured, the registry stays empty");
    }

    let http_shutdown = shutdown_rx.clone();
    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.run(http_shutdown).await {
            error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate() => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    shutdown_tx.send(true)?;

    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = http_task.await;
        if let Some(task) = reload_task {
            let _ = task.await;
        }
    })
    .await;

    info!(entities = store.len(), "Exporter stopped");
    Ok(())
}

/// Resolves on SIGTERM. Never resolves where the signal is unavailable.
async fn terminate() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        std::future::pending::<()>().await;
    }
}
