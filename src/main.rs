//! metrics-hub service binary.
//!
//! Wires the collection pipeline together: one registry, one store, one
//! broadcaster and one sampler loop, all shared with the HTTP surface.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metrics_hub::broadcast::Broadcaster;
use metrics_hub::config::{self, HubConfig};
use metrics_hub::health::HealthAggregator;
use metrics_hub::http::{AppState, HttpServer};
use metrics_hub::lifecycle::Shutdown;
use metrics_hub::registry::MetricRegistry;
use metrics_hub::sampler::{Sampler, SysinfoSource};
use metrics_hub::store::TimeSeriesStore;

#[derive(Parser)]
#[command(name = "metrics-hub")]
#[command(about = "Metrics collection, retention and live broadcast service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metrics_hub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("metrics-hub v0.1.0 starting");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => HubConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        interval_secs = config.sampling.interval_secs,
        retention_secs = config.sampling.retention_secs,
        dependencies = config.health.dependencies.len(),
        "Configuration loaded"
    );

    let registry = Arc::new(MetricRegistry::new());
    let store = Arc::new(TimeSeriesStore::new(config.sampling.retention()));
    let broadcaster = Arc::new(Broadcaster::new(config.live.buffer_size));
    let health = Arc::new(HealthAggregator::new(
        config.health.dependencies.clone(),
        config.health.timeout(),
    ));

    let sampler = Sampler::new(
        Arc::new(SysinfoSource::new()),
        registry.clone(),
        store.clone(),
        broadcaster.clone(),
        config.sampling.interval(),
    );
    let sampler_liveness = sampler.last_cycle_handle();

    let shutdown = Shutdown::new();

    let sampler_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        sampler.run(sampler_shutdown).await;
    });

    let state = AppState {
        registry,
        store,
        broadcaster,
        health,
        sampler_liveness,
        sampling_interval: config.sampling.interval(),
        started_at: Instant::now(),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, state);
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    shutdown.trigger();

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
