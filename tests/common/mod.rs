//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use metrics_hub::broadcast::Broadcaster;
use metrics_hub::config::{DependencyConfig, HubConfig};
use metrics_hub::health::HealthAggregator;
use metrics_hub::http::{AppState, HttpServer};
use metrics_hub::lifecycle::Shutdown;
use metrics_hub::registry::MetricRegistry;
use metrics_hub::store::{unix_millis_now, TimeSeriesStore};

/// Start a mock dependency that answers every request with the given
/// status and a short body. Returns the bound address.
#[allow(dead_code)]
pub async fn start_mock_backend(status: u16) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let status_text = match status {
                            200 => "200 OK",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let body = "ok";
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that accepts connections and never responds, to force
/// health-check timeouts.
#[allow(dead_code)]
pub async fn start_unresponsive_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, _)) => held.push(socket),
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on (bind, read the port, drop the socket).
#[allow(dead_code)]
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running hub with handles into its shared state.
#[allow(dead_code)]
pub struct TestHub {
    pub addr: SocketAddr,
    pub registry: Arc<MetricRegistry>,
    pub store: Arc<TimeSeriesStore>,
    pub broadcaster: Arc<Broadcaster>,
    pub shutdown: Shutdown,
}

/// Start a full hub on an ephemeral port. The sampler loop is not
/// spawned; its liveness cell is primed so /health sees a fresh cycle.
pub async fn start_hub(dependencies: Vec<DependencyConfig>, timeout: Duration) -> TestHub {
    let config = HubConfig::default();

    let registry = Arc::new(MetricRegistry::new());
    let store = Arc::new(TimeSeriesStore::new(Duration::from_secs(3600)));
    let broadcaster = Arc::new(Broadcaster::new(16));
    let health = Arc::new(HealthAggregator::new(dependencies, timeout));

    let state = AppState {
        registry: registry.clone(),
        store: store.clone(),
        broadcaster: broadcaster.clone(),
        health,
        sampler_liveness: Arc::new(AtomicU64::new(unix_millis_now())),
        sampling_interval: config.sampling.interval(),
        started_at: Instant::now(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(&config, state);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestHub {
        addr,
        registry,
        store,
        broadcaster,
        shutdown,
    }
}
