//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, self-metrics)
//! - Serve with graceful shutdown

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::broadcast::{Broadcaster, LiveEvent};
use crate::config::HubConfig;
use crate::health::HealthAggregator;
use crate::http::{handlers, websocket};
use crate::registry::MetricRegistry;
use crate::store::{unix_millis_now, TimeSeriesStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MetricRegistry>,
    pub store: Arc<TimeSeriesStore>,
    pub broadcaster: Arc<Broadcaster>,
    pub health: Arc<HealthAggregator>,
    /// Wall-clock millis of the sampler's last completed cycle (0 = none).
    pub sampler_liveness: Arc<AtomicU64>,
    pub sampling_interval: Duration,
    pub started_at: Instant,
}

/// HTTP server for the metrics hub.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and state.
    pub fn new(config: &HubConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &HubConfig, state: AppState) -> Router {
        Router::new()
            .route("/metrics", get(handlers::metrics))
            .route("/health", get(handlers::health))
            .route("/live", get(websocket::live_handler))
            .route("/api/summary", get(handlers::summary))
            .route("/api/history/{name}", get(handlers::history))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                track_request,
            ))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Record every request into the shared registry and push the counter
/// delta to live subscribers.
async fn track_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let endpoint = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let value = state
        .registry
        .increment_counter("http_requests_total", 1, &[("endpoint", endpoint.as_str())]);
    state.registry.record_histogram(
        "http_request_duration_ms",
        started.elapsed().as_secs_f64() * 1000.0,
        &[("endpoint", endpoint.as_str())],
    );
    state.broadcaster.publish(LiveEvent::MetricUpdated {
        name: "http_requests_total".to_string(),
        value: value as f64,
        timestamp_ms: unix_millis_now(),
    });

    response
}
