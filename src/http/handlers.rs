//! Request handlers for the scrape, health and dashboard endpoints.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::Ordering;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Serialize;

use crate::health::{DependencyCheck, HealthStatus, HealthVerdict};
use crate::http::server::AppState;
use crate::registry::{exposition, RegistrySnapshot};
use crate::store::{unix_millis_now, MetricPoint, SeriesSummary};

/// `GET /metrics` — text exposition of everything currently registered.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = exposition::render(&state.registry.snapshot());

    let _ = writeln!(body, "# TYPE process_uptime_seconds gauge");
    let _ = writeln!(
        body,
        "process_uptime_seconds {}",
        state.started_at.elapsed().as_secs()
    );

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

/// `GET /health` — dependency checks plus the sampler's own liveness.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();

    let mut checks = vec![sampler_check(&state)];
    checks.extend(state.health.check_dependencies().await);

    let verdict = HealthVerdict::compose(checks, started.elapsed().as_millis() as u64);
    let code = match verdict.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(verdict))
}

/// The sampler counts as a non-critical internal dependency: a stalled
/// loop degrades the service rather than failing it outright.
fn sampler_check(state: &AppState) -> DependencyCheck {
    let last_cycle_ms = state.sampler_liveness.load(Ordering::Relaxed);
    let stale_after_ms = (state.sampling_interval.as_millis() as u64) * 3 + 1_000;

    let (status, description) = if last_cycle_ms == 0 {
        (
            HealthStatus::Unhealthy,
            "no sampling cycle completed yet".to_string(),
        )
    } else {
        let age_ms = unix_millis_now().saturating_sub(last_cycle_ms);
        if age_ms > stale_after_ms {
            (
                HealthStatus::Unhealthy,
                format!("last cycle {}ms ago", age_ms),
            )
        } else {
            (HealthStatus::Healthy, format!("last cycle {}ms ago", age_ms))
        }
    };

    DependencyCheck {
        name: "sampler".to_string(),
        status,
        description,
        duration_ms: 0,
        critical: false,
    }
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub series: HashMap<String, SeriesSummary>,
    pub registry: RegistrySnapshot,
    pub subscribers: usize,
}

/// `GET /api/summary` — read-side composition for the dashboard.
pub async fn summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        series: state.store.summaries(),
        registry: state.registry.snapshot(),
        subscribers: state.broadcaster.subscriber_count(),
    })
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub name: String,
    pub points: Vec<MetricPoint>,
}

/// `GET /api/history/{name}` — retained points for one series.
pub async fn history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    if !state.store.contains(&name) {
        return (StatusCode::NOT_FOUND, format!("unknown series '{}'", name)).into_response();
    }
    let points = state.store.query(&name);
    Json(HistoryResponse { name, points }).into_response()
}
