//! Local-only introspection endpoint.
//!
//! Serving is best-effort: bind or serve failures are logged and otherwise
//! ignored, and nothing here can stop a run.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::counters::Counters;
use crate::dispatcher::REQUESTS_METRIC;

/// Data the diagnostic routes read from.
pub struct DiagnosticsState {
    endpoint: String,
    workers: usize,
    started: Instant,
    counters: Arc<Counters>,
    prometheus: Option<PrometheusHandle>,
}

impl DiagnosticsState {
    pub fn new(
        endpoint: impl Into<String>,
        workers: usize,
        counters: Arc<Counters>,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            workers,
            started: Instant::now(),
            counters,
            prometheus,
        }
    }
}

#[derive(Debug, Serialize)]
struct DebugVars {
    endpoint: String,
    workers: usize,
    uptime_seconds: f64,
    success: u64,
    fail: u64,
    total: u64,
}

/// Install the global Prometheus recorder, if none is installed yet.
pub fn install_prometheus() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_counter!(REQUESTS_METRIC, "Completed dispatch attempts by outcome");
            info!("Prometheus recorder installed");
            Some(handle)
        }
        Err(err) => {
            warn!("Failed to install Prometheus recorder: {}", err);
            None
        }
    }
}

pub fn router(state: DiagnosticsState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/debug/vars", get(handle_debug_vars))
        .route("/metrics", get(handle_metrics))
        .with_state(Arc::new(state))
}

/// Serve the diagnostic routes on an already bound listener.
pub async fn serve(listener: TcpListener, state: DiagnosticsState) {
    if let Err(err) = axum::serve(listener, router(state)).await {
        warn!(error = %err, "diagnostic endpoint terminated");
    }
}

/// Bind `listen` and serve in the background.
pub fn spawn_diagnostics(listen: String, state: DiagnosticsState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let listener = match TcpListener::bind(&listen).await {
            Ok(listener) => listener,
            Err(err) => {
                warn!(%listen, error = %err, "diagnostic endpoint unavailable");
                return;
            }
        };
        info!(%listen, "diagnostic endpoint listening");
        serve(listener, state).await;
    })
}

async fn handle_health() -> &'static str {
    "ok"
}

async fn handle_debug_vars(State(state): State<Arc<DiagnosticsState>>) -> Json<DebugVars> {
    let totals = state.counters.snapshot();
    Json(DebugVars {
        endpoint: state.endpoint.clone(),
        workers: state.workers,
        uptime_seconds: state.started.elapsed().as_secs_f64(),
        success: totals.success,
        fail: totals.fail,
        total: totals.total(),
    })
}

async fn handle_metrics(State(state): State<Arc<DiagnosticsState>>) -> Response {
    match &state.prometheus {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
