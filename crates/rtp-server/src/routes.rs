use crate::stats::{OutcomeStats, OutcomeSummary};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rtp_core::CalibratedState;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub generator: Arc<CalibratedState>,
    /// Seeded generator shared by all requests. `None` means each worker
    /// thread draws from its own `thread_rng`.
    seeded: Option<Mutex<StdRng>>,
    pub stats: OutcomeStats,
}

impl AppState {
    pub fn new(generator: CalibratedState, seed: Option<u64>) -> Self {
        let stats = OutcomeStats::new(generator.partition_size());
        Self {
            generator: Arc::new(generator),
            seeded: seed.map(|s| Mutex::new(StdRng::seed_from_u64(s))),
            stats,
        }
    }

    /// Draw one outcome and record it.
    pub fn draw(&self) -> f64 {
        let outcome = match &self.seeded {
            Some(rng) => self.generator.sample(&mut *rng.lock()),
            None => self.generator.sample(&mut rand::thread_rng()),
        };
        self.stats.record(outcome);
        metrics::counter!("rtp_samples_total").increment(1);
        outcome
    }
}

#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub result: f64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub target: f64,
    pub gamma: f64,
    pub partition_size: usize,
    pub achieved: f64,
    pub converged: bool,
    pub iterations: usize,
    pub seeded: bool,
    pub outcomes: OutcomeSummary,
}

/// GET /get — one outcome per request.
pub async fn outcome_handler(State(state): State<Arc<AppState>>) -> Json<OutcomeResponse> {
    let result = state.draw();
    tracing::debug!(result, "outcome served");
    Json(OutcomeResponse { result })
}

/// GET /status — calibration report and served-outcome distribution.
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let report = state.generator.report();
    Json(StatusResponse {
        target: state.generator.target(),
        gamma: report.gamma,
        partition_size: state.generator.partition_size(),
        achieved: report.achieved,
        converged: report.converged,
        iterations: report.iterations,
        seeded: state.seeded.is_some(),
        outcomes: state.stats.summary(),
    })
}

pub async fn health() -> &'static str {
    "ok"
}

/// Routes served on the public port, without the Prometheus endpoint.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get", get(outcome_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health))
        .with_state(state)
}

/// Wrap `router` with request tracing and a per-request timeout that answers
/// 408 when it fires.
pub fn with_layers(router: Router, timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
