//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::jobs::{handlers, JobContext};
use crate::metrics::Metrics;
use crate::models::evaluation::{DailyEvaluation, DailyInputs};
use crate::models::signal::{RawCondition, SignalStatus};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub jobs: Option<Arc<JobContext>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let database = match state.jobs.as_ref().and_then(|j| j.database.as_ref()) {
        Some(db) => json!(db.is_available().await),
        None => Value::Null,
    };
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "cyclewatch",
        "database": database
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

fn jobs(state: &AppState) -> Result<&Arc<JobContext>, StatusCode> {
    state.jobs.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

/// Current state of every signal, with display status when a run exists
async fn list_signals(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let ctx = jobs(&state)?;

    let states = handlers::current_states(ctx).await.map_err(|e| {
        error!(error = %e, "Failed to load signal states");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let latest = ctx.latest.read().await.clone();

    let signals: Vec<Value> = states
        .into_iter()
        .map(|s| {
            let condition = latest
                .as_ref()
                .and_then(|e| e.signal(s.name))
                .map(|r| r.condition)
                .unwrap_or(RawCondition::Unknown);
            let status = SignalStatus::derive(&s, condition);
            json!({
                "name": s.name,
                "active": s.active,
                "status": status,
                "activated_on": s.activated_on,
                "last_condition_met_on": s.last_condition_met_on,
                "last_evaluated_on": s.last_evaluated_on,
                "deactivated_on": s.deactivated_on,
                "last_activated_on": s.last_activated_on,
                "days_active": s.days_active(
                    s.last_evaluated_on
                        .unwrap_or_else(|| chrono::Utc::now().date_naive())
                ),
            })
        })
        .collect();

    Ok(Json(json!(signals)))
}

async fn latest_evaluation(
    State(state): State<AppState>,
) -> Result<Json<DailyEvaluation>, StatusCode> {
    let ctx = jobs(&state)?;

    handlers::latest_evaluation(ctx)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load latest evaluation");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
struct EvaluateQuery {
    date: Option<NaiveDate>,
}

/// Manual trigger: fetch and evaluate for `date` (default today)
async fn trigger_evaluation(
    State(state): State<AppState>,
    Query(params): Query<EvaluateQuery>,
) -> Result<Json<DailyEvaluation>, StatusCode> {
    let ctx = jobs(&state)?;
    let date = params.date.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let evaluation = handlers::run_daily_cycle(ctx, date).await.map_err(|e| {
        error!(error = %e, date = %date, "Manual evaluation failed");
        evaluation_error_status(e.as_ref())
    })?;

    Ok(Json(evaluation))
}

/// Evaluate caller-supplied inputs
async fn evaluate_inputs(
    State(state): State<AppState>,
    Json(inputs): Json<DailyInputs>,
) -> Result<Json<DailyEvaluation>, StatusCode> {
    let ctx = jobs(&state)?;

    let evaluation = handlers::run_with_inputs(ctx, &inputs).await.map_err(|e| {
        error!(error = %e, date = %inputs.date, "Evaluation of supplied inputs failed");
        evaluation_error_status(e.as_ref())
    })?;

    Ok(Json(evaluation))
}

fn evaluation_error_status(e: &(dyn std::error::Error + Send + Sync + 'static)) -> StatusCode {
    match e.downcast_ref::<crate::CoreError>() {
        Some(crate::CoreError::InvalidInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(crate::CoreError::StateCorruption { .. }) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals", get(list_signals))
        .route("/api/evaluations/latest", get(latest_evaluation))
        .route("/api/evaluate", post(trigger_evaluation))
        .route("/api/evaluate/inputs", post(evaluate_inputs))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    jobs: Option<Arc<JobContext>>,
    metrics: Arc<Metrics>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        jobs,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
