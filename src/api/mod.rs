mod debts;
mod error;
mod payloads;

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    Router,
    body::Body,
    extract::{Json, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{Instrument, info};

use crate::config::ServeConfig;
use crate::core::{
    PeriodComparison, PeriodRange, analyze_trend, budget_usage, calculate_payoff,
    compare_periods, normalize_to_monthly, previous_period, project_cashflow, project_goal,
};
use crate::jobs::{Job, JobQueue};
use crate::registry::DebtRegistry;

pub use error::ApiError;
pub use payloads::{
    BudgetQuery, CashflowPayload, ComparePayload, CreateDebtPayload, GoalPayload,
    NormalizeQuery, PaymentPayload, PayoffPayload, PayoffRequest, RangeQuery, TrendPayload,
    payoff_request_from_json, validate_payoff,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: DebtRegistry,
    pub jobs: JobQueue,
}

#[derive(Debug, Serialize)]
struct SuccessEnvelope<T> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NormalizeResponse {
    amount: f64,
    frequency: crate::core::Frequency,
    monthly_amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    #[serde(flatten)]
    comparison: PeriodComparison,
    current_range: PeriodRange,
    previous_range: PeriodRange,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    failed_jobs: u64,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/frequency/normalize", get(normalize_handler))
        .route("/api/debts/payoff", post(payoff_handler))
        .route(
            "/api/debts",
            get(debts::list_debts_handler).post(debts::create_debt_handler),
        )
        .route("/api/debts/plan", get(debts::plan_handler))
        .route("/api/debts/:id", get(debts::get_debt_handler))
        .route("/api/debts/:id/payments", post(debts::record_payment_handler))
        .route("/api/goals/projection", post(goal_projection_handler))
        .route("/api/projections/cashflow", post(cashflow_handler))
        .route("/api/reports/trend", post(trend_handler))
        .route("/api/reports/compare", post(compare_handler))
        .route("/api/reports/previous-period", get(previous_period_handler))
        .route("/api/budgets/usage", get(budget_usage_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn(trace_requests))
        .with_state(state)
}

pub async fn run_http_server(config: &ServeConfig) -> std::io::Result<()> {
    let registry = DebtRegistry::new();
    let (jobs, _worker) = JobQueue::start(registry.clone(), config.extra_payment);
    jobs.submit(Job::RecomputePayoffPlan);
    let app = build_router(AppState { registry, jobs });

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "homefin HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

async fn trace_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let span = tracing::info_span!("http.request", method = %method, route = %route);
    let started = Instant::now();

    let response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
    });
    response
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

pub(crate) fn ok_response<T: Serialize>(status: StatusCode, data: T) -> Response {
    json_response(status, SuccessEnvelope { ok: true, data })
}

async fn not_found_handler() -> Response {
    ApiError::NotFound("Not found".to_string()).into_response()
}

async fn health_handler(State(state): State<AppState>) -> Response {
    ok_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            failed_jobs: state.jobs.failure_count(),
        },
    )
}

async fn normalize_handler(
    query: Result<Query<NormalizeQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let request = payloads::validate_normalize(query).map_err(ApiError::Validation)?;
    Ok(ok_response(
        StatusCode::OK,
        NormalizeResponse {
            amount: request.amount,
            frequency: request.frequency,
            monthly_amount: normalize_to_monthly(request.amount, request.frequency),
        },
    ))
}

async fn payoff_handler(
    payload: Result<Json<PayoffPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let request = validate_payoff(payload).map_err(ApiError::Validation)?;
    Ok(ok_response(StatusCode::OK, build_payoff_response(&request)))
}

pub fn build_payoff_response(request: &PayoffRequest) -> crate::core::PayoffPlan {
    let mut plan = calculate_payoff(&request.debts, request.extra_payment, request.strategy);
    if !request.include_timeline {
        plan.timeline.clear();
    }
    plan
}

async fn goal_projection_handler(
    payload: Result<Json<GoalPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let request = payloads::validate_goal(payload).map_err(ApiError::Validation)?;
    let as_of = request.as_of.unwrap_or_else(today);
    Ok(ok_response(StatusCode::OK, project_goal(&request.input, as_of)))
}

async fn cashflow_handler(
    payload: Result<Json<CashflowPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let input = payloads::validate_cashflow(payload, today()).map_err(ApiError::Validation)?;
    Ok(ok_response(StatusCode::OK, project_cashflow(&input)))
}

async fn trend_handler(
    payload: Result<Json<TrendPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let series = payloads::validate_trend(payload).map_err(ApiError::Validation)?;
    Ok(ok_response(StatusCode::OK, analyze_trend(&series)))
}

async fn compare_handler(
    payload: Result<Json<ComparePayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let request = payloads::validate_compare(payload).map_err(ApiError::Validation)?;
    Ok(ok_response(
        StatusCode::OK,
        CompareResponse {
            comparison: compare_periods(request.current, request.previous),
            current_range: request.current.range,
            previous_range: request.previous.range,
        },
    ))
}

async fn previous_period_handler(
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let range = payloads::validate_range(query.start, query.end).map_err(ApiError::Validation)?;
    Ok(ok_response(StatusCode::OK, previous_period(range)))
}

async fn budget_usage_handler(
    query: Result<Query<BudgetQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let (spent, limit) = payloads::validate_budget(query).map_err(ApiError::Validation)?;
    Ok(ok_response(StatusCode::OK, budget_usage(spent, limit)))
}
