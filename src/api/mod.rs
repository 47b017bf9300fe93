use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::core::{CalculationResult, RetirementInputs, calculate_retirement};
use crate::error::ApiError;
use crate::registry::{CalculatorInfo, CalculatorRegistry};
use crate::state::InputPatch;

#[derive(Clone)]
struct AppState {
    registry: Arc<CalculatorRegistry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateRequest {
    #[serde(alias = "calculator_name")]
    calculator_name: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    calculator_name: String,
    result: Value,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn router(registry: Arc<CalculatorRegistry>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/playground/calculators", get(list_calculators_handler))
        .route("/api/playground/calculate", post(calculate_handler))
        .route(
            "/api/playground/break-calculator",
            get(break_get_handler).post(break_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(AppState { registry })
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let registry = Arc::new(CalculatorRegistry::with_builtin());
    info!(calculators = registry.len(), "calculator registry ready");
    let app = router(registry);

    let listener = TcpListener::bind(addr).await?;
    info!("break planner HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{}/api/health", addr.port());

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_calculators_handler(State(state): State<AppState>) -> Response {
    let calculators: Vec<CalculatorInfo> = state.registry.list();
    json_response(calculators)
}

async fn calculate_handler(
    State(state): State<AppState>,
    request: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;
    debug!(calculator = %request.calculator_name, "executing calculator");
    let result = state
        .registry
        .execute(&request.calculator_name, request.params)?;
    Ok(json_response(CalculateResponse {
        calculator_name: request.calculator_name,
        result,
    }))
}

async fn break_get_handler(
    payload: Result<Query<InputPatch>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(payload) = payload?;
    break_handler_impl(payload)
}

async fn break_post_handler(
    payload: Result<Json<InputPatch>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    break_handler_impl(payload)
}

fn break_handler_impl(payload: InputPatch) -> Result<Response, ApiError> {
    let inputs = inputs_from_payload(payload).map_err(ApiError::Validation)?;
    let result: CalculationResult = calculate_retirement(&inputs);
    debug!(
        age_at_break = result.age_at_break,
        corpus_runs_out_age = result.corpus_runs_out_age,
        "break projection computed"
    );
    Ok(json_response(result))
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

fn inputs_from_payload(payload: InputPatch) -> Result<RetirementInputs, String> {
    let inputs = payload.apply_over(RetirementInputs::default());
    inputs.validate()?;
    Ok(inputs)
}

fn json_response<T: Serialize>(body: T) -> Response {
    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}
