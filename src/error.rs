use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the input persistence port.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("Calculator '{0}' not found")]
    UnknownCalculator(String),
    #[error("Invalid calculator params: {0}")]
    InvalidParams(String),
    #[error("Calculator produced an unusable result: {0}")]
    Internal(String),
}

/// API-level error. Handlers return `Result<_, ApiError>` and axum renders the JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Calculator(#[from] CalculatorError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            ApiError::Calculator(err @ CalculatorError::UnknownCalculator(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_CALCULATOR", err.to_string())
            }
            ApiError::Calculator(err @ CalculatorError::InvalidParams(_)) => (
                StatusCode::BAD_REQUEST,
                "CALCULATION_FAILED",
                format!("Calculator execution failed: {err}"),
            ),
            ApiError::Calculator(err @ CalculatorError::Internal(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        tracing::debug!(%status, code, "request rejected: {message}");

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
