use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doc_qa::{ErrorKind, QaError};
use thiserror::Error;
use tracing::{error, info};

use crate::core::{app_state::ConfigError, http::response_envelope::ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("Product not found")]
    NotFound,

    /// Any failure past the product lookup; details are logged, not returned.
    #[error("An error occurred during processing")]
    Processing,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // 5xx
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) | AppError::Processing => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound => "NOT_FOUND",
            AppError::Processing => "PROCESSING_FAILURE",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(self.status_code())
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Collapses pipeline errors to the two externally visible outcomes.
/// The original error is logged here since it is dropped from the response.
impl From<QaError> for AppError {
    fn from(err: QaError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => {
                info!(error = %err, "product lookup failed");
                AppError::NotFound
            }
            ErrorKind::ProcessingFailure => {
                error!(error = %err, detail = ?err, "request failed");
                AppError::Processing
            }
        }
    }
}
