//! Error handling for the CropSage prediction service
//!
//! Every error leaves the API as `{"detail": ..., "code": ...}`, the shape
//! the web client reads.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::PredictionError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Malformed or incomplete JSON bodies
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    // Prediction errors
    #[error("Prediction error: {0}")]
    PredictionFailed(#[from] PredictionError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.keys().copied().collect();
        fields.sort_unstable();

        match fields.first() {
            Some(field) => AppError::Validation {
                field: (*field).to_string(),
                message: format!("Invalid value for {}", field),
            },
            None => AppError::Validation {
                field: String::new(),
                message: errors.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    detail: "Invalid credentials".to_string(),
                    code: "INVALID_CREDENTIALS".to_string(),
                    field: None,
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    detail: message.clone(),
                    code: "VALIDATION_ERROR".to_string(),
                    field: (!field.is_empty()).then(|| field.clone()),
                },
            ),
            AppError::InvalidBody(rejection) => (
                rejection.status(),
                ErrorResponse {
                    detail: rejection.body_text(),
                    code: "INVALID_BODY".to_string(),
                    field: None,
                },
            ),
            AppError::PredictionFailed(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    detail: format!("Prediction error: {}", err.cause()),
                    code: "PREDICTION_FAILED".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    detail: msg.clone(),
                    code: "INTERNAL_ERROR".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
