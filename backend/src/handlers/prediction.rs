//! Yield prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use shared::{FieldObservation, PredictionResult};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Predict yield, health score and advice for one field
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FieldObservation>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(observation) = payload?;
    let service = state.prediction.clone();

    // Inference and first-use training are CPU bound
    let result = tokio::task::spawn_blocking(move || service.predict(&observation))
        .await
        .map_err(|e| AppError::Internal(format!("Prediction task failed: {}", e)))??;

    Ok(Json(result))
}
