//! Prediction pipeline: observation in, rounded prediction out

use std::sync::Arc;

use shared::{
    encode, evaluate, out_of_range_fields, round_health_score, round_yield, FieldObservation,
    PredictionResult,
};
use thiserror::Error;

use crate::ml::{ModelError, ModelStore};

/// The single failure kind seen by pipeline callers
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("{0}")]
    PredictionFailed(#[from] ModelError),
}

impl PredictionError {
    /// Human-readable cause, as shown in the API error detail
    pub fn cause(&self) -> String {
        match self {
            PredictionError::PredictionFailed(err) => err.to_string(),
        }
    }
}

/// Runs encode, model inference and the rule engine for one observation
#[derive(Clone)]
pub struct PredictionService {
    store: Arc<ModelStore>,
}

impl PredictionService {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }

    /// Whether a model pair is held in memory
    pub fn models_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    /// Predict yield and health and attach advice.
    ///
    /// Blocking: may train models on first use. Async callers should run it
    /// on the blocking pool.
    pub fn predict(&self, observation: &FieldObservation) -> Result<PredictionResult, PredictionError> {
        self.store.ensure_trained()?;

        let outliers = out_of_range_fields(observation);
        if !outliers.is_empty() {
            tracing::warn!(fields = ?outliers, "Observation outside the training range");
        }

        let features = encode(observation);
        let (yield_raw, health_raw) = self.store.predict(&features)?;
        let advisory = evaluate(observation);

        tracing::debug!(
            crop = %observation.crop(),
            soil = %observation.soil(),
            yield_raw,
            health_raw,
            recommendations = advisory.recommendations.len(),
            "Prediction complete"
        );

        Ok(PredictionResult {
            yield_prediction: round_yield(yield_raw),
            health_score: round_health_score(health_raw),
            recommendations: advisory.recommendations,
            risk_factors: advisory.risk_factors,
        })
    }
}
