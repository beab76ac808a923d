//! WebAssembly module for CropSage
//!
//! Provides client-side computation for:
//! - Feature encoding of field observations
//! - Rule-based recommendations and risk factors
//! - Rounding of displayed predictions
//!
//! The web client uses these when the API is unreachable.

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

use shared::{CropType, FieldObservation, SoilType, FEATURE_COUNT};

/// Encode a field observation (camelCase JSON) into the model feature order
#[wasm_bindgen]
pub fn encode_field_observation(observation_json: &str) -> Result<Float64Array, JsValue> {
    let features = encode_json(observation_json).map_err(|e| JsValue::from_str(&e))?;
    Ok(Float64Array::from(&features[..]))
}

/// Recommendations and risk factors for a field observation, as JSON
#[wasm_bindgen]
pub fn evaluate_field_observation(observation_json: &str) -> Result<String, JsValue> {
    evaluate_json(observation_json).map_err(|e| JsValue::from_str(&e))
}

/// Numeric code of a crop name (unknown names map to wheat)
#[wasm_bindgen]
pub fn crop_type_code(name: &str) -> u8 {
    CropType::from_name(name).code()
}

/// Numeric code of a soil name (unknown names map to loamy)
#[wasm_bindgen]
pub fn soil_type_code(name: &str) -> u8 {
    SoilType::from_name(name).code()
}

/// Round a yield for display (2 decimals, half-even)
#[wasm_bindgen]
pub fn round_yield(value: f64) -> f64 {
    shared::round_yield(value)
}

/// Round a health score for display (1 decimal, half-even)
#[wasm_bindgen]
pub fn round_health_score(value: f64) -> f64 {
    shared::round_health_score(value)
}

fn parse_observation(observation_json: &str) -> Result<FieldObservation, String> {
    serde_json::from_str(observation_json).map_err(|e| format!("Invalid observation JSON: {}", e))
}

fn encode_json(observation_json: &str) -> Result<[f64; FEATURE_COUNT], String> {
    let observation = parse_observation(observation_json)?;
    Ok(shared::encode(&observation).to_array())
}

fn evaluate_json(observation_json: &str) -> Result<String, String> {
    let observation = parse_observation(observation_json)?;
    let advisory = shared::evaluate(&observation);
    serde_json::to_string(&advisory).map_err(|e| format!("Serialization failed: {}", e))
}
