//! Feature vectors, training samples and prediction results

use serde::{Deserialize, Serialize};

/// Number of values in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 8;

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "crop_type",
    "soil_type",
    "field_size",
    "soil_ph",
    "nitrogen",
    "phosphorus",
    "potassium",
    "has_irrigation",
];

/// Fixed-order numeric encoding of a field observation
///
/// The order of [`FeatureVector::to_array`] must match the order the models
/// were trained on. Changing it means retraining both models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    pub crop_type_code: u8,
    pub soil_type_code: u8,
    pub field_size: f64,
    pub soil_ph: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    /// 1 when an irrigation system is present, else 0
    pub has_irrigation: u8,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.crop_type_code),
            f64::from(self.soil_type_code),
            self.field_size,
            self.soil_ph,
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            f64::from(self.has_irrigation),
        ]
    }
}

/// One synthetic training row with both regression targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrainingSample {
    pub features: FeatureVector,
    /// Yield target in tonnes
    pub yield_tonnes: f64,
    /// Health target in [0, 100]
    pub health_score: f64,
}

/// Result returned to callers of the prediction pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Predicted yield, rounded to 2 decimals
    pub yield_prediction: f64,
    /// Crop health score in [0, 100], rounded to 1 decimal
    pub health_score: f64,
    /// Never empty
    pub recommendations: Vec<String>,
    /// Never empty
    pub risk_factors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_array_order_is_fixed() {
        let features = FeatureVector {
            crop_type_code: 2,
            soil_type_code: 3,
            field_size: 10.0,
            soil_ph: 6.5,
            nitrogen: 40.0,
            phosphorus: 30.0,
            potassium: 20.0,
            has_irrigation: 1,
        };
        assert_eq!(
            features.to_array(),
            [2.0, 3.0, 10.0, 6.5, 40.0, 30.0, 20.0, 1.0]
        );
        assert_eq!(FEATURE_NAMES.len(), features.to_array().len());
    }

    #[test]
    fn prediction_result_uses_camel_case() {
        let result = PredictionResult {
            yield_prediction: 31.7,
            health_score: 22.4,
            recommendations: vec!["a".into()],
            risk_factors: vec!["b".into()],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["yieldPrediction"], 31.7);
        assert_eq!(value["healthScore"], 22.4);
        assert_eq!(value["riskFactors"][0], "b");
    }
}
