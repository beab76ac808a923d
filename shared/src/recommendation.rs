//! Rule-based agronomic advisories
//!
//! Rules run in a fixed order and that order is the output order. The
//! recommendation and risk lists fall back to their sentinel messages
//! independently of each other.

use serde::{Deserialize, Serialize};

use crate::models::FieldObservation;

/// Below this pH lime is recommended
pub const LOW_PH_THRESHOLD: f64 = 5.5;
/// Above this pH sulfur is recommended
pub const HIGH_PH_THRESHOLD: f64 = 7.5;
pub const NITROGEN_THRESHOLD: f64 = 30.0;
pub const PHOSPHORUS_THRESHOLD: f64 = 20.0;
pub const POTASSIUM_THRESHOLD: f64 = 20.0;

pub const LIME_RECOMMENDATION: &str = "Apply lime to increase soil pH.";
pub const LOW_PH_RISK: &str = "Low soil pH may limit nutrient availability.";
pub const SULFUR_RECOMMENDATION: &str = "Consider adding sulfur to decrease soil pH.";
pub const HIGH_PH_RISK: &str = "High soil pH may cause micronutrient deficiencies.";
pub const NITROGEN_RECOMMENDATION: &str = "Increase nitrogen application.";
pub const NITROGEN_RISK: &str = "Nitrogen deficiency may limit growth.";
pub const PHOSPHORUS_RECOMMENDATION: &str = "Increase phosphorus application.";
pub const PHOSPHORUS_RISK: &str = "Phosphorus deficiency may affect flowering and fruiting.";
pub const POTASSIUM_RECOMMENDATION: &str = "Increase potassium application.";
pub const POTASSIUM_RISK: &str = "Potassium deficiency may reduce disease resistance.";
pub const IRRIGATION_RECOMMENDATION: &str = "Consider implementing an irrigation system.";

/// Sentinel when no recommendation rule fired
pub const NO_RECOMMENDATIONS: &str = "No specific recommendations at this time.";
/// Sentinel when no risk rule fired
pub const NO_RISK_FACTORS: &str = "No significant risk factors identified.";

/// Advisory text for one field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
}

/// Evaluate the advisory rules against raw (unencoded) field values
pub fn evaluate(observation: &FieldObservation) -> Advisory {
    let mut recommendations = Vec::new();
    let mut risk_factors = Vec::new();

    if observation.soil_ph < LOW_PH_THRESHOLD {
        recommendations.push(LIME_RECOMMENDATION.to_string());
        risk_factors.push(LOW_PH_RISK.to_string());
    } else if observation.soil_ph > HIGH_PH_THRESHOLD {
        recommendations.push(SULFUR_RECOMMENDATION.to_string());
        risk_factors.push(HIGH_PH_RISK.to_string());
    }

    if observation.nitrogen_level < NITROGEN_THRESHOLD {
        recommendations.push(NITROGEN_RECOMMENDATION.to_string());
        risk_factors.push(NITROGEN_RISK.to_string());
    }

    if observation.phosphorus_level < PHOSPHORUS_THRESHOLD {
        recommendations.push(PHOSPHORUS_RECOMMENDATION.to_string());
        risk_factors.push(PHOSPHORUS_RISK.to_string());
    }

    if observation.potassium_level < POTASSIUM_THRESHOLD {
        recommendations.push(POTASSIUM_RECOMMENDATION.to_string());
        risk_factors.push(POTASSIUM_RISK.to_string());
    }

    if !observation.has_irrigation() {
        recommendations.push(IRRIGATION_RECOMMENDATION.to_string());
    }

    if recommendations.is_empty() {
        recommendations.push(NO_RECOMMENDATIONS.to_string());
    }
    if risk_factors.is_empty() {
        risk_factors.push(NO_RISK_FACTORS.to_string());
    }

    Advisory {
        recommendations,
        risk_factors,
    }
}
