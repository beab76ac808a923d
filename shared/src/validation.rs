//! Expected-range checks for field observations
//!
//! Observations are never rejected or clamped: the models accept any value.
//! These checks only report which measurements fall outside the ranges the
//! models were trained on, so callers can log or display a notice.

use crate::models::FieldObservation;

/// Soil pH range covered by the training data
pub const EXPECTED_PH_RANGE: (f64, f64) = (3.5, 9.5);
/// Nutrient level range covered by the training data
pub const EXPECTED_NUTRIENT_RANGE: (f64, f64) = (0.0, 100.0);
/// Field size range (hectares) covered by the training data
pub const EXPECTED_FIELD_SIZE_RANGE: (f64, f64) = (0.1, 100.0);

fn within(value: f64, (min, max): (f64, f64)) -> bool {
    value >= min && value <= max
}

/// Check soil pH is inside the trained range
pub fn validate_soil_ph(ph: f64) -> Result<(), &'static str> {
    if !within(ph, EXPECTED_PH_RANGE) {
        return Err("Soil pH outside the expected range of 3.5 to 9.5");
    }
    Ok(())
}

/// Check a nutrient level is inside the trained range
pub fn validate_nutrient_level(level: f64) -> Result<(), &'static str> {
    if !within(level, EXPECTED_NUTRIENT_RANGE) {
        return Err("Nutrient level outside the expected range of 0 to 100");
    }
    Ok(())
}

/// Check field size is inside the trained range
pub fn validate_field_size(hectares: f64) -> Result<(), &'static str> {
    if !within(hectares, EXPECTED_FIELD_SIZE_RANGE) {
        return Err("Field size outside the expected range of 0.1 to 100 hectares");
    }
    Ok(())
}

/// Names of the measurements that fall outside their expected range
pub fn out_of_range_fields(observation: &FieldObservation) -> Vec<&'static str> {
    let checks = [
        ("fieldSize", validate_field_size(observation.field_size)),
        ("soilPH", validate_soil_ph(observation.soil_ph)),
        ("nitrogenLevel", validate_nutrient_level(observation.nitrogen_level)),
        ("phosphorusLevel", validate_nutrient_level(observation.phosphorus_level)),
        ("potassiumLevel", validate_nutrient_level(observation.potassium_level)),
    ];

    checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|_| field))
        .collect()
}
