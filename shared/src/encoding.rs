//! Feature encoding for the regression models
//!
//! Total over its domain: unknown categories fall back to code 0 and numeric
//! values pass through untouched.

use crate::models::{FeatureVector, FieldObservation};

/// Encode a field observation into the fixed model input order
pub fn encode(observation: &FieldObservation) -> FeatureVector {
    FeatureVector {
        crop_type_code: observation.crop().code(),
        soil_type_code: observation.soil().code(),
        field_size: observation.field_size,
        soil_ph: observation.soil_ph,
        nitrogen: observation.nitrogen_level,
        phosphorus: observation.phosphorus_level,
        potassium: observation.potassium_level,
        has_irrigation: u8::from(observation.has_irrigation()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CropType, SoilType};
    use proptest::prelude::*;

    fn observation(crop: &str, soil: &str, irrigation: Option<&str>) -> FieldObservation {
        FieldObservation {
            field_name: "Test Field".to_string(),
            crop_type: crop.to_string(),
            soil_type: soil.to_string(),
            field_size: 12.5,
            soil_ph: 6.2,
            nitrogen_level: 45.0,
            phosphorus_level: 25.0,
            potassium_level: 35.0,
            irrigation_system: irrigation.map(str::to_string),
        }
    }

    #[test]
    fn test_encode_known_categories() {
        let features = encode(&observation("sugarcane", "chalky", Some("sprinkler")));
        assert_eq!(features.crop_type_code, 5);
        assert_eq!(features.soil_type_code, 5);
        assert_eq!(features.has_irrigation, 1);
    }

    #[test]
    fn test_encode_passes_numbers_through() {
        let mut obs = observation("rice", "clay", None);
        obs.soil_ph = 12.0;
        obs.nitrogen_level = -5.0;
        let features = encode(&obs);
        assert_eq!(features.field_size, 12.5);
        assert_eq!(features.soil_ph, 12.0);
        assert_eq!(features.nitrogen, -5.0);
        assert_eq!(features.phosphorus, 25.0);
        assert_eq!(features.potassium, 35.0);
        assert_eq!(features.has_irrigation, 0);
    }

    #[test]
    fn test_encode_unknown_categories_default_to_zero() {
        let features = encode(&observation("quinoa", "gravel", Some("")));
        assert_eq!(features.crop_type_code, 0);
        assert_eq!(features.soil_type_code, 0);
        assert_eq!(features.has_irrigation, 0);
    }

    fn crop_strategy() -> impl Strategy<Value = CropType> {
        prop::sample::select(CropType::ALL.to_vec())
    }

    fn soil_strategy() -> impl Strategy<Value = SoilType> {
        prop::sample::select(SoilType::ALL.to_vec())
    }

    /// Randomly flips the case of each character
    fn recase(name: &str, mask: &[bool]) -> String {
        name.chars()
            .zip(mask.iter().cycle())
            .map(|(c, upper)| {
                if *upper {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Encoding is case-insensitive and yields the documented code
        #[test]
        fn prop_category_codes_case_insensitive(
            crop in crop_strategy(),
            soil in soil_strategy(),
            mask in prop::collection::vec(any::<bool>(), 1..10),
        ) {
            let obs = observation(&recase(crop.name(), &mask), &recase(soil.name(), &mask), None);
            let features = encode(&obs);
            prop_assert_eq!(features.crop_type_code, crop.code());
            prop_assert_eq!(features.soil_type_code, soil.code());
        }

        /// Names outside the tables encode as code 0
        #[test]
        fn prop_unknown_names_encode_to_zero(name in "[a-z]{1,12}") {
            prop_assume!(CropType::ALL.iter().all(|c| c.name() != name));
            prop_assume!(SoilType::ALL.iter().all(|s| s.name() != name));
            let features = encode(&observation(&name, &name, None));
            prop_assert_eq!(features.crop_type_code, 0);
            prop_assert_eq!(features.soil_type_code, 0);
        }

        /// Identical input always yields an identical vector
        #[test]
        fn prop_encoding_is_pure(
            crop in crop_strategy(),
            ph in 3.5f64..9.5,
            nitrogen in 0.0f64..100.0,
            irrigation in proptest::option::of("[a-z]{0,8}"),
        ) {
            let mut obs = observation(crop.name(), "silt", irrigation.as_deref());
            obs.soil_ph = ph;
            obs.nitrogen_level = nitrogen;
            prop_assert_eq!(encode(&obs), encode(&obs.clone()));
        }
    }
}
