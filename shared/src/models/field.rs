//! Field observation models

use serde::{Deserialize, Serialize};

/// Soil, crop and nutrient measurements for a single field
///
/// Category names are kept as submitted; they are resolved to [`CropType`]
/// and [`SoilType`] only when encoded. Numeric values are not validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldObservation {
    pub field_name: String,
    pub crop_type: String,
    pub soil_type: String,
    /// Field area in hectares
    pub field_size: f64,
    #[serde(rename = "soilPH")]
    pub soil_ph: f64,
    pub nitrogen_level: f64,
    pub phosphorus_level: f64,
    pub potassium_level: f64,
    #[serde(default)]
    pub irrigation_system: Option<String>,
}

impl FieldObservation {
    /// Resolved crop category (unknown names fall back to the default)
    pub fn crop(&self) -> CropType {
        CropType::from_name(&self.crop_type)
    }

    /// Resolved soil category (unknown names fall back to the default)
    pub fn soil(&self) -> SoilType {
        SoilType::from_name(&self.soil_type)
    }

    /// Whether an irrigation system is recorded. Only presence matters.
    pub fn has_irrigation(&self) -> bool {
        self.irrigation_system
            .as_deref()
            .is_some_and(|system| !system.is_empty())
    }
}

/// Crops supported by the yield models
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    #[default]
    Wheat,
    Rice,
    Corn,
    Soybean,
    Cotton,
    Sugarcane,
}

impl CropType {
    /// All crop types in encoding order
    pub const ALL: [CropType; 6] = [
        CropType::Wheat,
        CropType::Rice,
        CropType::Corn,
        CropType::Soybean,
        CropType::Cotton,
        CropType::Sugarcane,
    ];

    /// Case-insensitive lookup. Unknown names map to [`CropType::Wheat`].
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "wheat" => CropType::Wheat,
            "rice" => CropType::Rice,
            "corn" => CropType::Corn,
            "soybean" => CropType::Soybean,
            "cotton" => CropType::Cotton,
            "sugarcane" => CropType::Sugarcane,
            _ => CropType::default(),
        }
    }

    /// Numeric code used in the feature vector
    pub fn code(self) -> u8 {
        match self {
            CropType::Wheat => 0,
            CropType::Rice => 1,
            CropType::Corn => 2,
            CropType::Soybean => 3,
            CropType::Cotton => 4,
            CropType::Sugarcane => 5,
        }
    }

    /// Inverse of [`CropType::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            CropType::Wheat => "wheat",
            CropType::Rice => "rice",
            CropType::Corn => "corn",
            CropType::Soybean => "soybean",
            CropType::Cotton => "cotton",
            CropType::Sugarcane => "sugarcane",
        }
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Soil classes supported by the models
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    #[default]
    Loamy,
    Sandy,
    Clay,
    Silt,
    Peaty,
    Chalky,
}

impl SoilType {
    /// All soil types in encoding order
    pub const ALL: [SoilType; 6] = [
        SoilType::Loamy,
        SoilType::Sandy,
        SoilType::Clay,
        SoilType::Silt,
        SoilType::Peaty,
        SoilType::Chalky,
    ];

    /// Case-insensitive lookup. Unknown names map to [`SoilType::Loamy`].
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "loamy" => SoilType::Loamy,
            "sandy" => SoilType::Sandy,
            "clay" => SoilType::Clay,
            "silt" => SoilType::Silt,
            "peaty" => SoilType::Peaty,
            "chalky" => SoilType::Chalky,
            _ => SoilType::default(),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SoilType::Loamy => 0,
            SoilType::Sandy => 1,
            SoilType::Clay => 2,
            SoilType::Silt => 3,
            SoilType::Peaty => 4,
            SoilType::Chalky => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            SoilType::Loamy => "loamy",
            SoilType::Sandy => "sandy",
            SoilType::Clay => "clay",
            SoilType::Silt => "silt",
            SoilType::Peaty => "peaty",
            SoilType::Chalky => "chalky",
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
