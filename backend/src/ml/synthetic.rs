//! Synthetic training data
//!
//! Labels come from a simplified agronomic relationship:
//! yield = base yield of the crop x pH factor x nutrient factor x field size,
//! health = noisy baseline of 70 scaled by the same two factors, clamped to
//! [0, 100]. A fixed seed reproduces the same dataset.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use shared::{CropType, FeatureVector, SoilType, TrainingSample};

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;
/// Dataset size used when none is configured
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Soil pH at which the pH factor peaks
pub const OPTIMAL_PH: f64 = 6.8;
pub const FIELD_SIZE_RANGE: (f64, f64) = (0.1, 100.0);
pub const SOIL_PH_RANGE: (f64, f64) = (3.5, 9.5);
pub const NUTRIENT_RANGE: (f64, f64) = (0.0, 100.0);

const HEALTH_BASELINE: f64 = 70.0;
const HEALTH_NOISE_STD_DEV: f64 = 5.0;

/// Base yield in tonnes per hectare
pub fn base_yield(crop: CropType) -> f64 {
    match crop {
        CropType::Wheat => 4.5,
        CropType::Rice => 5.2,
        CropType::Corn => 9.8,
        CropType::Soybean => 3.2,
        CropType::Cotton => 2.8,
        CropType::Sugarcane => 75.0,
    }
}

/// `1 - |pH - 6.8| / 10`. Not clamped; negative for extreme pH.
pub fn ph_factor(soil_ph: f64) -> f64 {
    1.0 - (soil_ph - OPTIMAL_PH).abs() / 10.0
}

/// Mean of the three nutrient levels on a 0..1 scale
pub fn nutrient_factor(nitrogen: f64, phosphorus: f64, potassium: f64) -> f64 {
    (nitrogen + phosphorus + potassium) / 300.0
}

/// Generates labeled samples from a seeded RNG
#[derive(Debug, Clone, Copy)]
pub struct SyntheticDataGenerator {
    seed: u64,
}

impl SyntheticDataGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw `sample_count` independent rows
    pub fn generate(&self, sample_count: usize) -> Vec<TrainingSample> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        (0..sample_count).map(|_| draw_sample(&mut rng)).collect()
    }
}

impl Default for SyntheticDataGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

fn draw_sample<R: Rng + ?Sized>(rng: &mut R) -> TrainingSample {
    let crop = CropType::ALL[rng.gen_range(0..CropType::ALL.len())];
    let soil = SoilType::ALL[rng.gen_range(0..SoilType::ALL.len())];
    let field_size = rng.gen_range(FIELD_SIZE_RANGE.0..FIELD_SIZE_RANGE.1);
    let soil_ph = rng.gen_range(SOIL_PH_RANGE.0..SOIL_PH_RANGE.1);
    let nitrogen = rng.gen_range(NUTRIENT_RANGE.0..NUTRIENT_RANGE.1);
    let phosphorus = rng.gen_range(NUTRIENT_RANGE.0..NUTRIENT_RANGE.1);
    let potassium = rng.gen_range(NUTRIENT_RANGE.0..NUTRIENT_RANGE.1);
    let irrigated = rng.gen_bool(0.5);

    let ph = ph_factor(soil_ph);
    let nutrients = nutrient_factor(nitrogen, phosphorus, potassium);

    let yield_tonnes = base_yield(crop) * ph * nutrients * field_size;
    let baseline = HEALTH_BASELINE + HEALTH_NOISE_STD_DEV * standard_normal(rng);
    let health_score = (baseline * ph * nutrients).clamp(0.0, 100.0);

    TrainingSample {
        features: FeatureVector {
            crop_type_code: crop.code(),
            soil_type_code: soil.code(),
            field_size,
            soil_ph,
            nitrogen,
            phosphorus,
            potassium,
            has_irrigation: u8::from(irrigated),
        },
        yield_tonnes,
        health_score,
    }
}

/// Standard normal draw via the Box-Muller transform
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // gen::<f64>() is in [0, 1); flip it so ln never sees zero
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
