//! Configuration management for the CropSage prediction service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with CROPSAGE_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::ml::TrainingSettings;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Model training and storage configuration
    pub models: ModelsConfig,

    /// Demo login configuration
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelsConfig {
    /// Directory holding the persisted model artifacts
    pub dir: String,

    /// Number of synthetic training samples
    pub sample_count: usize,

    /// Seed for data generation and bootstrap sampling
    pub seed: u64,

    /// Trees per forest
    pub n_estimators: usize,

    /// Maximum tree depth (unlimited when unset)
    pub max_depth: Option<usize>,

    /// Minimum samples required to split a node
    pub min_samples_split: usize,

    /// Retrain on every start instead of reusing persisted models
    pub retrain_on_startup: bool,
}

impl ModelsConfig {
    pub fn training_settings(&self) -> TrainingSettings {
        TrainingSettings {
            sample_count: self.sample_count,
            seed: self.seed,
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Email of the seeded demo account
    pub demo_email: String,

    /// Display name of the seeded demo account
    pub demo_name: String,

    /// Password of the seeded demo account (hashed at startup)
    pub demo_password: String,

    /// bcrypt cost used when hashing directory passwords
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROPSAGE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("models.dir", "models")?
            .set_default("models.sample_count", 1000)?
            .set_default("models.seed", 42)?
            .set_default("models.n_estimators", 100)?
            .set_default("models.min_samples_split", 2)?
            .set_default("models.retrain_on_startup", false)?
            .set_default("auth.demo_email", "demo@cropsage.com")?
            .set_default("auth.demo_name", "Demo Farmer")?
            .set_default("auth.demo_password", "password123")?
            .set_default("auth.bcrypt_cost", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROPSAGE_ prefix)
            .add_source(
                Environment::with_prefix("CROPSAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        let settings = TrainingSettings::default();
        Self {
            dir: "models".to_string(),
            sample_count: settings.sample_count,
            seed: settings.seed,
            n_estimators: settings.n_estimators,
            max_depth: settings.max_depth,
            min_samples_split: settings.min_samples_split,
            retrain_on_startup: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            demo_email: "demo@cropsage.com".to_string(),
            demo_name: "Demo Farmer".to_string(),
            demo_password: "password123".to_string(),
            bcrypt_cost: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            models: ModelsConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_code_defaults() {
        let config = Config::load().unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.models.dir, "models");
        assert_eq!(config.models.sample_count, 1000);
        assert_eq!(config.models.max_depth, None);
        assert_eq!(config.auth.demo_email, "demo@cropsage.com");
    }

    #[test]
    fn training_settings_follow_models_section() {
        let models = ModelsConfig {
            n_estimators: 12,
            max_depth: Some(6),
            ..ModelsConfig::default()
        };
        let settings = models.training_settings();
        assert_eq!(settings.n_estimators, 12);
        assert_eq!(settings.max_depth, Some(6));
        assert_eq!(settings.seed, 42);
    }
}
