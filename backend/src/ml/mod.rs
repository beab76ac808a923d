//! Yield and health regression models
//!
//! Synthetic data generation, a random forest regressor built from CART
//! trees, and the store that trains, persists and serves the model pair.

pub mod error;
pub mod forest;
pub mod store;
pub mod synthetic;
pub mod tree;

pub use error::ModelError;
pub use forest::{ForestParams, RandomForestRegressor};
pub use store::{staging_path, ModelPair, ModelPaths, ModelStore, ModelTarget, TrainingSettings};
pub use synthetic::SyntheticDataGenerator;
pub use tree::{RegressionTree, TreeParams};
