//! Business logic services for the CropSage API

pub mod auth;
pub mod prediction;

pub use auth::{AuthService, InMemoryUserDirectory, UserDirectory, UserProfile};
pub use prediction::{PredictionError, PredictionService};
