//! HTTP request handlers for the CropSage API

pub mod auth;
pub mod health;
pub mod prediction;

pub use auth::*;
pub use health::*;
pub use prediction::*;
