//! Shared types and pure logic for the CropSage prediction platform
//!
//! This crate contains the field observation model, the feature encoder and
//! the advisory rule engine. Everything here is shared between the backend
//! and the browser (via WASM), so it stays free of I/O and randomness.

pub mod encoding;
pub mod models;
pub mod recommendation;
pub mod rounding;
pub mod validation;

pub use encoding::*;
pub use models::*;
pub use recommendation::*;
pub use rounding::*;
pub use validation::*;
