//! Domain models for the CropSage prediction platform

mod field;
mod prediction;

pub use field::*;
pub use prediction::*;
