//! Rounding of model outputs
//!
//! Rounds the exact binary value of the float half-to-even, so `2.675`
//! (stored as 2.67499999...) rounds to `2.67`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for yield predictions
pub const YIELD_DECIMALS: u32 = 2;
/// Decimal places kept for health scores
pub const HEALTH_DECIMALS: u32 = 1;

/// Round `value` to `decimals` places, half-to-even.
///
/// Non-finite values and values outside the decimal range are returned as-is.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven))
        // Parsing the decimal text gives the nearest f64
        .and_then(|d| d.to_string().parse().ok())
        .unwrap_or(value)
}

pub fn round_yield(value: f64) -> f64 {
    round_half_even(value, YIELD_DECIMALS)
}

pub fn round_health_score(value: f64) -> f64 {
    round_half_even(value, HEALTH_DECIMALS)
}
