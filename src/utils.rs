// Utility functions

/// Rounds to two decimal places (money values).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to one decimal place (stockout-day estimates).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
