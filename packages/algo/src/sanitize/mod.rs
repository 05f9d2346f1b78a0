//! Data Sanitization
//!
//! Numerical stability utilities for selection scores.
//!
//! Functions:
//! - Unit-interval clamping
//! - Non-negative weight checks
//! - Guarded division

/// Clamp a score into `[0, 1]`; NaN collapses to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// A weight is usable if it is finite and not negative
pub fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}

/// Division that never yields NaN/Inf; returns `fallback` when the denominator is ~0
pub fn safe_ratio(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator.abs() < crate::types::EPSILON || !denominator.is_finite() {
        return fallback;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        fallback
    }
}
