//! Common Types and Constants
//!
//! Shared data structures used across the algorithm modules.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

/// Laplace smoothing added to both Beta parameters
pub const LAPLACE_PRIOR: f64 = 1.0;

// ==================== Thompson Sampling Types ====================

/// Beta distribution parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    /// Success pseudo-count (alpha > 0)
    pub alpha: f64,
    /// Failure pseudo-count (beta > 0)
    pub beta: f64,
}

impl Default for BetaParams {
    fn default() -> Self {
        Self::uniform()
    }
}

impl BetaParams {
    /// Create new Beta parameters, clamping both to a strictly positive value
    pub fn new(alpha: f64, beta: f64) -> Self {
        let alpha = if alpha.is_finite() { alpha } else { LAPLACE_PRIOR };
        let beta = if beta.is_finite() { beta } else { LAPLACE_PRIOR };
        Self {
            alpha: alpha.max(EPSILON),
            beta: beta.max(EPSILON),
        }
    }

    /// Uninformative Beta(1, 1)
    pub fn uniform() -> Self {
        Self {
            alpha: LAPLACE_PRIOR,
            beta: LAPLACE_PRIOR,
        }
    }

    /// Laplace-smoothed posterior for `correct` successes out of `attempts`.
    ///
    /// `correct` is clamped to `attempts` so a corrupted aggregate can never
    /// produce a negative failure count.
    pub fn from_attempts(attempts: u32, correct: u32) -> Self {
        let correct = correct.min(attempts);
        let failures = attempts - correct;
        Self::new(
            f64::from(correct) + LAPLACE_PRIOR,
            f64::from(failures) + LAPLACE_PRIOR,
        )
    }

    /// Mean of the distribution
    pub fn expected_value(&self) -> f64 {
        let sum = self.alpha + self.beta;
        if sum > 0.0 {
            self.alpha / sum
        } else {
            0.5
        }
    }

    /// Variance of the distribution
    pub fn variance(&self) -> f64 {
        let sum = self.alpha + self.beta;
        if sum <= 0.0 {
            return 0.0;
        }
        (self.alpha * self.beta) / (sum * sum * (sum + 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_mean_and_variance() {
        let p = BetaParams::uniform();
        assert_eq!(p.expected_value(), 0.5);
        assert!((p.variance() - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_attempts_is_laplace_smoothed() {
        let p = BetaParams::from_attempts(10, 7);
        assert_eq!(p.alpha, 8.0);
        assert_eq!(p.beta, 4.0);
        assert!((p.expected_value() - 8.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_attempts_clamps_corrupt_counts() {
        let p = BetaParams::from_attempts(3, 9);
        assert_eq!(p.alpha, 4.0);
        assert_eq!(p.beta, 1.0);
    }

    #[test]
    fn test_variance_shrinks_with_attempts() {
        let few = BetaParams::from_attempts(2, 1);
        let many = BetaParams::from_attempts(200, 100);
        assert!(many.variance() < few.variance());
    }

    #[test]
    fn test_new_rejects_non_positive_and_non_finite() {
        let p = BetaParams::new(-1.0, f64::NAN);
        assert_eq!(p.alpha, EPSILON);
        assert_eq!(p.beta, LAPLACE_PRIOR);
    }

    #[test]
    fn test_serde_roundtrip() {
        let p = BetaParams::from_attempts(5, 2);
        let json = serde_json::to_string(&p).unwrap();
        let back: BetaParams = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
