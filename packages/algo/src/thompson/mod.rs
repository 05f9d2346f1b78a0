//! Thompson Sampling over Beta posteriors
//!
//! Core principles:
//! - Each arm (here: a content category) carries a Beta(alpha, beta) posterior
//! - A selection round draws one sample per arm; the draw, not the mean, drives priority
//! - Wide posteriors (few attempts) scatter their draws, which is the exploration term
//!
//! Two samplers are available:
//! - [`BetaSamplerKind::Exact`] - Beta(a, b) = X / (X + Y) with X ~ Gamma(a), Y ~ Gamma(b)
//! - [`BetaSamplerKind::NormalApprox`] - mean + z * sqrt(variance), clamped to [0, 1]
//!
//! The approximation is cheaper but explores less at low attempt counts because its
//! tails are truncated at the interval bounds instead of following the Beta shape.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::sanitize::clamp_unit;
use crate::types::{BetaParams, EPSILON};

// ==================== Constants ====================

/// Maximum iterations for Gamma sampling to prevent infinite loops
const MAX_GAMMA_ITERATIONS: usize = 1000;

/// Maximum recursion depth for Gamma sampling
const MAX_GAMMA_RECURSION: usize = 10;

// ==================== Data Structures ====================

/// Which Beta sampler to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BetaSamplerKind {
    /// Gamma-ratio sampler (Marsaglia-Tsang)
    #[default]
    Exact,
    /// Normal approximation around the posterior mean
    NormalApprox,
}

impl BetaSamplerKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "exact" | "gamma" => Some(Self::Exact),
            "normal" | "normal_approx" | "normalapprox" | "approx" => Some(Self::NormalApprox),
            _ => None,
        }
    }
}

// ==================== Main Implementation ====================

/// Per-call Beta sampler.
///
/// Owns its random stream; a selection call creates one, uses it for every draw
/// in that call and drops it. Nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct BetaSampler {
    rng: ChaCha8Rng,
    kind: BetaSamplerKind,
}

impl BetaSampler {
    /// Create a sampler seeded from the thread RNG
    pub fn from_entropy(kind: BetaSamplerKind) -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::with_seed(seed, kind)
    }

    /// Create a sampler with a specific seed (reproducible)
    pub fn with_seed(seed: u64, kind: BetaSamplerKind) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            kind,
        }
    }

    pub fn kind(&self) -> BetaSamplerKind {
        self.kind
    }

    /// Draw one sample from the posterior using the configured sampler
    pub fn sample(&mut self, params: &BetaParams) -> f64 {
        match self.kind {
            BetaSamplerKind::Exact => self.sample_beta(params.alpha, params.beta),
            BetaSamplerKind::NormalApprox => self.sample_beta_normal_approx(params),
        }
    }

    // ==================== Sampling Methods ====================

    /// Sample from a Beta distribution using the Gamma ratio
    ///
    /// Uses the property: Beta(alpha, beta) = Gamma(alpha) / (Gamma(alpha) + Gamma(beta))
    pub fn sample_beta(&mut self, alpha: f64, beta: f64) -> f64 {
        let a = alpha.max(EPSILON);
        let b = beta.max(EPSILON);

        let x = self.sample_gamma_internal(a, 1.0, 0);
        let y = self.sample_gamma_internal(b, 1.0, 0);

        let sum = x + y;
        if sum > 0.0 && sum.is_finite() {
            clamp_unit(x / sum)
        } else {
            // Fall back to the posterior mean
            a / (a + b)
        }
    }

    /// Normal approximation: mean plus Gaussian noise scaled by the posterior spread
    pub fn sample_beta_normal_approx(&mut self, params: &BetaParams) -> f64 {
        let mean = params.expected_value();
        let std_dev = params.variance().sqrt();
        clamp_unit(mean + self.sample_normal() * std_dev)
    }

    /// Sample from a Gamma distribution using the Marsaglia-Tsang method
    ///
    /// Reference: Marsaglia, G., & Tsang, W. W. (2000).
    /// "A simple method for generating gamma variables."
    pub fn sample_gamma(&mut self, shape: f64, scale: f64) -> f64 {
        self.sample_gamma_internal(shape, scale, 0)
    }

    fn sample_gamma_internal(&mut self, shape: f64, scale: f64, depth: usize) -> f64 {
        if shape <= 0.0 {
            return 0.0;
        }

        if depth >= MAX_GAMMA_RECURSION {
            return shape * scale;
        }

        // shape < 1: boost to shape + 1 and rescale by U^(1/shape)
        if shape < 1.0 {
            let u: f64 = self.rng.gen();
            let u_safe = u.max(EPSILON);
            return self.sample_gamma_internal(1.0 + shape, scale, depth + 1)
                * u_safe.powf(1.0 / shape);
        }

        let d = shape - 1.0 / 3.0;
        let c = 1.0 / (9.0 * d).sqrt();

        for _ in 0..MAX_GAMMA_ITERATIONS {
            let x = self.sample_normal();
            let v_term = 1.0 + c * x;

            if v_term <= 0.0 {
                continue;
            }

            let v = v_term.powi(3);
            let u: f64 = self.rng.gen();
            let x2 = x * x;

            // Squeeze check
            if u < 1.0 - 0.0331 * x2 * x2 {
                return d * v * scale;
            }

            if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
                return d * v * scale;
            }
        }

        // Exceeded iteration limit, return expected value
        shape * scale
    }

    /// Standard normal via Box-Muller
    fn sample_normal(&mut self) -> f64 {
        let u1: f64 = self.rng.gen::<f64>().max(EPSILON);
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}
