//! # quizpath-algo - core algorithms for adaptive exam-prep selection
//!
//! Pure Rust building blocks used by the selection engine:
//!
//! - **Beta posterior** - Laplace-smoothed correctness model per category
//! - **Thompson Sampling** - exact (Gamma ratio) and normal-approximation Beta draws
//! - **Sanitisation** - numeric guards that keep scores inside `[0, 1]`
//!
//! ## Module layout
//!
//! - [`thompson`] - Beta sampling over a seeded `ChaCha8Rng`
//! - [`sanitize`] - NaN/Inf handling and unit-interval clamping
//! - [`types`] - shared constants and [`BetaParams`]
//!
//! ## Example
//!
//! ```rust
//! use quizpath_algo::{BetaParams, BetaSampler, BetaSamplerKind};
//!
//! let mut sampler = BetaSampler::with_seed(7, BetaSamplerKind::Exact);
//! let posterior = BetaParams::from_attempts(10, 4);
//! let draw = sampler.sample(&posterior);
//! assert!((0.0..=1.0).contains(&draw));
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod sanitize;
pub mod thompson;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use thompson::{BetaSampler, BetaSamplerKind};
