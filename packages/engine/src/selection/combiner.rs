use quizpath_algo::sanitize::safe_ratio;

use crate::config::SignalWeights;

use super::{ScoredCandidate, SignalScores};

/// `Σ weight_i * score_i`. Weights are not normalised here.
pub fn combine(scores: &SignalScores, weights: &SignalWeights) -> f64 {
    weights.incorrect_streak * scores.incorrect_streak
        + weights.concept_content_mastery * scores.mastery
        + weights.desired_difficulty * scores.difficulty
        + weights.test_frequency * scores.frequency
}

/// Turn combined scores into a probability distribution over the candidates.
/// All-zero scores become uniform.
pub fn normalize(candidates: &mut [ScoredCandidate]) {
    if candidates.is_empty() {
        return;
    }
    let total: f64 = candidates.iter().map(|c| c.combined_score.max(0.0)).sum();
    let uniform = 1.0 / candidates.len() as f64;
    for candidate in candidates.iter_mut() {
        candidate.probability = safe_ratio(candidate.combined_score.max(0.0), total, uniform);
    }
}
