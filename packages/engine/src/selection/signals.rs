//! The four independent per-candidate scorers. Each returns a value in `[0, 1]`,
//! higher meaning more desirable to serve now.

use quizpath_algo::sanitize::{clamp_unit, safe_ratio};
use quizpath_algo::BetaSampler;
use serde::{Deserialize, Serialize};

use crate::model::{KnowledgeProfile, ResponseEvent};

use super::history::ResponseHistory;

/// Raw signal values for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalScores {
    pub incorrect_streak: f64,
    pub mastery: f64,
    pub difficulty: f64,
    pub frequency: f64,
}

// ==================== Incorrect-streak urgency ====================

/// Consecutive incorrect answers, newest first, stopping at the first correct one.
pub fn incorrect_streak(events_newest_first: &[ResponseEvent]) -> u32 {
    events_newest_first
        .iter()
        .take_while(|e| !e.is_correct)
        .count() as u32
}

/// Linear in the streak, saturating at `cap`.
pub fn streak_score(streak: u32, cap: u32) -> f64 {
    if cap == 0 {
        return 0.0;
    }
    f64::from(streak.min(cap)) / f64::from(cap)
}

// ==================== Mastery Thompson sample ====================

/// One posterior draw of the learner's correctness rate in a category.
///
/// Cold start (no profile, or no attempts yet) yields 1.0 so brand-new
/// categories are not auto-prioritised.
pub fn mastery_sample(profile: Option<&KnowledgeProfile>, sampler: &mut BetaSampler) -> f64 {
    match profile {
        Some(profile) if profile.has_attempts() => {
            if !profile.is_consistent() {
                tracing::warn!(
                    user_id = %profile.user_id,
                    category_id = %profile.category_id,
                    total_attempts = profile.total_attempts,
                    correct_answers = profile.correct_answers,
                    "knowledge profile has more correct answers than attempts; clamping"
                );
            }
            sampler.sample(&profile.posterior())
        }
        _ => 1.0,
    }
}

/// Lower drawn mastery means higher priority.
pub fn mastery_score(sample: f64) -> f64 {
    clamp_unit(1.0 - sample)
}

// ==================== Difficulty match ====================

/// `1 - |item - desired| / range`; neutral 1.0 when no target is set.
pub fn difficulty_score(item_difficulty: f64, desired: Option<f64>, range: f64) -> f64 {
    match desired {
        None => 1.0,
        Some(desired) => {
            let gap = safe_ratio((item_difficulty - desired).abs(), range, 1.0);
            clamp_unit(1.0 - gap)
        }
    }
}

// ==================== Test-frequency decay ====================

/// `1 / (1 + Σ exp(-age / decay))` over the item's past presentations.
pub fn frequency_score(
    events: &[ResponseEvent],
    history: &ResponseHistory,
    decay_hours: f64,
) -> f64 {
    if events.is_empty() {
        return 1.0;
    }
    let pressure: f64 = events
        .iter()
        .map(|e| (-history.age_hours(e.answered_at) / decay_hours).exp())
        .sum();
    clamp_unit(1.0 / (1.0 + pressure))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use quizpath_algo::BetaSamplerKind;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    fn answer(correct: bool, hours_ago: i64) -> ResponseEvent {
        ResponseEvent {
            user_id: "u1".to_string(),
            question_id: format!("q{hours_ago}"),
            category_id: "c1".to_string(),
            is_correct: correct,
            time_spent_secs: 10.0,
            answered_at: now() - Duration::hours(hours_ago),
        }
    }

    fn profile(total: u32, correct: u32) -> KnowledgeProfile {
        KnowledgeProfile {
            user_id: "u1".to_string(),
            category_id: "c1".to_string(),
            total_attempts: total,
            correct_answers: correct,
            concept_mastery: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_streak_stops_at_first_correct() {
        let history = ResponseHistory::new(
            vec![answer(false, 1), answer(false, 2), answer(true, 3), answer(false, 4)],
            now(),
        );
        assert_eq!(incorrect_streak(history.for_category("c1")), 2);
        assert_eq!(incorrect_streak(&[]), 0);
    }

    #[test]
    fn test_streak_score_is_monotone_and_saturates() {
        let scores: Vec<f64> = (0..=7).map(|s| streak_score(s, 5)).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[5], 1.0);
        assert_eq!(scores[7], 1.0);
    }

    #[test]
    fn test_cold_start_mastery_is_lowest_priority() {
        let mut sampler = BetaSampler::with_seed(1, BetaSamplerKind::Exact);
        assert_eq!(mastery_sample(None, &mut sampler), 1.0);
        assert_eq!(mastery_sample(Some(&profile(0, 0)), &mut sampler), 1.0);
        assert_eq!(mastery_score(1.0), 0.0);
        assert!(mastery_score(1.0) <= 0.5);
    }

    #[test]
    fn test_weak_category_scores_higher_on_average() {
        let mut sampler = BetaSampler::with_seed(2, BetaSamplerKind::Exact);
        let weak = profile(40, 8);
        let strong = profile(40, 36);
        let n = 500;
        let avg = |p: &KnowledgeProfile, sampler: &mut BetaSampler| {
            (0..n)
                .map(|_| mastery_score(mastery_sample(Some(p), sampler)))
                .sum::<f64>()
                / n as f64
        };
        assert!(avg(&weak, &mut sampler) > avg(&strong, &mut sampler) + 0.5);
    }

    #[test]
    fn test_inconsistent_profile_is_clamped() {
        let mut sampler = BetaSampler::with_seed(3, BetaSamplerKind::Exact);
        let sample = mastery_sample(Some(&profile(2, 5)), &mut sampler);
        assert!((0.0..=1.0).contains(&sample));
    }

    #[test]
    fn test_difficulty_score() {
        assert_eq!(difficulty_score(2.0, None, 4.0), 1.0);
        assert_eq!(difficulty_score(3.0, Some(3.0), 4.0), 1.0);
        assert_eq!(difficulty_score(1.0, Some(5.0), 4.0), 0.0);
        assert_eq!(difficulty_score(4.0, Some(3.0), 4.0), 0.75);
        assert_eq!(difficulty_score(9.0, Some(1.0), 4.0), 0.0);
    }

    #[test]
    fn test_frequency_score_decays_with_recency_and_count() {
        let history = ResponseHistory::new(vec![], now());
        assert_eq!(frequency_score(&[], &history, 24.0), 1.0);

        let recent = [answer(false, 1)];
        let old = [answer(false, 200)];
        let many = [answer(false, 1), answer(false, 2), answer(false, 3)];

        let recent_score = frequency_score(&recent, &history, 24.0);
        let old_score = frequency_score(&old, &history, 24.0);
        let many_score = frequency_score(&many, &history, 24.0);

        assert!(old_score > recent_score);
        assert!(recent_score > many_score);
        assert!(old_score < 1.0 && many_score > 0.0);
    }
}
