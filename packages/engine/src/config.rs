use std::str::FromStr;

use quizpath_algo::sanitize::is_valid_weight;
use quizpath_algo::BetaSamplerKind;
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

const DEFAULT_SEEN_TIMES: u32 = 3;
const DEFAULT_INTERVAL_TOTAL_HOURS: f64 = 48.0;
const DEFAULT_INTERVAL_CORRECT_HOURS: f64 = 72.0;

const DEFAULT_STREAK_WEIGHT: f64 = 0.25;
const DEFAULT_MASTERY_WEIGHT: f64 = 0.5;
const DEFAULT_DIFFICULTY_WEIGHT: f64 = 0.05;
const DEFAULT_FREQUENCY_WEIGHT: f64 = 0.2;

const DEFAULT_AVAILABLE_MINUTES: f64 = 60.0;
const DEFAULT_TOLERANCE_MINUTES: f64 = 15.0;
const DEFAULT_TOP_CATEGORY_COUNT: usize = 6;

/// Spaced-exposure suppression thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecencyWindow {
    /// Presentations within `interval_total_hours` that exclude an item
    pub seen_times: u32,
    pub interval_total_hours: f64,
    pub interval_correct_hours: f64,
}

impl Default for RecencyWindow {
    fn default() -> Self {
        Self {
            seen_times: DEFAULT_SEEN_TIMES,
            interval_total_hours: DEFAULT_INTERVAL_TOTAL_HOURS,
            interval_correct_hours: DEFAULT_INTERVAL_CORRECT_HOURS,
        }
    }
}

impl RecencyWindow {
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.seen_times == 0 {
            return Err(SelectionError::invalid("seenTimes must be >= 1"));
        }
        check_hours("intervalTotalHours", self.interval_total_hours)?;
        check_hours("intervalCorrectHours", self.interval_correct_hours)
    }

    pub fn widest_hours(&self) -> f64 {
        self.interval_total_hours.max(self.interval_correct_hours)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    #[serde(rename = "incorrectStreakProbWeight")]
    pub incorrect_streak: f64,
    #[serde(rename = "conceptContentMasteryProbWeight")]
    pub concept_content_mastery: f64,
    #[serde(rename = "desiredDifficultyProbWeight")]
    pub desired_difficulty: f64,
    #[serde(rename = "testFrequencyProbWeight")]
    pub test_frequency: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            incorrect_streak: DEFAULT_STREAK_WEIGHT,
            concept_content_mastery: DEFAULT_MASTERY_WEIGHT,
            desired_difficulty: DEFAULT_DIFFICULTY_WEIGHT,
            test_frequency: DEFAULT_FREQUENCY_WEIGHT,
        }
    }
}

impl SignalWeights {
    pub fn validate(&self) -> Result<(), SelectionError> {
        for (name, weight) in [
            ("incorrectStreakProbWeight", self.incorrect_streak),
            ("conceptContentMasteryProbWeight", self.concept_content_mastery),
            ("desiredDifficultyProbWeight", self.desired_difficulty),
            ("testFrequencyProbWeight", self.test_frequency),
        ] {
            if !is_valid_weight(weight) {
                return Err(SelectionError::invalid(format!(
                    "{name} must be a finite non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

/// Shape parameters of the individual scorers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringConfig {
    /// Streak length at which the urgency score saturates
    pub streak_cap: u32,
    pub min_difficulty: f64,
    pub max_difficulty: f64,
    /// e-folding time of a past presentation's suppression
    pub frequency_decay_hours: f64,
    /// How far back response history is read for every signal
    pub history_lookback_hours: f64,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            streak_cap: 5,
            min_difficulty: 1.0,
            max_difficulty: 5.0,
            frequency_decay_hours: 24.0,
            history_lookback_hours: 720.0,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl ScoringConfig {
    pub fn difficulty_range(&self) -> f64 {
        self.max_difficulty - self.min_difficulty
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.streak_cap == 0 {
            return Err(SelectionError::invalid("streakCap must be >= 1"));
        }
        if !(self.min_difficulty.is_finite() && self.max_difficulty.is_finite())
            || self.difficulty_range() <= 0.0
        {
            return Err(SelectionError::invalid(
                "maxDifficulty must be greater than minDifficulty",
            ));
        }
        if !(self.frequency_decay_hours.is_finite() && self.frequency_decay_hours > 0.0) {
            return Err(SelectionError::invalid("frequencyDecayHours must be > 0"));
        }
        check_hours("historyLookbackHours", self.history_lookback_hours)?;
        if self.default_page_size < 1 || self.max_page_size < self.default_page_size {
            return Err(SelectionError::invalid(
                "page size defaults must satisfy 1 <= defaultPageSize <= maxPageSize",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeBudgetConfig {
    pub available_minutes: f64,
    pub tolerance_minutes: f64,
    pub top_category_count: usize,
}

impl Default for TimeBudgetConfig {
    fn default() -> Self {
        Self {
            available_minutes: DEFAULT_AVAILABLE_MINUTES,
            tolerance_minutes: DEFAULT_TOLERANCE_MINUTES,
            top_category_count: DEFAULT_TOP_CATEGORY_COUNT,
        }
    }
}

impl TimeBudgetConfig {
    pub fn validate(&self) -> Result<(), SelectionError> {
        if !(self.available_minutes.is_finite() && self.available_minutes > 0.0) {
            return Err(SelectionError::invalid("availableMinutes must be > 0"));
        }
        if !(self.tolerance_minutes.is_finite() && self.tolerance_minutes >= 0.0) {
            return Err(SelectionError::invalid("toleranceMinutes must be >= 0"));
        }
        if self.top_category_count == 0 {
            return Err(SelectionError::invalid("topCategoryCount must be >= 1"));
        }
        Ok(())
    }
}

/// Engine-wide defaults. Every field can be overridden per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub recency: RecencyWindow,
    pub weights: SignalWeights,
    pub scoring: ScoringConfig,
    pub time_budget: TimeBudgetConfig,
    pub sampler: BetaSamplerKind,
}

impl EngineConfig {
    /// Defaults overlaid with `QUIZPATH_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let recency = &mut config.recency;
        recency.seen_times = env_or("QUIZPATH_SEEN_TIMES", recency.seen_times);
        recency.interval_total_hours =
            env_or("QUIZPATH_INTERVAL_TOTAL_HOURS", recency.interval_total_hours);
        recency.interval_correct_hours =
            env_or("QUIZPATH_INTERVAL_CORRECT_HOURS", recency.interval_correct_hours);

        let weights = &mut config.weights;
        weights.incorrect_streak =
            env_or("QUIZPATH_INCORRECT_STREAK_WEIGHT", weights.incorrect_streak);
        weights.concept_content_mastery =
            env_or("QUIZPATH_MASTERY_WEIGHT", weights.concept_content_mastery);
        weights.desired_difficulty =
            env_or("QUIZPATH_DIFFICULTY_WEIGHT", weights.desired_difficulty);
        weights.test_frequency = env_or("QUIZPATH_FREQUENCY_WEIGHT", weights.test_frequency);

        let scoring = &mut config.scoring;
        scoring.streak_cap = env_or("QUIZPATH_STREAK_CAP", scoring.streak_cap);
        scoring.frequency_decay_hours =
            env_or("QUIZPATH_FREQUENCY_DECAY_HOURS", scoring.frequency_decay_hours);
        scoring.history_lookback_hours =
            env_or("QUIZPATH_HISTORY_LOOKBACK_HOURS", scoring.history_lookback_hours);
        scoring.max_page_size = env_or("QUIZPATH_MAX_PAGE_SIZE", scoring.max_page_size);

        let time_budget = &mut config.time_budget;
        time_budget.available_minutes =
            env_or("QUIZPATH_AVAILABLE_MINUTES", time_budget.available_minutes);
        time_budget.tolerance_minutes =
            env_or("QUIZPATH_TOLERANCE_MINUTES", time_budget.tolerance_minutes);
        time_budget.top_category_count =
            env_or("QUIZPATH_TOP_CATEGORY_COUNT", time_budget.top_category_count);

        if let Some(kind) = std::env::var("QUIZPATH_SAMPLER")
            .ok()
            .and_then(|value| BetaSamplerKind::from_str(&value))
        {
            config.sampler = kind;
        }

        config
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        self.recency.validate()?;
        self.weights.validate()?;
        self.scoring.validate()?;
        self.time_budget.validate()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn check_hours(name: &str, hours: f64) -> Result<(), SelectionError> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(())
    } else {
        Err(SelectionError::invalid(format!(
            "{name} must be a finite non-negative number of hours, got {hours}"
        )))
    }
}
