//! Per-call request objects and their resolution against [`EngineConfig`].

use chrono::{DateTime, Utc};
use quizpath_algo::BetaSamplerKind;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, RecencyWindow, SignalWeights, TimeBudgetConfig};
use crate::error::SelectionError;
use crate::repository::CandidateFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub filter: CandidateFilter,
    /// Soft target; only feeds the difficulty-match signal
    #[serde(default)]
    pub desired_difficulty: Option<f64>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub seen_times: Option<i64>,
    #[serde(default)]
    pub interval_total_hours: Option<f64>,
    #[serde(default)]
    pub interval_correct_hours: Option<f64>,
    #[serde(default)]
    pub incorrect_streak_prob_weight: Option<f64>,
    #[serde(default)]
    pub concept_content_mastery_prob_weight: Option<f64>,
    #[serde(default)]
    pub desired_difficulty_prob_weight: Option<f64>,
    #[serde(default)]
    pub test_frequency_prob_weight: Option<f64>,
    #[serde(default)]
    pub sampler: Option<BetaSamplerKind>,
    /// Fixes the Thompson draws for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
    /// Evaluation instant; defaults to now
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

impl SelectionRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn as_of(mut self, at: DateTime<Utc>) -> Self {
        self.as_of = Some(at);
        self
    }

    pub fn resolve(&self, config: &EngineConfig) -> Result<ResolvedSelection, SelectionError> {
        if self.user_id.trim().is_empty() {
            return Err(SelectionError::invalid("userId must not be empty"));
        }

        let scoring = &config.scoring;
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(scoring.default_page_size);
        if page <= 0 {
            return Err(SelectionError::invalid(format!("page must be >= 1, got {page}")));
        }
        if page_size <= 0 || page_size > scoring.max_page_size {
            return Err(SelectionError::invalid(format!(
                "pageSize must be between 1 and {}, got {page_size}",
                scoring.max_page_size
            )));
        }

        let seen_times = match self.seen_times {
            Some(n) if n <= 0 => {
                return Err(SelectionError::invalid(format!("seenTimes must be >= 1, got {n}")))
            }
            Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
            None => config.recency.seen_times,
        };
        let recency = RecencyWindow {
            seen_times,
            interval_total_hours: self
                .interval_total_hours
                .unwrap_or(config.recency.interval_total_hours),
            interval_correct_hours: self
                .interval_correct_hours
                .unwrap_or(config.recency.interval_correct_hours),
        };
        recency.validate()?;

        let defaults = config.weights;
        let weights = SignalWeights {
            incorrect_streak: self
                .incorrect_streak_prob_weight
                .unwrap_or(defaults.incorrect_streak),
            concept_content_mastery: self
                .concept_content_mastery_prob_weight
                .unwrap_or(defaults.concept_content_mastery),
            desired_difficulty: self
                .desired_difficulty_prob_weight
                .unwrap_or(defaults.desired_difficulty),
            test_frequency: self
                .test_frequency_prob_weight
                .unwrap_or(defaults.test_frequency),
        };
        weights.validate()?;

        if let Some(desired) = self.desired_difficulty {
            if !desired.is_finite()
                || desired < scoring.min_difficulty
                || desired > scoring.max_difficulty
            {
                return Err(SelectionError::invalid(format!(
                    "desiredDifficulty must be within [{}, {}], got {desired}",
                    scoring.min_difficulty, scoring.max_difficulty
                )));
            }
        }

        Ok(ResolvedSelection {
            recency,
            weights,
            desired_difficulty: self.desired_difficulty,
            page: page as usize,
            page_size: page_size as usize,
            sampler: self.sampler.unwrap_or(config.sampler),
        })
    }
}

/// Fully-populated, validated parameters for one `select_questions` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSelection {
    pub recency: RecencyWindow,
    pub weights: SignalWeights,
    pub desired_difficulty: Option<f64>,
    pub page: usize,
    pub page_size: usize,
    pub sampler: BetaSamplerKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBudgetRequest {
    pub user_id: String,
    #[serde(default)]
    pub available_minutes: Option<f64>,
    #[serde(default)]
    pub tolerance_minutes: Option<f64>,
    #[serde(default)]
    pub top_category_count: Option<i64>,
    #[serde(default)]
    pub sampler: Option<BetaSamplerKind>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TimeBudgetRequest {
    pub fn new(user_id: impl Into<String>, available_minutes: f64, tolerance_minutes: f64) -> Self {
        Self {
            user_id: user_id.into(),
            available_minutes: Some(available_minutes),
            tolerance_minutes: Some(tolerance_minutes),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn resolve(&self, config: &EngineConfig) -> Result<ResolvedTimeBudget, SelectionError> {
        if self.user_id.trim().is_empty() {
            return Err(SelectionError::invalid("userId must not be empty"));
        }
        let defaults = config.time_budget;
        let top_category_count = match self.top_category_count {
            Some(n) if n <= 0 => {
                return Err(SelectionError::invalid(format!(
                    "topCategoryCount must be >= 1, got {n}"
                )))
            }
            Some(n) => n as usize,
            None => defaults.top_category_count,
        };
        let budget = TimeBudgetConfig {
            available_minutes: self.available_minutes.unwrap_or(defaults.available_minutes),
            tolerance_minutes: self.tolerance_minutes.unwrap_or(defaults.tolerance_minutes),
            top_category_count,
        };
        budget.validate()?;

        Ok(ResolvedTimeBudget {
            budget,
            sampler: self.sampler.unwrap_or(config.sampler),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTimeBudget {
    pub budget: TimeBudgetConfig,
    pub sampler: BetaSamplerKind,
}

/// Either engine operation, as accepted by the snapshot CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", content = "request", rename_all = "camelCase")]
pub enum EngineRequest {
    Questions(SelectionRequest),
    TimeBudget(TimeBudgetRequest),
}
