use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use quizpath_algo::{BetaSampler, BetaSamplerKind};
use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::error::SelectionError;
use crate::model::KnowledgeProfile;
use crate::repository::{CatalogRepository, ProfileRepository, ResponseRepository};
use crate::request::{SelectionRequest, TimeBudgetRequest};
use crate::selection::history::ResponseHistory;
use crate::selection::signals::{
    difficulty_score, frequency_score, incorrect_streak, mastery_sample, mastery_score,
    streak_score,
};
use crate::selection::{
    combiner, recency, selector, time_budget, ScoredCandidate, SelectionPage, SignalScores,
    TimeBudgetPage,
};

/// Stateless selection engine over three read-only repositories.
///
/// Each call reads its own snapshot, owns its sampler and returns; nothing is
/// shared between calls, so concurrent requests need no locking.
#[derive(Clone)]
pub struct SelectionEngine {
    profiles: Arc<dyn ProfileRepository>,
    responses: Arc<dyn ResponseRepository>,
    catalog: Arc<dyn CatalogRepository>,
    config: EngineConfig,
}

impl SelectionEngine {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        responses: Arc<dyn ResponseRepository>,
        catalog: Arc<dyn CatalogRepository>,
        config: EngineConfig,
    ) -> Result<Self, SelectionError> {
        config.validate()?;
        Ok(Self {
            profiles,
            responses,
            catalog,
            config,
        })
    }

    /// One backing store serving all three repository roles.
    pub fn from_repository<R>(repository: Arc<R>, config: EngineConfig) -> Result<Self, SelectionError>
    where
        R: ProfileRepository + ResponseRepository + CatalogRepository + 'static,
    {
        Self::new(repository.clone(), repository.clone(), repository, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank the questions matching the hard filters and return one page.
    pub fn select_questions(
        &self,
        request: &SelectionRequest,
    ) -> Result<SelectionPage, SelectionError> {
        let params = request.resolve(&self.config)?;
        let as_of = request.as_of.unwrap_or_else(Utc::now);
        let user_id = request.user_id.as_str();

        let questions = self.catalog.get_questions(&request.filter).map_err(|e| {
            tracing::warn!(user_id, error = %e, "catalog read failed");
            SelectionError::from(e)
        })?;
        if questions.is_empty() {
            return Err(SelectionError::not_found(format!(
                "no questions match filters {:?}",
                request.filter
            )));
        }

        let since = self.history_since(as_of, params.recency.widest_hours());
        let events = self
            .responses
            .get_recent_responses(user_id, since)
            .map_err(|e| {
                tracing::warn!(user_id, error = %e, "response history read failed");
                SelectionError::from(e)
            })?;
        let profiles = self.profiles_by_category(user_id)?;
        let history = ResponseHistory::new(events, as_of);

        let candidates = questions.len();
        let (survivors, filtered_out) = recency::filter_recent(questions, &history, &params.recency);
        tracing::debug!(user_id, candidates, survivors = survivors.len(), filtered_out, "recency filter applied");

        if survivors.is_empty() {
            tracing::info!(user_id, "no questions due");
            let mut page = selector::select_page(Vec::new(), params.page, params.page_size)?;
            page.filtered_out = filtered_out;
            return Ok(page);
        }

        let category_ids: Vec<String> = survivors
            .iter()
            .map(|q| q.category_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let general_weights: HashMap<String, f64> = self
            .catalog
            .get_categories(&category_ids)
            .map_err(|e| {
                tracing::warn!(user_id, error = %e, "category read failed");
                SelectionError::from(e)
            })?
            .into_iter()
            .map(|c| (c.id, c.general_weight.max(0.0)))
            .collect();

        // One Thompson draw per category, in id order so a seed fixes the outcome
        let mut sampler = self.sampler(request.seed, params.sampler);
        let mastery: HashMap<&str, f64> = category_ids
            .iter()
            .map(|id| (id.as_str(), mastery_sample(profiles.get(id), &mut sampler)))
            .collect();
        let streaks: HashMap<&str, u32> = category_ids
            .iter()
            .map(|id| (id.as_str(), incorrect_streak(history.for_category(id))))
            .collect();

        let scoring = &self.config.scoring;
        let mut scored: Vec<ScoredCandidate> = survivors
            .into_par_iter()
            .map(|question| {
                let category = question.category_id.as_str();
                let streak = streaks.get(category).copied().unwrap_or(0);
                let sample = mastery.get(category).copied().unwrap_or(1.0);
                let signals = SignalScores {
                    incorrect_streak: streak_score(streak, scoring.streak_cap),
                    mastery: mastery_score(sample),
                    difficulty: difficulty_score(
                        question.difficulty,
                        params.desired_difficulty,
                        scoring.difficulty_range(),
                    ),
                    frequency: frequency_score(
                        history.for_question(&question.id),
                        &history,
                        scoring.frequency_decay_hours,
                    ),
                };
                let general_weight = general_weights.get(category).copied().unwrap_or(1.0);
                let combined_score = combiner::combine(&signals, &params.weights) * general_weight;
                ScoredCandidate {
                    question,
                    signals,
                    incorrect_streak: streak,
                    mastery_sample: sample,
                    general_weight,
                    combined_score,
                    probability: 0.0,
                }
            })
            .collect();

        combiner::normalize(&mut scored);
        let mut page = selector::select_page(scored, params.page, params.page_size)?;
        page.filtered_out = filtered_out;

        tracing::info!(
            user_id,
            total = page.total_count,
            returned = page.items.len(),
            page = page.page,
            page_size = page.page_size,
            "questions selected"
        );
        Ok(page)
    }

    /// Top categories whose study material fits the available minutes.
    pub fn select_categories_for_time_budget(
        &self,
        request: &TimeBudgetRequest,
    ) -> Result<TimeBudgetPage, SelectionError> {
        let params = request.resolve(&self.config)?;
        let user_id = request.user_id.as_str();

        let categories = self.catalog.get_categories_with_content().map_err(|e| {
            tracing::warn!(user_id, error = %e, "catalog read failed");
            SelectionError::from(e)
        })?;
        let profiles = self.profiles_by_category(user_id)?;

        let mut sampler = self.sampler(request.seed, params.sampler);
        let page = time_budget::select_for_time_budget(categories, &profiles, &params.budget, &mut sampler);

        tracing::info!(
            user_id,
            available_minutes = params.budget.available_minutes,
            tolerance_minutes = params.budget.tolerance_minutes,
            total = page.total_count,
            returned = page.items.len(),
            "categories selected for time budget"
        );
        Ok(page)
    }

    fn profiles_by_category(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, KnowledgeProfile>, SelectionError> {
        let profiles = self.profiles.get_profiles(user_id).map_err(|e| {
            tracing::warn!(user_id, error = %e, "profile read failed");
            SelectionError::from(e)
        })?;
        Ok(profiles
            .into_iter()
            .map(|p| (p.category_id.clone(), p))
            .collect())
    }

    fn history_since(&self, as_of: DateTime<Utc>, widest_window_hours: f64) -> DateTime<Utc> {
        let hours = self.config.scoring.history_lookback_hours.max(widest_window_hours);
        let millis = (hours * 3_600_000.0).min(i64::MAX as f64 / 2.0) as i64;
        Duration::try_milliseconds(millis)
            .and_then(|span| as_of.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn sampler(&self, seed: Option<u64>, kind: BetaSamplerKind) -> BetaSampler {
        let sampler = match seed {
            Some(seed) => BetaSampler::with_seed(seed, kind),
            None => BetaSampler::from_entropy(kind),
        };
        tracing::debug!(kind = ?sampler.kind(), seeded = seed.is_some(), "beta sampler ready");
        sampler
    }
}
