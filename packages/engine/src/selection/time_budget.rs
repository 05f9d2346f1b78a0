//! Category-level selection that fits a study window instead of paging questions.

use std::cmp::Ordering;
use std::collections::HashMap;

use quizpath_algo::BetaSampler;
use serde::Serialize;

use crate::config::TimeBudgetConfig;
use crate::model::{Category, ContentItem, ContentType, KnowledgeProfile};

use super::signals::{mastery_sample, mastery_score};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitEvaluation {
    pub content_type: ContentType,
    pub total_minutes: f64,
    pub video_minutes: f64,
    pub reading_minutes: f64,
    pub fits_time_slot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySelection {
    pub category: Category,
    pub content_type: ContentType,
    pub total_minutes: f64,
    pub video_minutes: f64,
    pub reading_minutes: f64,
    pub fits_time_slot: bool,
    pub mastery_sample: f64,
    pub mastery_score: f64,
    /// Items of `content_type` only
    pub content_items: Vec<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBudgetPage {
    pub items: Vec<CategorySelection>,
    /// Eligible categories before the top-N cut
    pub total_count: usize,
}

fn within(total: f64, budget: &TimeBudgetConfig) -> bool {
    (total - budget.available_minutes).abs() <= budget.tolerance_minutes
}

/// Decide which content type to serve for a category and whether it fits the window.
///
/// Video wins when both fit. When neither fits the category still qualifies
/// through whichever type it has; with both present, the closer total is used.
pub fn evaluate_fit(category: &Category, budget: &TimeBudgetConfig) -> Option<FitEvaluation> {
    let has_video = category.has_content_of(ContentType::Video);
    let has_reading = category.has_content_of(ContentType::Reading);
    if !has_video && !has_reading {
        return None;
    }

    let video_minutes = category.minutes_for(ContentType::Video);
    let reading_minutes = category.minutes_for(ContentType::Reading);
    let video_fits = has_video && within(video_minutes, budget);
    let reading_fits = has_reading && within(reading_minutes, budget);

    let content_type = if video_fits {
        ContentType::Video
    } else if reading_fits {
        ContentType::Reading
    } else if has_video && has_reading {
        let video_gap = (video_minutes - budget.available_minutes).abs();
        let reading_gap = (reading_minutes - budget.available_minutes).abs();
        if reading_gap < video_gap {
            ContentType::Reading
        } else {
            ContentType::Video
        }
    } else if has_video {
        ContentType::Video
    } else {
        ContentType::Reading
    };

    let total_minutes = match content_type {
        ContentType::Video => video_minutes,
        ContentType::Reading => reading_minutes,
    };

    Some(FitEvaluation {
        content_type,
        total_minutes,
        video_minutes,
        reading_minutes,
        fits_time_slot: video_fits || reading_fits,
    })
}

/// Fitting first, then lower mastery first, then category id.
fn rank_order(a: &CategorySelection, b: &CategorySelection) -> Ordering {
    b.fits_time_slot
        .cmp(&a.fits_time_slot)
        .then_with(|| b.mastery_score.total_cmp(&a.mastery_score))
        .then_with(|| a.category.id.cmp(&b.category.id))
}

/// Categories with content and no completed profile, ranked and cut to the top N.
pub fn select_for_time_budget(
    mut categories: Vec<Category>,
    profiles: &HashMap<String, KnowledgeProfile>,
    budget: &TimeBudgetConfig,
    sampler: &mut BetaSampler,
) -> TimeBudgetPage {
    // Draw order must not depend on repository ordering
    categories.sort_by(|a, b| a.id.cmp(&b.id));

    let mut selections: Vec<CategorySelection> = Vec::with_capacity(categories.len());
    for category in categories {
        let profile = profiles.get(&category.id);
        if profile.is_some_and(KnowledgeProfile::is_completed) {
            continue;
        }
        let Some(fit) = evaluate_fit(&category, budget) else {
            continue;
        };

        let sample = mastery_sample(profile, sampler);
        tracing::debug!(
            category_id = %category.id,
            content_type = fit.content_type.as_str(),
            total_minutes = fit.total_minutes,
            fits = fit.fits_time_slot,
            "category evaluated"
        );
        let content_items = category.items_of(fit.content_type);
        selections.push(CategorySelection {
            category,
            content_type: fit.content_type,
            total_minutes: fit.total_minutes,
            video_minutes: fit.video_minutes,
            reading_minutes: fit.reading_minutes,
            fits_time_slot: fit.fits_time_slot,
            mastery_sample: sample,
            mastery_score: mastery_score(sample),
            content_items,
        });
    }

    let total_count = selections.len();
    selections.sort_by(rank_order);
    selections.truncate(budget.top_category_count);

    TimeBudgetPage {
        items: selections,
        total_count,
    }
}
