//! Selection pipeline: recency filter -> signal scorers -> weighted combiner -> selector.
//! The time-budget variant swaps the recency filter for a duration fit over categories.

pub mod combiner;
pub mod history;
pub mod recency;
pub mod selector;
pub mod signals;
pub mod time_budget;

use serde::Serialize;

use crate::model::Question;

pub use history::ResponseHistory;
pub use selector::SelectionPage;
pub use signals::SignalScores;
pub use time_budget::{CategorySelection, TimeBudgetPage};

/// A question annotated with everything that went into its rank.
/// Lives only for the duration of one selection call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub question: Question,
    pub signals: SignalScores,
    pub incorrect_streak: u32,
    pub mastery_sample: f64,
    pub general_weight: f64,
    pub combined_score: f64,
    /// Share of the normalised selection distribution
    pub probability: f64,
}

impl ScoredCandidate {
    pub fn id(&self) -> &str {
        &self.question.id
    }
}
