use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::ResponseEvent;

/// A user's recent responses indexed by question and by category,
/// newest first. Events after `as_of` are ignored.
#[derive(Debug, Clone, Default)]
pub struct ResponseHistory {
    as_of: DateTime<Utc>,
    by_question: HashMap<String, Vec<ResponseEvent>>,
    by_category: HashMap<String, Vec<ResponseEvent>>,
}

impl ResponseHistory {
    pub fn new(events: Vec<ResponseEvent>, as_of: DateTime<Utc>) -> Self {
        let mut by_question: HashMap<String, Vec<ResponseEvent>> = HashMap::new();
        let mut by_category: HashMap<String, Vec<ResponseEvent>> = HashMap::new();

        for event in events.into_iter().filter(|e| e.answered_at <= as_of) {
            by_category
                .entry(event.category_id.clone())
                .or_default()
                .push(event.clone());
            by_question
                .entry(event.question_id.clone())
                .or_default()
                .push(event);
        }

        // Newest first; question id keeps same-instant events in a stable order
        let newest_first = |a: &ResponseEvent, b: &ResponseEvent| {
            b.answered_at
                .cmp(&a.answered_at)
                .then_with(|| a.question_id.cmp(&b.question_id))
        };
        for events in by_question.values_mut() {
            events.sort_by(newest_first);
        }
        for events in by_category.values_mut() {
            events.sort_by(newest_first);
        }

        Self {
            as_of,
            by_question,
            by_category,
        }
    }

    pub fn for_question(&self, question_id: &str) -> &[ResponseEvent] {
        self.by_question
            .get(question_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn for_category(&self, category_id: &str) -> &[ResponseEvent] {
        self.by_category
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Hours between `at` and the evaluation instant, never negative.
    pub fn age_hours(&self, at: DateTime<Utc>) -> f64 {
        let millis = (self.as_of - at).num_milliseconds().max(0);
        millis as f64 / 3_600_000.0
    }
}
