//! Binary spaced-exposure suppression.

use crate::config::RecencyWindow;
use crate::model::Question;

use super::history::ResponseHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// Presented `seen_times` or more within the total window
    SeenTooOften { seen: u32 },
    /// Answered correctly within the correct window
    RecentlyCorrect,
}

/// Why `question` must not be served now, if it must not.
pub fn suppression(
    question: &Question,
    history: &ResponseHistory,
    window: &RecencyWindow,
) -> Option<Suppression> {
    let events = history.for_question(&question.id);
    if events.is_empty() {
        return None;
    }

    let mut seen: u32 = 0;
    for event in events {
        let age = history.age_hours(event.answered_at);
        if event.is_correct && age <= window.interval_correct_hours {
            return Some(Suppression::RecentlyCorrect);
        }
        if age <= window.interval_total_hours {
            seen += 1;
        }
    }

    if seen >= window.seen_times {
        Some(Suppression::SeenTooOften { seen })
    } else {
        None
    }
}

/// Keeps the questions that may be served; returns them with the number removed.
pub fn filter_recent(
    questions: Vec<Question>,
    history: &ResponseHistory,
    window: &RecencyWindow,
) -> (Vec<Question>, usize) {
    let before = questions.len();
    let survivors: Vec<Question> = questions
        .into_iter()
        .filter(|q| suppression(q, history, window).is_none())
        .collect();
    let removed = before - survivors.len();
    (survivors, removed)
}
