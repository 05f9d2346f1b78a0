use std::cmp::Ordering;

use serde::Serialize;

use crate::error::SelectionError;

use super::ScoredCandidate;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPage {
    pub items: Vec<ScoredCandidate>,
    /// Size of the filtered candidate set, independent of the page
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Candidates removed by the recency filter
    pub filtered_out: usize,
}

/// Combined score descending, question id ascending on ties.
fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.combined_score
        .total_cmp(&a.combined_score)
        .then_with(|| a.id().cmp(b.id()))
}

pub fn rank(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(rank_order);
}

/// Rank and slice `[(page - 1) * page_size, page * page_size)`.
/// An empty candidate set is a valid, empty page.
pub fn select_page(
    mut candidates: Vec<ScoredCandidate>,
    page: usize,
    page_size: usize,
) -> Result<SelectionPage, SelectionError> {
    if page == 0 {
        return Err(SelectionError::invalid("page must be >= 1"));
    }
    if page_size == 0 {
        return Err(SelectionError::invalid("pageSize must be >= 1"));
    }

    rank(&mut candidates);
    let total_count = candidates.len();
    let start = (page - 1).saturating_mul(page_size).min(total_count);
    let end = start.saturating_add(page_size).min(total_count);
    let items: Vec<ScoredCandidate> = candidates.drain(start..end).collect();

    Ok(SelectionPage {
        items,
        total_count,
        page,
        page_size,
        total_pages: total_count.div_ceil(page_size),
        filtered_out: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::selection::SignalScores;

    fn candidate(id: &str, combined: f64) -> ScoredCandidate {
        ScoredCandidate {
            question: Question {
                id: id.to_string(),
                category_id: "c1".to_string(),
                passage_id: None,
                question_type: String::new(),
                difficulty: 3.0,
            },
            signals: SignalScores::default(),
            incorrect_streak: 0,
            mastery_sample: 1.0,
            general_weight: 1.0,
            combined_score: combined,
            probability: 0.0,
        }
    }

    fn ids(page: &SelectionPage) -> Vec<&str> {
        page.items.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn test_sorted_desc_with_id_tie_break() {
        let page = select_page(
            vec![
                candidate("q3", 0.5),
                candidate("q1", 0.9),
                candidate("q2", 0.5),
                candidate("q0", 0.1),
            ],
            1,
            10,
        )
        .unwrap();
        assert_eq!(ids(&page), vec!["q1", "q2", "q3", "q0"]);
        assert_eq!(page.total_count, 4);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_second_page_is_items_ten_to_twenty() {
        let candidates: Vec<ScoredCandidate> = (0..25)
            .map(|i| candidate(&format!("q{i:02}"), 1.0 - i as f64 / 100.0))
            .collect();
        let page = select_page(candidates, 2, 10).unwrap();
        let expected: Vec<String> = (10..20).map(|i| format!("q{i:02}")).collect();
        assert_eq!(ids(&page), expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = select_page(vec![candidate("q1", 1.0)], 5, 10).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn test_empty_set_is_not_an_error() {
        let page = select_page(vec![], 1, 10).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_zero_page_or_size_rejected() {
        assert!(matches!(
            select_page(vec![], 0, 10),
            Err(SelectionError::InvalidArgument(_))
        ));
        assert!(matches!(
            select_page(vec![], 1, 0),
            Err(SelectionError::InvalidArgument(_))
        ));
    }
}
