use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    CandidateFilter, CatalogRepository, ProfileRepository, RepositoryError, ResponseRepository,
};
use crate::model::{Category, KnowledgeProfile, Question, ResponseEvent};

/// Point-in-time copy of everything the engine reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub profiles: Vec<KnowledgeProfile>,
    #[serde(default)]
    pub responses: Vec<ResponseEvent>,
}

impl CatalogSnapshot {
    pub fn from_json_str(raw: &str) -> Result<Self, RepositoryError> {
        serde_json::from_str(raw)
            .map_err(|e| RepositoryError::new("snapshot", format!("invalid snapshot json: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::new("snapshot", format!("read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }
}

/// Serves all three repository traits from a [`CatalogSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    snapshot: CatalogSnapshot,
    category_index: HashMap<String, usize>,
}

impl InMemoryRepository {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let category_index = snapshot
            .categories
            .iter()
            .enumerate()
            .map(|(idx, category)| (category.id.clone(), idx))
            .collect();
        Self {
            snapshot,
            category_index,
        }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    fn category(&self, id: &str) -> Option<&Category> {
        self.category_index
            .get(id)
            .and_then(|&idx| self.snapshot.categories.get(idx))
    }

    fn matches(&self, question: &Question, filter: &CandidateFilter) -> bool {
        if let Some(ref category_id) = filter.category_id {
            if &question.category_id != category_id {
                return false;
            }
        }
        if let Some(ref passage_id) = filter.passage_id {
            if question.passage_id.as_ref() != Some(passage_id) {
                return false;
            }
        }
        if let Some(ref question_type) = filter.question_type {
            if !question.question_type.eq_ignore_ascii_case(question_type) {
                return false;
            }
        }
        if filter.content_category.is_none() && filter.concept_category.is_none() {
            return true;
        }

        let Some(category) = self.category(&question.category_id) else {
            return false;
        };
        if let Some(ref content) = filter.content_category {
            if &category.content != content {
                return false;
            }
        }
        if let Some(ref concept) = filter.concept_category {
            if &category.concept != concept {
                return false;
            }
        }
        true
    }
}

impl ProfileRepository for InMemoryRepository {
    fn get_profiles(&self, user_id: &str) -> Result<Vec<KnowledgeProfile>, RepositoryError> {
        Ok(self
            .snapshot
            .profiles
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl ResponseRepository for InMemoryRepository {
    fn get_recent_responses(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<ResponseEvent>, RepositoryError> {
        Ok(self
            .snapshot
            .responses
            .iter()
            .filter(|r| r.user_id == user_id && r.answered_at >= since)
            .cloned()
            .collect())
    }
}

impl CatalogRepository for InMemoryRepository {
    fn get_questions(&self, filter: &CandidateFilter) -> Result<Vec<Question>, RepositoryError> {
        Ok(self
            .snapshot
            .questions
            .iter()
            .filter(|q| self.matches(q, filter))
            .cloned()
            .collect())
    }

    fn get_categories(&self, ids: &[String]) -> Result<Vec<Category>, RepositoryError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.category(id))
            .cloned()
            .collect())
    }

    fn get_categories_with_content(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self
            .snapshot
            .categories
            .iter()
            .filter(|c| !c.content_items.is_empty())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;

    use super::*;

    fn snapshot() -> CatalogSnapshot {
        let raw = r#"{
            "categories": [
                {"id": "c1", "content": "1A", "concept": "Enzymes",
                 "contentItems": [{"id": "v1", "categoryId": "c1", "type": "video", "minutesEstimate": 12}]},
                {"id": "c2", "content": "1B", "concept": "Genetics"}
            ],
            "questions": [
                {"id": "q1", "categoryId": "c1", "type": "discrete", "difficulty": 2},
                {"id": "q2", "categoryId": "c1", "passageId": "p9", "type": "passage", "difficulty": 4},
                {"id": "q3", "categoryId": "c2", "type": "discrete", "difficulty": 3}
            ],
            "profiles": [
                {"userId": "u1", "categoryId": "c1", "totalAttempts": 3, "correctAnswers": 1},
                {"userId": "u2", "categoryId": "c1", "totalAttempts": 9, "correctAnswers": 9}
            ],
            "responses": [
                {"userId": "u1", "questionId": "q1", "categoryId": "c1", "isCorrect": false,
                 "answeredAt": "2026-03-01T10:00:00Z"},
                {"userId": "u1", "questionId": "q3", "categoryId": "c2", "isCorrect": true,
                 "answeredAt": "2026-02-01T10:00:00Z"}
            ]
        }"#;
        CatalogSnapshot::from_json_str(raw).unwrap()
    }

    fn ids(questions: &[Question]) -> Vec<&str> {
        questions.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn test_hard_filters() {
        let repo = InMemoryRepository::new(snapshot());

        let all = repo.get_questions(&CandidateFilter::default()).unwrap();
        assert_eq!(ids(&all), vec!["q1", "q2", "q3"]);

        let by_concept = repo
            .get_questions(&CandidateFilter {
                concept_category: Some("Genetics".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ids(&by_concept), vec!["q3"]);

        let by_passage = repo
            .get_questions(&CandidateFilter {
                passage_id: Some("p9".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ids(&by_passage), vec!["q2"]);

        let by_type = repo
            .get_questions(&CandidateFilter {
                category_id: Some("c1".to_string()),
                question_type: Some("DISCRETE".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ids(&by_type), vec!["q1"]);

        let unknown = repo
            .get_questions(&CandidateFilter {
                category_id: Some("nope".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_profiles_and_responses_are_per_user() {
        let repo = InMemoryRepository::new(snapshot());
        assert_eq!(repo.get_profiles("u1").unwrap().len(), 1);
        assert!(repo.get_profiles("ghost").unwrap().is_empty());

        let since = Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap();
        let recent = repo.get_recent_responses("u1", since).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].question_id, "q1");
    }

    #[test]
    fn test_categories() {
        let repo = InMemoryRepository::new(snapshot());
        let with_content = repo.get_categories_with_content().unwrap();
        assert_eq!(with_content.len(), 1);
        assert_eq!(with_content[0].id, "c1");

        let by_id = repo
            .get_categories(&["c2".to_string(), "missing".to_string()])
            .unwrap();
        assert_eq!(by_id.len(), 1);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let raw = serde_json::to_string(&snapshot()).unwrap();
        file.write_all(raw.as_bytes()).unwrap();

        let loaded = CatalogSnapshot::from_path(file.path()).unwrap();
        assert_eq!(loaded.questions.len(), 3);

        let err = CatalogSnapshot::from_path("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.repository, "snapshot");
    }
}
