//! Read-only domain data consumed by the selection engine.

use chrono::{DateTime, Utc};
use quizpath_algo::BetaParams;
use serde::{Deserialize, Serialize};

fn default_general_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Reading,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Reading => "reading",
        }
    }
}

/// Study material attached to a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub category_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub minutes_estimate: f64,
}

/// Hierarchical label: section > subject > content > concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub concept: String,
    /// Static importance multiplier set by content authoring
    #[serde(default = "default_general_weight")]
    pub general_weight: f64,
    #[serde(default)]
    pub content_items: Vec<ContentItem>,
}

impl Category {
    pub fn minutes_for(&self, content_type: ContentType) -> f64 {
        self.content_items
            .iter()
            .filter(|item| item.content_type == content_type)
            .map(|item| item.minutes_estimate.max(0.0))
            .sum()
    }

    pub fn has_content_of(&self, content_type: ContentType) -> bool {
        self.content_items
            .iter()
            .any(|item| item.content_type == content_type)
    }

    pub fn items_of(&self, content_type: ContentType) -> Vec<ContentItem> {
        self.content_items
            .iter()
            .filter(|item| item.content_type == content_type)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage_id: Option<String>,
    #[serde(rename = "type", default)]
    pub question_type: String,
    pub difficulty: f64,
}

/// Per (user, category) aggregate maintained by the response-recording side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeProfile {
    pub user_id: String,
    pub category_id: String,
    pub total_attempts: u32,
    pub correct_answers: u32,
    #[serde(default)]
    pub concept_mastery: Option<f64>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl KnowledgeProfile {
    /// `correct_answers <= total_attempts`
    pub fn is_consistent(&self) -> bool {
        self.correct_answers <= self.total_attempts
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn has_attempts(&self) -> bool {
        self.total_attempts > 0
    }

    pub fn posterior(&self) -> BetaParams {
        BetaParams::from_attempts(self.total_attempts, self.correct_answers)
    }
}

/// One answered presentation. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEvent {
    pub user_id: String,
    pub question_id: String,
    pub category_id: String,
    pub is_correct: bool,
    #[serde(default)]
    pub time_spent_secs: f64,
    pub answered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, content_type: ContentType, minutes: f64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            category_id: "cat".to_string(),
            title: String::new(),
            content_type,
            minutes_estimate: minutes,
        }
    }

    #[test]
    fn test_minutes_for_sums_by_type() {
        let category = Category {
            id: "cat".to_string(),
            section: "Bio".to_string(),
            subject: "Biology".to_string(),
            content: "1A".to_string(),
            concept: "Amino acids".to_string(),
            general_weight: 1.0,
            content_items: vec![
                item("v1", ContentType::Video, 20.0),
                item("v2", ContentType::Video, 15.0),
                item("r1", ContentType::Reading, 30.0),
            ],
        };
        assert_eq!(category.minutes_for(ContentType::Video), 35.0);
        assert_eq!(category.minutes_for(ContentType::Reading), 30.0);
        assert_eq!(category.items_of(ContentType::Video).len(), 2);
    }

    #[test]
    fn test_category_deserialize_defaults() {
        let json = r#"{"id":"c1"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.general_weight, 1.0);
        assert!(category.content_items.is_empty());
    }

    #[test]
    fn test_question_type_field_rename() {
        let json = r#"{"id":"q1","categoryId":"c1","type":"passage","difficulty":3}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.question_type, "passage");
        assert_eq!(question.difficulty, 3.0);
    }

    #[test]
    fn test_profile_consistency() {
        let mut profile = KnowledgeProfile {
            user_id: "u".to_string(),
            category_id: "c".to_string(),
            total_attempts: 4,
            correct_answers: 3,
            concept_mastery: None,
            completed_at: None,
        };
        assert!(profile.is_consistent());
        profile.correct_answers = 5;
        assert!(!profile.is_consistent());
        assert_eq!(profile.posterior().beta, 1.0);
    }
}
