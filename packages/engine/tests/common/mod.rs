#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use quizpath_engine::{
    Category, CatalogSnapshot, ContentItem, ContentType, EngineConfig, InMemoryRepository,
    KnowledgeProfile, Question, ResponseEvent, SelectionEngine,
};

pub const USER: &str = "learner-1";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
}

pub fn category(id: &str) -> Category {
    Category {
        id: id.to_string(),
        section: "Bio/Biochem".to_string(),
        subject: "Biochemistry".to_string(),
        content: "1A".to_string(),
        concept: format!("concept-{id}"),
        general_weight: 1.0,
        content_items: Vec::new(),
    }
}

pub fn content(category_id: &str, id: &str, content_type: ContentType, minutes: f64) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        category_id: category_id.to_string(),
        title: format!("{id} title"),
        content_type,
        minutes_estimate: minutes,
    }
}

pub fn question(id: &str, category_id: &str, difficulty: f64) -> Question {
    Question {
        id: id.to_string(),
        category_id: category_id.to_string(),
        passage_id: None,
        question_type: "discrete".to_string(),
        difficulty,
    }
}

pub fn profile(category_id: &str, total: u32, correct: u32) -> KnowledgeProfile {
    KnowledgeProfile {
        user_id: USER.to_string(),
        category_id: category_id.to_string(),
        total_attempts: total,
        correct_answers: correct,
        concept_mastery: None,
        completed_at: None,
    }
}

pub fn response(question_id: &str, category_id: &str, correct: bool, hours_ago: i64) -> ResponseEvent {
    ResponseEvent {
        user_id: USER.to_string(),
        question_id: question_id.to_string(),
        category_id: category_id.to_string(),
        is_correct: correct,
        time_spent_secs: 45.0,
        answered_at: now() - Duration::hours(hours_ago),
    }
}

pub fn engine(snapshot: CatalogSnapshot) -> SelectionEngine {
    SelectionEngine::from_repository(
        Arc::new(InMemoryRepository::new(snapshot)),
        EngineConfig::default(),
    )
    .unwrap()
}
