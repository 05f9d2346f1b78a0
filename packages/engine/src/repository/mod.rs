//! Read-only collaborators the engine pulls its snapshot from.
//!
//! Persistence lives elsewhere; implementations are expected to run bounded,
//! per-user queries. The engine never writes through these traits.

mod memory;

pub use memory::{CatalogSnapshot, InMemoryRepository};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Category, KnowledgeProfile, Question, ResponseEvent};

#[derive(Debug, Clone, thiserror::Error)]
#[error("{repository} repository unavailable: {message}")]
pub struct RepositoryError {
    pub repository: &'static str,
    pub message: String,
}

impl RepositoryError {
    pub fn new(repository: &'static str, message: impl Into<String>) -> Self {
        Self {
            repository,
            message: message.into(),
        }
    }
}

/// Hard filters. A question must match every populated field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Matches `Category::content`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_category: Option<String>,
    /// Matches `Category::concept`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
}

pub trait ProfileRepository: Send + Sync {
    fn get_profiles(&self, user_id: &str) -> Result<Vec<KnowledgeProfile>, RepositoryError>;
}

pub trait ResponseRepository: Send + Sync {
    /// Events answered at or after `since`.
    fn get_recent_responses(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<ResponseEvent>, RepositoryError>;
}

pub trait CatalogRepository: Send + Sync {
    /// Questions matching the hard filters.
    fn get_questions(&self, filter: &CandidateFilter) -> Result<Vec<Question>, RepositoryError>;

    /// Categories by id; unknown ids are skipped.
    fn get_categories(&self, ids: &[String]) -> Result<Vec<Category>, RepositoryError>;

    /// Every category that owns at least one content item.
    fn get_categories_with_content(&self) -> Result<Vec<Category>, RepositoryError>;
}
