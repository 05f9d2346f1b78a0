//! # quizpath-engine
//!
//! Adaptive content selection for exam preparation: decides which questions
//! (or which study categories, given a time budget) a learner should see next.
//!
//! Questions pass through a recency filter, four signal scorers (incorrect
//! streak, Thompson-sampled mastery, difficulty match, test-frequency decay), a
//! weighted combiner and a paginating selector. The time-budget variant ranks
//! whole categories by how well their material fits the available minutes.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use quizpath_engine::{
//!     CatalogSnapshot, EngineConfig, InMemoryRepository, SelectionEngine, SelectionRequest,
//! };
//!
//! let snapshot = CatalogSnapshot::from_json_str(
//!     r#"{"questions":[{"id":"q1","categoryId":"c1","difficulty":2}]}"#,
//! )
//! .unwrap();
//! let engine = SelectionEngine::from_repository(
//!     Arc::new(InMemoryRepository::new(snapshot)),
//!     EngineConfig::default(),
//! )
//! .unwrap();
//!
//! let page = engine
//!     .select_questions(&SelectionRequest::new("learner-1").with_seed(7))
//!     .unwrap();
//! assert_eq!(page.total_count, 1);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod request;
pub mod selection;

pub use config::{EngineConfig, RecencyWindow, ScoringConfig, SignalWeights, TimeBudgetConfig};
pub use engine::SelectionEngine;
pub use error::{ErrorResponse, SelectionError};
pub use model::{Category, ContentItem, ContentType, KnowledgeProfile, Question, ResponseEvent};
pub use repository::{
    CandidateFilter, CatalogRepository, CatalogSnapshot, InMemoryRepository, ProfileRepository,
    RepositoryError, ResponseRepository,
};
pub use request::{EngineRequest, SelectionRequest, TimeBudgetRequest};
pub use selection::{
    CategorySelection, ScoredCandidate, SelectionPage, SignalScores, TimeBudgetPage,
};

pub use quizpath_algo::BetaSamplerKind;
