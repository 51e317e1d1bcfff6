use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod mappings;
pub mod matrix;

pub use mappings::IdIndex;
pub use matrix::{CsrMatrix, SparseRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: String,
    pub num_recommendations: usize,
    pub include_scores: bool,
}

/// Outcome of resolving and serving a single query. `UserNotFound` and
/// `Unavailable` are recoverable conditions the front-end renders as messages;
/// the process keeps serving after either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Ok,
    UserNotFound,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub user_id: String,
    pub status: RecommendationStatus,
    pub recommendations: Vec<RecommendationItem>,
    pub generated_at: DateTime<Utc>,
}

/// Serialized form of the trained factorization model, as written by the
/// offline training pipeline. Row i of `user_factors` is the latent vector of
/// internal user index i; `item_factors` likewise for items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    pub version: String,
    pub factors: usize,
    pub regularization: f32,
    pub alpha: f32,
    pub user_factors: Vec<Vec<f32>>,
    pub item_factors: Vec<Vec<f32>>,
}

impl RecommendationRequest {
    pub fn new(user_id: impl Into<String>, num_recommendations: usize) -> Self {
        Self {
            user_id: user_id.into(),
            num_recommendations,
            include_scores: false,
        }
    }

    pub fn with_scores(mut self) -> Self {
        self.include_scores = true;
        self
    }
}

impl RecommendationResponse {
    pub fn empty(user_id: impl Into<String>, status: RecommendationStatus) -> Self {
        Self {
            user_id: user_id.into(),
            status,
            recommendations: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}
