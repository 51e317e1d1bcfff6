use crate::algorithms::Recommender;
use crate::config::Config;
use crate::models::*;
use crate::services::store::InteractionData;
use anyhow::{anyhow, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// The query operation: resolve a raw user ID, retrieve top-N item indices
/// from the model against that user's interaction row, and map the indices
/// back to raw item IDs. Holds only read-only state loaded at startup and
/// never mutates it.
pub struct RecommendationService {
    data: Arc<InteractionData>,
    model: Arc<dyn Recommender>,
    config: Arc<Config>,
}

impl RecommendationService {
    pub fn new(data: Arc<InteractionData>, model: Arc<dyn Recommender>, config: Arc<Config>) -> Self {
        Self {
            data,
            model,
            config,
        }
    }

    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        let n = request
            .num_recommendations
            .min(self.config.recommendation.max_n);

        // Step 1: resolve the raw ID. Unknown users are a signaled condition,
        // not an error; the process keeps serving.
        let user_index = match self.data.users.index_of(&request.user_id) {
            Some(index) => index,
            None => {
                warn!("User {} not found in mappings", request.user_id);
                return Ok(RecommendationResponse::empty(
                    &request.user_id,
                    RecommendationStatus::UserNotFound,
                ));
            }
        };

        // Step 2: fetch the interaction row and run top-N retrieval,
        // recomputing the user's latent vector from the row so interactions
        // newer than the trained factors still count. An index past either
        // bound means the artifacts disagree with each other for this user;
        // that query degrades to an empty result instead of failing.
        let row = match self.data.interactions.row(user_index) {
            Some(row) => row,
            None => {
                warn!(
                    "User {} resolves to row {} beyond the {}-row interaction matrix",
                    request.user_id, user_index, self.data.interactions.n_rows
                );
                return Ok(RecommendationResponse::empty(
                    &request.user_id,
                    RecommendationStatus::Unavailable,
                ));
            }
        };

        let ranked = match self.model.recommend(user_index, row, n, true).await {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!("No recommendations for user {}: {}", request.user_id, e);
                return Ok(RecommendationResponse::empty(
                    &request.user_id,
                    RecommendationStatus::Unavailable,
                ));
            }
        };

        // Step 3: map internal item indices back to raw IDs. An index the
        // item mapping cannot translate breaks the coverage invariant and is
        // allowed to propagate.
        let mut recommendations = Vec::with_capacity(ranked.len());
        for (item_index, score) in ranked {
            let item_id = self
                .data
                .items
                .id_of(item_index)
                .ok_or_else(|| anyhow!("item index {} missing from item mapping", item_index))?;

            recommendations.push(RecommendationItem {
                item_id: item_id.to_string(),
                score: request.include_scores.then_some(score),
            });
        }

        Ok(RecommendationResponse {
            user_id: request.user_id.clone(),
            status: RecommendationStatus::Ok,
            recommendations,
            generated_at: Utc::now(),
        })
    }

    /// Raw user IDs backing the front-end's selection control, in internal
    /// index order.
    pub fn known_users(&self) -> Vec<String> {
        self.data.users.ids().map(str::to_string).collect()
    }
}
