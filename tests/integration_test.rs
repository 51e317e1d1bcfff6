use factorec::services::recommendation::RecommendationService;
use factorec::services::store::ArtifactStore;
use factorec::*;
use std::sync::Arc;

fn fixture_config() -> Config {
    let mut config = Config::default();
    config.artifacts = config.artifacts.with_base_path("tests/fixtures");
    config
}

fn fixture_service() -> Arc<RecommendationService> {
    AppState::new(fixture_config())
        .unwrap()
        .recommendation_service
}

#[test]
fn test_artifacts_load_once_per_store() {
    let store = ArtifactStore::new(Arc::new(fixture_config()));

    let first = store.load_data().unwrap();
    let second = store.load_data().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let first = store.load_model().unwrap();
    let second = store.load_model().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_missing_artifacts_fail_startup() {
    let mut config = Config::default();
    config.artifacts = config.artifacts.with_base_path("tests/fixtures/missing");
    assert!(AppState::new(config).is_err());
}

#[test]
fn test_loaded_shapes() {
    let store = ArtifactStore::new(Arc::new(fixture_config()));
    let data = store.load_data().unwrap();
    let model = store.load_model().unwrap();

    assert_eq!(data.interactions.n_rows, 2);
    assert_eq!(data.interactions.n_cols, 4);
    assert_eq!(data.users.len(), 3);
    assert_eq!(data.items.len(), 4);
    assert_eq!(model.version(), "fixture-1");
    assert_eq!(model.factors(), 2);
}

#[tokio::test]
async fn test_recommendations_for_known_user() {
    let service = fixture_service();

    let request = RecommendationRequest::new("u1", 2).with_scores();
    let response = service.recommend(&request).await.unwrap();

    assert_eq!(response.status, RecommendationStatus::Ok);
    assert_eq!(response.recommendations.len(), 2);

    // u1's taste lives on the first latent axis; itemB aligns with it most,
    // itemD next, and itemA is excluded as already interacted with.
    let ids: Vec<&str> = response
        .recommendations
        .iter()
        .map(|item| item.item_id.as_str())
        .collect();
    assert_eq!(ids, vec!["itemB", "itemD"]);

    let scores: Vec<f32> = response
        .recommendations
        .iter()
        .map(|item| item.score.unwrap())
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn test_interacted_items_never_recommended() {
    let service = fixture_service();

    let response = service
        .recommend(&RecommendationRequest::new("u2", 10))
        .await
        .unwrap();

    assert_eq!(response.status, RecommendationStatus::Ok);
    assert!(response
        .recommendations
        .iter()
        .all(|item| item.item_id != "itemC"));
}

#[tokio::test]
async fn test_result_items_distinct_and_bounded() {
    let service = fixture_service();

    for user in ["u1", "u2"] {
        let response = service
            .recommend(&RecommendationRequest::new(user, 10))
            .await
            .unwrap();
        assert!(response.recommendations.len() <= 10);

        let mut ids: Vec<&str> = response
            .recommendations
            .iter()
            .map(|item| item.item_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), response.recommendations.len());
    }
}

#[tokio::test]
async fn test_unknown_user_signals_not_found() {
    let service = fixture_service();

    let response = service
        .recommend(&RecommendationRequest::new("unknown_user", 5))
        .await
        .unwrap();

    assert_eq!(response.status, RecommendationStatus::UserNotFound);
    assert!(response.recommendations.is_empty());
}

#[tokio::test]
async fn test_user_beyond_matrix_degrades_gracefully() {
    let service = fixture_service();

    // u3 exists in the mapping but the matrix has only two rows
    let response = service
        .recommend(&RecommendationRequest::new("u3", 5))
        .await
        .unwrap();
    assert_eq!(response.status, RecommendationStatus::Unavailable);
    assert!(response.recommendations.is_empty());

    // and the process keeps serving other users afterwards
    let response = service
        .recommend(&RecommendationRequest::new("u1", 2))
        .await
        .unwrap();
    assert_eq!(response.status, RecommendationStatus::Ok);
    assert_eq!(response.recommendations.len(), 2);
}

#[tokio::test]
async fn test_identical_queries_return_identical_results() {
    let service = fixture_service();
    let request = RecommendationRequest::new("u1", 3).with_scores();

    let first = service.recommend(&request).await.unwrap();
    let second = service.recommend(&request).await.unwrap();

    let flatten = |response: &RecommendationResponse| {
        response
            .recommendations
            .iter()
            .map(|item| (item.item_id.clone(), item.score))
            .collect::<Vec<_>>()
    };
    assert_eq!(flatten(&first), flatten(&second));
}

#[tokio::test]
async fn test_known_users_backs_selection_control() {
    let service = fixture_service();
    assert_eq!(service.known_users(), vec!["u1", "u2", "u3"]);
}
