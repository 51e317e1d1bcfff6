use factorec::algorithms::AlsModel;
use factorec::services::recommendation::RecommendationService;
use factorec::services::store::InteractionData;
use factorec::*;
use std::collections::HashMap;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    println!("🎯 factorec basic usage");

    // 1. Build a tiny artifact set in memory. In a real deployment these come
    //    from the training pipeline and are loaded by the ArtifactStore.
    let users = IdIndex::new(
        HashMap::from([("alice".to_string(), 0), ("bob".to_string(), 1)]),
        vec!["alice".to_string(), "bob".to_string()],
    );

    let item_ids = ["guitar", "piano", "drums", "violin"];
    let items = IdIndex::new(
        item_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.to_string(), index))
            .collect(),
        item_ids.iter().map(|id| id.to_string()).collect(),
    );

    // alice bought a guitar, bob a set of drums
    let interactions = CsrMatrix {
        n_rows: 2,
        n_cols: 4,
        indptr: vec![0, 1, 2],
        indices: vec![0, 2],
        values: vec![1.0, 1.0],
    };

    let model = AlsModel::from_parameters(ModelParameters {
        version: "demo-1".to_string(),
        factors: 2,
        regularization: 0.1,
        alpha: 40.0,
        user_factors: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        item_factors: vec![
            vec![1.0, 0.1],
            vec![0.9, 0.2],
            vec![0.1, 1.0],
            vec![0.2, 0.8],
        ],
    })?;

    println!("✅ Model, data, and mappings ready");

    // 2. Wire the query service the way AppState does at startup.
    let data = Arc::new(InteractionData {
        interactions,
        users,
        items,
    });
    let service = RecommendationService::new(data, Arc::new(model), Arc::new(Config::default()));

    // 3. Ask for top-N items, with and without scores.
    for user in ["alice", "bob", "carol"] {
        let request = RecommendationRequest::new(user, 3).with_scores();
        let response = service.recommend(&request).await?;

        match response.status {
            RecommendationStatus::Ok => {
                println!("\nTop {} for {}:", response.recommendations.len(), user);
                for (rank, item) in response.recommendations.iter().enumerate() {
                    println!(
                        "  {}. {} (score {:.3})",
                        rank + 1,
                        item.item_id,
                        item.score.unwrap_or_default()
                    );
                }
            }
            RecommendationStatus::UserNotFound => {
                println!("\n⚠️  User {} not found in mappings", user);
            }
            RecommendationStatus::Unavailable => {
                println!("\n⚠️  No recommendations available for {}", user);
            }
        }
    }

    Ok(())
}
