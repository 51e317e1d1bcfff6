pub mod algorithms;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use models::*;

use anyhow::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<services::store::ArtifactStore>,
    pub recommendation_service: Arc<services::recommendation::RecommendationService>,
}

impl AppState {
    /// Loads all artifacts and wires the query service. Fails fast: any
    /// missing or corrupt artifact aborts startup before the server binds.
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let store = Arc::new(services::store::ArtifactStore::new(config.clone()));

        let data = store.load_data()?;
        let model = store.load_model()?;

        let recommendation_service = Arc::new(
            services::recommendation::RecommendationService::new(data, model, config.clone()),
        );

        Ok(Self {
            config,
            store,
            recommendation_service,
        })
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
