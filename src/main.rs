use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use factorec::utils::validation::validate_recommendation_request;
use factorec::{init_tracing, AppState, Config, RecommendationStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct RecommendationQuery {
    n: Option<usize>,
    include_scores: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    message: String,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
        }
    }

    fn with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message,
        }
    }
}

async fn health_check() -> Json<ApiResponse<HashMap<String, String>>> {
    let mut status = HashMap::new();
    status.insert("status".to_string(), "healthy".to_string());
    status.insert("service".to_string(), "factorec".to_string());
    status.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());

    Json(ApiResponse::success(status))
}

/// Raw user IDs for the front-end's selection control.
async fn list_users(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::success(
        state.recommendation_service.known_users(),
    ))
}

async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<ApiResponse<factorec::RecommendationResponse>>, StatusCode> {
    let request = factorec::RecommendationRequest {
        user_id,
        num_recommendations: params.n.unwrap_or(state.config.recommendation.default_n),
        include_scores: params.include_scores.unwrap_or(false),
    };

    if let Err(e) = validate_recommendation_request(&request, state.config.recommendation.max_n) {
        tracing::warn!("Rejected recommendation request: {}", e);
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.recommendation_service.recommend(&request).await {
        Ok(response) => {
            let message = match response.status {
                RecommendationStatus::Ok => "Success".to_string(),
                RecommendationStatus::UserNotFound => {
                    format!("User {} not found in mappings", response.user_id)
                }
                RecommendationStatus::Unavailable => "No recommendations available".to_string(),
            };
            Ok(Json(ApiResponse::with_message(response, message)))
        }
        Err(e) => {
            tracing::error!("Failed to get recommendations: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", get(list_users))
        .route("/recommendations/:user_id", get(get_recommendations))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    std::env::set_var("RUST_LOG", &args.log_level);
    init_tracing();

    let config = if std::path::Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using default configuration");
        Config::default()
    };

    info!("Starting factorec server with config: {:?}", config.server);

    let state = AppState::new(config.clone())?;
    info!("Model, data, and mappings loaded successfully");

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.socket_addr()).await?;
    info!("Server listening on {}", config.server.socket_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
