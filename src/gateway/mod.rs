//! Axum-based HTTP gateway for the evaluation pipeline.
//!
//! One evaluation route plus a health probe, behind a CORS origin
//! allow-list, a request body limit sized for inline base64 images, and a
//! request timeout that outlives the model call budget.

mod handlers;

use handlers::{handle_evaluate, handle_health};

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::{Config, GatewayConfig};
use crate::eval::{Evaluator, Scoring};
use crate::providers::{GeminiModel, VisionModel};
use crate::store::{SqliteHitStore, TierHitStore};

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<Evaluator>,
}

/// Evaluation request body
#[derive(serde::Deserialize)]
pub struct EvaluateBody {
    pub image: Option<String>,
}

/// Run the HTTP gateway.
pub async fn run_gateway(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    run_gateway_with_listener(listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener (lets tests bind port 0).
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let display_addr = listener.local_addr()?;

    let scoring = Scoring::reference()?;
    let tier_keys: Vec<&str> = scoring.tiers.keys().collect();

    let model: Arc<dyn VisionModel> = Arc::new(GeminiModel::new(config.api_key.as_deref()));
    let db_path = config.store.resolve_db_path(&config.workspace_dir);
    let store: Arc<dyn TierHitStore> = Arc::new(SqliteHitStore::open(&db_path, &tier_keys).await?);

    let evaluator = Arc::new(Evaluator::new(
        model,
        store,
        scoring,
        config.model.clone(),
        config.temperature,
    ));

    let router = app(AppState { evaluator }, &config.gateway)?;

    tracing::info!(%display_addr, model = %config.model, "photo evaluation gateway listening");
    tracing::info!("  POST /evaluatePhoto");
    tracing::info!("  GET  /health");

    axum::serve(listener, router).await?;

    Ok(())
}

/// Build the router with its layer stack. Shared by `run_gateway` and the
/// HTTP integration tests.
pub fn app(state: AppState, gateway: &GatewayConfig) -> Result<Router> {
    let cors = cors_layer(&gateway.allowed_origins)?;

    Ok(Router::new()
        .route("/health", get(handle_health))
        .route("/evaluatePhoto", post(handle_evaluate))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(gateway.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            gateway.request_timeout_secs,
        )))
        .layer(cors))
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid allowed origin `{origin}`"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}
