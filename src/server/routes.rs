//! Axum route handlers.
//!
//! # Routes
//!
//! - `GET  /health`  - `{"status": "ok", "version": .., "service": "quranjar", ..}`
//! - `POST /predict` - `{"text": ..}` → `PredictionResponse`

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::prediction::{PredictionResponse, PredictionService, EMPTY_INPUT_MESSAGE};
use crate::JarError;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub prediction: Arc<PredictionService>,
}

impl AppState {
    pub fn new(prediction: Arc<PredictionService>) -> Self {
        Self { prediction }
    }
}

/// Request body for `POST /predict`. A missing or null `text` is treated as empty.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Error body: `{"error": ".."}` with a status derived from [`JarError`].
#[derive(Debug)]
pub struct ApiError(JarError);

impl From<JarError> for ApiError {
    fn from(err: JarError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            JarError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            JarError::ModelUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string())
            }
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        if status.is_server_error() {
            tracing::error!("predict failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    let app = app_router(state);

    tracing::info!("quranjar server starting on {}", bind);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health  - liveness probe");
    tracing::info!("  POST /predict - emotion + verse");

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}

/// GET /health - liveness probe.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let models: Vec<Value> = state
        .prediction
        .models()
        .iter()
        .map(|m| serde_json::json!({ "name": m.name(), "available": m.is_available() }))
        .collect();

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "quranjar",
        "corpus_entries": state.prediction.selector().index().len(),
        "models": models,
    }))
}

/// POST /predict - classify text and cite a verse.
///
/// Blank text is rejected with 400 before any model runs; an unavailable
/// model yields 503.
async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let text = request.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(JarError::InvalidInput(EMPTY_INPUT_MESSAGE.to_string()).into());
    }

    let response = state.prediction.predict(&text).await?;
    tracing::info!(
        "Predicted {} for {} chars of input",
        response.predicted_emotion,
        text.chars().count()
    );
    Ok(Json(response))
}
