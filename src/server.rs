use axum::{
    extract::State,
    http::{header, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::analysis::SenseiEngine;
use crate::api::{
    analyze, ApiAnalyzeRequest, ApiAnalyzeResponse, ApiBanner, ApiEnvelope, ApiHealthResponse,
};
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<SenseiEngine>,
}

impl AppState {
    pub fn new(engine: SenseiEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(banner))
        .route("/api/sensei/health", get(health))
        .route("/api/sensei/analyze", post(analyze_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, engine: SenseiEngine) -> Result<(), String> {
    let app = router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    tracing::info!(%addr, "sensei service listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn banner() -> impl IntoResponse {
    Json(ApiBanner::new())
}

async fn health() -> impl IntoResponse {
    Json(ApiHealthResponse::operational())
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalyzeRequest>,
) -> Result<Json<ApiEnvelope<ApiAnalyzeResponse>>, ApiError> {
    match analyze(&state.engine, &request) {
        Ok(response) => Ok(Json(ApiEnvelope::success(response))),
        Err(err) => {
            tracing::warn!(error = %err, "rejected analyze request");
            Err(err)
        }
    }
}
