use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    clipboard::COPIED_RESET_AFTER,
    errors::AppError,
    gemini::AdGenerator,
    models::{AdPlatform, AdTone, GenerationConfig},
    orchestrator::{Orchestrator, Snapshot, SubmitError},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<HashMap<Uuid, Arc<Orchestrator>>>>,
    pub generator: Arc<dyn AdGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn AdGenerator>) -> Self {
        Self { store: Arc::default(), generator }
    }

    fn session(&self, id: Uuid) -> Result<Arc<Orchestrator>, AppError> {
        self.store.read().get(&id).cloned().ok_or(AppError::NotFound("session"))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/options", get(list_options))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
        .route("/api/sessions/:id/generate", post(generate_ads))
        .route("/api/sessions/:id/ads", delete(clear_ads))
        .route("/api/sessions/:id/ads/:ad_id/copy", post(copy_ad))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
    }))
}

/// Option sets for the form's selects.
pub async fn list_options() -> Json<Value> {
    Json(json!({
        "platforms": AdPlatform::ALL,
        "tones": AdTone::ALL,
        "defaults": { "platform": AdPlatform::default(), "tone": AdTone::default() },
    }))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<Snapshot>) {
    let id = Uuid::new_v4();
    let orchestrator = Arc::new(Orchestrator::new(id, state.generator.clone()));
    let snapshot = orchestrator.snapshot();
    state.store.write().insert(id, orchestrator);
    tracing::info!("🎯 Created session {}", id);
    (StatusCode::CREATED, Json(snapshot))
}

pub async fn get_session(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(state.session(id)?.snapshot()))
}

/// Drops the session and its results. The browser calls this on unload or reload.
pub async fn end_session(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .store
        .write()
        .remove(&id)
        .ok_or(AppError::NotFound("session"))?;
    tracing::info!("👋 Ended session {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn generate_ads(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    body: Result<Json<GenerationConfig>, JsonRejection>,
) -> Result<Json<Snapshot>, AppError> {
    let orchestrator = state.session(id)?;
    let Json(config) = body?;
    match orchestrator.submit(config).await {
        Ok(_) => Ok(Json(orchestrator.snapshot())),
        Err(SubmitError::Invalid(fields)) => Err(AppError::MissingFields(fields)),
        Err(SubmitError::Busy) => Err(AppError::Conflict("a generation request is already in progress")),
        Err(SubmitError::Failed) => Err(AppError::GenerationFailed(Box::new(orchestrator.snapshot()))),
    }
}

pub async fn clear_ads(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    let orchestrator = state.session(id)?;
    orchestrator
        .clear()
        .map_err(|_| AppError::Conflict("there are no results to clear"))?;
    Ok(Json(orchestrator.snapshot()))
}

pub async fn copy_ad(
    Path((id, ad_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let text = state.session(id)?.copy(ad_id).ok_or(AppError::NotFound("ad"))?;
    Ok(Json(json!({
        "text": text,
        "copiedForMs": COPIED_RESET_AFTER.as_millis() as u64,
    })))
}
