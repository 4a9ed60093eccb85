// ============================================================================
// RESOLUTIONS API - Resoluciones de numeración sincronizadas con la API
// ============================================================================

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::Result;
use std::sync::Arc;
use tracing::info;

use crate::models::{Resolution, ResolutionInput, ResolutionPatch};
use crate::state::AppState;

pub async fn list_resolutions(State(state): State<Arc<AppState>>) -> Json<Vec<Resolution>> {
    Json(state.resolution_sync().await.list())
}

pub async fn create_resolution(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ResolutionInput>,
) -> Result<(StatusCode, Json<Resolution>)> {
    let resolution = state.resolution_sync().await.create(input).await?;
    Ok((StatusCode::CREATED, Json(resolution)))
}

pub async fn update_resolution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<ResolutionPatch>,
) -> Result<Json<Resolution>> {
    let resolution = state.resolution_sync().await.update(id, patch).await?;
    Ok(Json(resolution))
}

pub async fn delete_resolution(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Json<Resolution>> {
    let resolution = state.resolution_sync().await.delete(id).await?;
    info!("🗑️ Resolución {} eliminada", resolution.display_name());
    Ok(Json(resolution))
}

/// Importa las resoluciones remotas que aún no existen localmente.
pub async fn pull_resolutions(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Resolution>>> {
    let imported = state.resolution_sync().await.pull_remote().await?;
    Ok(Json(imported))
}
