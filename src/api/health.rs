use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::models::Environment;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    /// Entorno DIAN configurado para la compañía.
    pub dian_environment: Environment,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let is_not_test = state.company.read().await.is_not_test;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.app.environment.clone(),
        dian_environment: Environment::from_production_flag(is_not_test),
    })
}
