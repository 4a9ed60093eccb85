use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{CompanyConfig, Result};
use std::sync::Arc;

use crate::services::{set_production, DianApiClient, EnvironmentChange};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnvironmentRequest {
    pub is_not_test: bool,
}

/// Configuración de la compañía (sin el token de la API).
pub async fn get_company(State(state): State<Arc<AppState>>) -> Json<CompanyConfig> {
    Json(state.company().await)
}

/// Cambia el entorno DIAN (producción / habilitación) de la compañía.
pub async fn set_environment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnvironmentRequest>,
) -> Result<Json<EnvironmentChange>> {
    // held across the PUT/GET round trip
    let mut company = state.company.write().await;
    let client = DianApiClient::with_http_client(state.http_client.clone(), &company)?;
    let change = set_production(&client, &mut company, request.is_not_test).await;
    Ok(Json(change))
}
