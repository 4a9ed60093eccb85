//! Resolution Sync: local resolution writes mirrored to the API.
//!
//! With `api_sync` on, the remote call goes first and the local store is only
//! touched when it succeeds.

use chrono::{Datelike, NaiveDate};
use shared::{AppError, CompanyConfig, Result};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::store::ResolutionStore;
use crate::models::{RemoteResolution, Resolution, ResolutionInput, ResolutionPatch, ResolutionPayload};
use crate::services::DianApiClient;

/// Sent in place of missing or pre-2000 dates.
pub const SENTINEL_DATE: &str = "2000-01-01";

fn sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

pub fn outbound_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) if date.year() >= 2000 => date.format("%Y-%m-%d").to_string(),
        _ => SENTINEL_DATE.to_string(),
    }
}

/// Remote dates may carry a time part; pre-2000 dates become the sentinel.
pub fn inbound_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    let date = NaiveDate::parse_from_str(value.get(..10).unwrap_or(value), "%Y-%m-%d").ok()?;
    if date.year() < 2000 {
        Some(sentinel())
    } else {
        Some(date)
    }
}

/// Create payload: absent text fields are left out.
pub fn create_payload(resolution: &Resolution) -> ResolutionPayload {
    ResolutionPayload {
        type_document_id: resolution.type_document_id,
        prefix: resolution.prefix.clone().filter(|v| !v.is_empty()),
        resolution: resolution.resolution.clone().filter(|v| !v.is_empty()),
        resolution_date: outbound_date(resolution.resolution_date),
        technical_key: resolution.technical_key.clone().filter(|v| !v.is_empty()),
        from: resolution.from,
        to: resolution.to,
        date_from: outbound_date(resolution.date_from),
        date_to: outbound_date(resolution.date_to),
    }
}

/// Update payload: every field is sent, absent text as "".
pub fn update_payload(resolution: &Resolution) -> ResolutionPayload {
    ResolutionPayload {
        prefix: Some(resolution.prefix.clone().unwrap_or_default()),
        resolution: Some(resolution.resolution.clone().unwrap_or_default()),
        technical_key: Some(resolution.technical_key.clone().unwrap_or_default()),
        ..create_payload(resolution)
    }
}

fn from_remote(id: i64, remote: RemoteResolution) -> Resolution {
    Resolution {
        id,
        api_sync: true,
        type_document_id: remote.type_document_id,
        prefix: remote.prefix,
        resolution: remote.resolution,
        resolution_date: inbound_date(remote.resolution_date.as_deref()),
        technical_key: remote.technical_key,
        from: remote.from,
        to: remote.to,
        date_from: inbound_date(remote.date_from.as_deref()),
        date_to: inbound_date(remote.date_to.as_deref()),
        resolution_id: Some(remote.id),
        resolution_number: remote.number,
        next_consecutive: remote.next_consecutive,
        message: None,
    }
}

fn invalid(errors: validator::ValidationErrors) -> AppError {
    AppError::validation(format!("Resolución inválida: {}", errors))
}

pub struct ResolutionSync {
    store: Arc<dyn ResolutionStore>,
    company: CompanyConfig,
    http: reqwest::Client,
}

impl ResolutionSync {
    pub fn new(store: Arc<dyn ResolutionStore>, company: CompanyConfig, http: reqwest::Client) -> Self {
        Self { store, company, http }
    }

    fn api(&self) -> Result<DianApiClient> {
        DianApiClient::with_http_client(self.http.clone(), &self.company)
    }

    pub fn list(&self) -> Vec<Resolution> {
        self.store.list()
    }

    pub async fn create(&self, input: ResolutionInput) -> Result<Resolution> {
        input.validate().map_err(invalid)?;

        let mut resolution = Resolution::from_input(0, input);
        if resolution.api_sync {
            let (remote, message) = self
                .api()?
                .create_resolution(&create_payload(&resolution))
                .await
                .map_err(|e| {
                    warn!("No se pudo guardar el registro en la API: {}", e);
                    e
                })?;
            resolution.resolution_id = Some(remote.id);
            resolution.resolution_number = remote.number;
            resolution.next_consecutive = remote.next_consecutive;
            resolution.message = message;
        }

        resolution.id = self.store.next_id();
        self.store.upsert(resolution.clone());
        info!("Resolución {} creada", resolution.display_name());
        Ok(resolution)
    }

    pub async fn update(&self, id: i64, patch: ResolutionPatch) -> Result<Resolution> {
        patch.validate().map_err(invalid)?;

        let current = self
            .store
            .get(id)
            .ok_or_else(|| AppError::not_found(format!("Resolución {}", id)))?;
        let mut updated = current.clone();
        updated.apply(&patch);
        if updated.from > updated.to {
            return Err(AppError::validation("El rango de la resolución es inválido: 'Desde' es mayor que 'Hasta'"));
        }

        if current.api_sync {
            let resolution_id = current
                .resolution_id
                .ok_or_else(|| AppError::validation("La resolución no tiene un ID de la API"))?;
            let (remote, message) = self
                .api()?
                .update_resolution(resolution_id, &update_payload(&updated))
                .await
                .map_err(|e| {
                    warn!("No se pudo actualizar el registro en la API: {}", e);
                    e
                })?;
            updated.resolution_number = remote.number;
            updated.next_consecutive = remote.next_consecutive;
            updated.message = message;
        }

        self.store.upsert(updated.clone());
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<Resolution> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| AppError::not_found(format!("Resolución {}", id)))?;

        if current.api_sync {
            let resolution_id = current
                .resolution_id
                .ok_or_else(|| AppError::validation("La resolución no tiene un ID de la API"))?;
            self.api()?.delete_resolution(resolution_id).await.map_err(|e| {
                warn!("No se pudo eliminar el registro en la API: {}", e);
                e
            })?;
        }

        self.store.remove(id);
        Ok(current)
    }

    /// Imports remote resolutions not yet mirrored locally. Returns the new ones.
    pub async fn pull_remote(&self) -> Result<Vec<Resolution>> {
        let remote = self.api()?.list_resolutions().await?;

        let mut imported = Vec::new();
        for remote in remote {
            if self.store.find_by_remote_id(remote.id).is_some() {
                continue;
            }
            let resolution = from_remote(self.store.next_id(), remote);
            if self.store.insert_if_absent_by_remote_id(resolution.clone()) {
                imported.push(resolution);
            }
        }

        info!("🔄 {} resoluciones importadas desde la API", imported.len());
        Ok(imported)
    }
}
