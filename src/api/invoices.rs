// ============================================================================
// INVOICES API - Envío y consulta de documentos electrónicos
// ============================================================================

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::Result;
use std::sync::Arc;
use tracing::info;

use crate::domains::edi::{BatchOutcome, DocumentRequest, Processed};
use crate::models::Invoice;
use crate::state::AppState;

// ============================================================================
// Request/Response Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenInvoicesRequest {
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateInvoiceRequest {
    pub invoice: Invoice,
    /// Envío al set de pruebas de habilitación.
    #[serde(default)]
    pub test: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchFailureBody {
    pub invoice_id: i64,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct OpenInvoicesResponse {
    pub completed: Vec<Processed>,
    pub failed: Option<BatchFailureBody>,
}

impl IntoResponse for BatchOutcome {
    fn into_response(self) -> Response {
        let status = self
            .failed
            .as_ref()
            .map(|failure| failure.error.status_code())
            .unwrap_or(StatusCode::OK);
        let body = OpenInvoicesResponse {
            completed: self.completed,
            failed: self.failed.map(|failure| BatchFailureBody {
                invoice_id: failure.invoice_id,
                code: failure.error.error_code(),
                message: failure.error.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Documento que se enviaría a la API, sin enviarlo.
pub async fn build_document(
    State(state): State<Arc<AppState>>,
    Json(invoice): Json<Invoice>,
) -> Result<Json<DocumentRequest>> {
    let document = state.workflow().await.document(&invoice)?;
    Ok(Json(document))
}

pub async fn open_invoices(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OpenInvoicesRequest>,
) -> BatchOutcome {
    info!("📨 Publicando {} facturas", request.invoices.len());
    state.workflow().await.open_batch(&request.invoices).await
}

pub async fn validate_invoice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateInvoiceRequest>,
) -> Result<Json<Processed>> {
    let workflow = state.workflow().await;
    let processed = if request.test {
        workflow.validate_dian_test(&request.invoice).await?
    } else {
        workflow.validate_dian(&request.invoice).await?
    };
    Ok(Json(processed))
}

pub async fn skip_validation(State(state): State<Arc<AppState>>, Json(invoice): Json<Invoice>) -> Json<Processed> {
    Json(state.workflow().await.skip(&invoice))
}

pub async fn refresh_status(
    State(state): State<Arc<AppState>>,
    Json(invoice): Json<Invoice>,
) -> Result<Json<Processed>> {
    let processed = state.workflow().await.refresh_status(&invoice).await?;
    Ok(Json(processed))
}

pub async fn sync_from_logs(State(state): State<Arc<AppState>>, Json(invoice): Json<Invoice>) -> Json<Processed> {
    Json(state.workflow().await.sync_from_logs(&invoice).await)
}
