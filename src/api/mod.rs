// ============================================================================
// API MODULE - Puente HTTP entre el ERP y la API de facturación electrónica
// ============================================================================

pub mod company;
pub mod health;
pub mod invoices;
pub mod resolutions;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

fn create_invoices_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/document", post(invoices::build_document))
        .route("/open", post(invoices::open_invoices))
        .route("/validate", post(invoices::validate_invoice))
        .route("/skip", post(invoices::skip_validation))
        .route("/status", post(invoices::refresh_status))
        .route("/logs", post(invoices::sync_from_logs))
}

fn create_resolutions_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(resolutions::list_resolutions).post(resolutions::create_resolution))
        // /pull antes de /:id
        .route("/pull", post(resolutions::pull_resolutions))
        .route(
            "/:id",
            put(resolutions::update_resolution).delete(resolutions::delete_resolution),
        )
}

/// Creates the API router with all REST endpoints
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/v1/invoices", create_invoices_router())
        .nest("/v1/resolutions", create_resolutions_router())
        .route("/v1/company", get(company::get_company))
        .route("/v1/company/environment", put(company::set_environment))
}
