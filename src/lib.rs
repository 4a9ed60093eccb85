use axum::{
    http::{header, Method},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod domains;
pub mod models;
pub mod services;
pub mod state;

use api::create_api_router;
use state::AppState;

fn cors_layer() -> CorsLayer {
    // El ERP llama desde su propio backend; sin credenciales de navegador
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .merge(create_api_router())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
