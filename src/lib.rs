use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod forwarding_client;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod npi_client;
pub mod registry;

use registry::ProviderDirectory;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn ProviderDirectory>,
}

impl AppState {
    pub fn new(directory: Arc<dyn ProviderDirectory>) -> Self {
        Self { directory }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .route("/search_providers", post(http::handlers::search_providers))
        .route("/provider/{npi}", get(http::handlers::get_provider))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
