//! Axum HTTP handlers for the web server
//!
//! Provides the Model Context Protocol endpoint, the plain REST provider
//! routes, and general metadata endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::tools::SearchProvidersParams;
use crate::domain::utils::{build_search_query, normalize_npi};
use crate::errors::AppError;
use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::handle_json_rpc_value;
use crate::registry::{ProviderDetail, ProviderSummary};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub mcp_endpoint: &'static str,
    pub search_endpoint: &'static str,
    pub provider_endpoint: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SearchProvidersResponse {
    pub results: Vec<ProviderSummary>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        mcp_endpoint: "/mcp",
        search_endpoint: "/search_providers",
        provider_endpoint: "/provider/{npi}",
    })
}

pub async fn search_providers(
    State(state): State<AppState>,
    Json(params): Json<SearchProvidersParams>,
) -> Result<Json<SearchProvidersResponse>, AppError> {
    let query = build_search_query(params.query, params.state, params.taxonomy)?;
    let results = state.directory.search_providers(&query).await?;
    Ok(Json(SearchProvidersResponse { results }))
}

pub async fn get_provider(
    State(state): State<AppState>,
    Path(npi): Path<String>,
) -> Result<Json<ProviderDetail>, AppError> {
    let npi = normalize_npi(&npi)?;
    match state.directory.get_provider(&npi).await? {
        Some(provider) => Ok(Json(provider)),
        None => Err(AppError::not_found(
            "provider_not_found",
            format!("Provider with NPI {npi} not found."),
        )),
    }
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            return (
                StatusCode::OK,
                Json(json_rpc_error(None, -32700, "Parse error")),
            )
                .into_response()
        }
    };

    if let Some(batch) = payload.as_array() {
        if batch.is_empty() {
            return (
                StatusCode::OK,
                Json(vec![json_rpc_error(None, -32600, "Invalid Request")]),
            )
                .into_response();
        }

        let mut responses = Vec::new();
        for item in batch {
            if let Some(response) = handle_json_rpc_value(&state, item.clone()).await {
                responses.push(response);
            }
        }

        if responses.is_empty() {
            return StatusCode::NO_CONTENT.into_response();
        }

        return (StatusCode::OK, Json(Value::Array(responses))).into_response();
    }

    match handle_json_rpc_value(&state, payload).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
