//! Tool argument validation shared by MCP tools and REST routes

use crate::errors::AppError;
use crate::registry::SearchQuery;

pub const NPI_LENGTH: usize = 10;

pub fn normalize_state(state: Option<String>) -> Result<Option<String>, AppError> {
    let Some(value) = state else {
        return Ok(None);
    };

    let normalized = value.trim();
    if normalized.is_empty() {
        return Ok(None);
    }

    if normalized.len() != 2 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::bad_request(
            "invalid_state",
            "state must be a 2-letter state code (e.g. CA, NY)",
        ));
    }

    Ok(Some(normalized.to_ascii_uppercase()))
}

pub fn normalize_taxonomy(taxonomy: Option<String>) -> Option<String> {
    taxonomy
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn normalize_npi(npi: &str) -> Result<String, AppError> {
    let normalized = npi.trim();
    if normalized.len() != NPI_LENGTH || !normalized.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::bad_request(
            "invalid_npi",
            "npi must be a 10-digit number",
        ));
    }

    Ok(normalized.to_string())
}

pub fn build_search_query(
    query: String,
    state: Option<String>,
    taxonomy: Option<String>,
) -> Result<SearchQuery, AppError> {
    Ok(SearchQuery {
        query: query.trim().to_string(),
        state: normalize_state(state)?,
        taxonomy: normalize_taxonomy(taxonomy),
    })
}
