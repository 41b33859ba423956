use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Logs one summary per request, keyed by route template so NPIs group together.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();

    info!(
        method = %method,
        route = %route,
        path = %path,
        status = status.as_u16(),
        duration_ms = elapsed_ms,
        "request summary"
    );

    if let Some(failure) = failure_kind(status) {
        warn!(
            method = %method,
            route = %route,
            path = %path,
            status = status.as_u16(),
            failure,
            "request failed"
        );
    }

    response
}

/// 502 is reserved for registry failures; every other 5xx is ours.
fn failure_kind(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::BAD_GATEWAY => Some("upstream"),
        status if status.is_server_error() => Some("server"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::failure_kind;

    #[test]
    fn registry_failures_are_told_apart_from_server_errors() {
        assert_eq!(failure_kind(StatusCode::BAD_GATEWAY), Some("upstream"));
        assert_eq!(failure_kind(StatusCode::INTERNAL_SERVER_ERROR), Some("server"));
        assert_eq!(failure_kind(StatusCode::NOT_FOUND), None);
        assert_eq!(failure_kind(StatusCode::OK), None);
    }
}
