//! Provider directory backed by a remote NPI API service
//!
//! Speaks the same REST contract this server exposes under `/search_providers`
//! and `/provider/{npi}`, so instances can be chained.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::errors::UpstreamError;
use crate::registry::{ProviderDetail, ProviderDirectory, ProviderSummary, SearchQuery};

#[derive(Debug, Deserialize)]
struct SearchProvidersResponse {
    results: Vec<ProviderSummary>,
}

#[derive(Debug, Clone)]
pub struct ForwardingDirectory {
    http: Client,
    base_url: String,
}

impl ForwardingDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ProviderDirectory for ForwardingDirectory {
    /// Single upstream call, so unlike registry fan-out a failure is surfaced.
    async fn search_providers(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<ProviderSummary>, UpstreamError> {
        let url = format!("{}/search_providers", self.base_url);
        let response = self.http.post(&url).json(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let body: SearchProvidersResponse = response.json().await?;
        info!(returned = body.results.len(), "forwarded provider search completed");
        Ok(body.results)
    }

    async fn get_provider(&self, npi: &str) -> Result<Option<ProviderDetail>, UpstreamError> {
        let url = format!("{}/provider/{npi}", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        Ok(Some(response.json::<ProviderDetail>().await?))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::Matcher;
    use serde_json::json;

    use super::ForwardingDirectory;
    use crate::errors::UpstreamError;
    use crate::registry::{EnumerationKind, ProviderDirectory, SearchQuery};

    fn directory_for(server: &mockito::ServerGuard) -> ForwardingDirectory {
        ForwardingDirectory::new(&format!("{}/", server.url()), Duration::from_secs(5))
            .expect("client should build")
    }

    #[tokio::test]
    async fn search_posts_query_without_empty_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search_providers")
            .match_body(Matcher::Json(json!({"query": "John Doe"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "results": [{
                        "npi": "1234567890",
                        "full_name": "John Doe, MD",
                        "enumeration_type": "INDIVIDUAL",
                        "primary_taxonomy": "207RC0000X",
                        "primary_specialty": "Cardiology",
                        "primary_address": {
                            "address_1": "123 Main St",
                            "city": "Anytown",
                            "state": "CA",
                            "postal_code": "90210",
                            "country_code": "US"
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let results = directory_for(&server)
            .search_providers(&SearchQuery {
                query: "John Doe".to_string(),
                ..SearchQuery::default()
            })
            .await
            .expect("search should succeed");

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].full_name, "John Doe, MD");
        assert_eq!(results[0].enumeration_type, EnumerationKind::Individual);
        assert_eq!(results[0].primary_address.line1, "123 Main St");
    }

    #[tokio::test]
    async fn search_surfaces_server_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search_providers")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let error = directory_for(&server)
            .search_providers(&SearchQuery::default())
            .await
            .expect_err("500 must fail");

        assert!(error.to_string().contains("NPI API returned error: 500"));
    }

    #[tokio::test]
    async fn get_provider_maps_404_to_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/provider/0000000000")
            .with_status(404)
            .create_async()
            .await;

        let provider = directory_for(&server)
            .get_provider("0000000000")
            .await
            .expect("404 is not an error");

        assert!(provider.is_none());
    }

    #[tokio::test]
    async fn get_provider_decodes_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/provider/1234567890")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "npi": "1234567890",
                    "full_name": "John Doe, MD",
                    "enumeration_type": "INDIVIDUAL",
                    "addresses": [{
                        "line1": "123 Main St",
                        "city": "Anytown",
                        "state": "CA",
                        "postal_code": "90210",
                        "country": "US"
                    }],
                    "taxonomies": [{
                        "code": "207RC0000X",
                        "description": "Cardiology",
                        "primary": true,
                        "state": "CA",
                        "license": "12345"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = directory_for(&server)
            .get_provider("1234567890")
            .await
            .expect("lookup should succeed")
            .expect("provider exists");

        assert_eq!(provider.taxonomies.len(), 1);
        assert_eq!(provider.taxonomies[0].license.as_deref(), Some("12345"));
    }

    #[tokio::test]
    async fn get_provider_with_malformed_body_is_schema_mismatch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/provider/1234567890")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"npi": 42}"#)
            .create_async()
            .await;

        let error = directory_for(&server)
            .get_provider("1234567890")
            .await
            .expect_err("malformed body must fail");

        assert!(matches!(error, UpstreamError::SchemaMismatch { .. }));
    }
}
