use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::errors::UpstreamError;
use crate::registry::planner::{RegistryQuery, REGISTRY_API_VERSION};

pub const DEFAULT_REGISTRY_URL: &str = "https://npiregistry.cms.hhs.gov/api/";

/// Raw access to the NPI Registry. Records are returned untouched.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn raw_search(&self, query: &RegistryQuery) -> Result<Vec<Value>, UpstreamError>;

    async fn raw_get_by_number(&self, npi: &str) -> Result<Option<Value>, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    http: Client,
    base_url: String,
}

impl HttpRegistryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn send(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<reqwest::Response, UpstreamError> {
        let response = self.http.get(&self.base_url).query(params).send().await?;
        Ok(response)
    }
}

#[async_trait]
impl RegistryApi for HttpRegistryClient {
    async fn raw_search(&self, query: &RegistryQuery) -> Result<Vec<Value>, UpstreamError> {
        debug!(shape = %query.shape, "querying npi registry");

        let response = self.send(&query.params).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let payload: Value = response.json().await?;
        extract_results(payload)
    }

    async fn raw_get_by_number(&self, npi: &str) -> Result<Option<Value>, UpstreamError> {
        debug!(npi = %npi, "fetching npi registry record");

        let params = [
            ("version", REGISTRY_API_VERSION.to_string()),
            ("number", npi.to_string()),
        ];
        let response = self.send(&params).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let payload: Value = response.json().await?;
        match extract_results(payload)?.into_iter().next() {
            None => Ok(None),
            Some(record @ Value::Object(_)) => Ok(Some(record)),
            Some(_) => Err(UpstreamError::SchemaMismatch {
                reason: "result is not an object".to_string(),
            }),
        }
    }
}

/// Pulls `results` out of a registry payload.
///
/// The registry answers invalid queries with 200 and an `Errors` list.
fn extract_results(payload: Value) -> Result<Vec<Value>, UpstreamError> {
    let Value::Object(mut body) = payload else {
        return Err(UpstreamError::SchemaMismatch {
            reason: "expected a JSON object".to_string(),
        });
    };

    if let Some(errors) = body.get("Errors") {
        return Err(UpstreamError::Rejected {
            message: describe_errors(errors),
        });
    }

    match body.remove("results") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(results)) => Ok(results),
        Some(_) => Err(UpstreamError::SchemaMismatch {
            reason: "results is not an array".to_string(),
        }),
    }
}

fn describe_errors(errors: &Value) -> String {
    let descriptions = errors
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("description").and_then(Value::as_str))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if descriptions.is_empty() {
        errors.to_string()
    } else {
        descriptions.join("; ")
    }
}
