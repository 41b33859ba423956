//! Provider search and lookup over a raw registry collaborator

use std::collections::HashSet;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::errors::UpstreamError;
use crate::npi_client::RegistryApi;
use crate::registry::model::{ProviderDetail, ProviderSummary};
use crate::registry::normalize::{detail, summarize, NormalizeOptions};
use crate::registry::planner::{plan_queries, SearchQuery};

/// The two operations exposed to MCP tools and REST routes.
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn search_providers(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<ProviderSummary>, UpstreamError>;

    /// `Ok(None)` when no provider has this NPI.
    async fn get_provider(&self, npi: &str) -> Result<Option<ProviderDetail>, UpstreamError>;
}

pub struct RegistryDirectory<A> {
    api: A,
    options: NormalizeOptions,
}

impl<A: RegistryApi> RegistryDirectory<A> {
    pub fn new(api: A, options: NormalizeOptions) -> Self {
        Self { api, options }
    }
}

#[async_trait]
impl<A: RegistryApi> ProviderDirectory for RegistryDirectory<A> {
    /// Never fails: a query that errors upstream is logged and contributes nothing.
    async fn search_providers(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<ProviderSummary>, UpstreamError> {
        let plan = plan_queries(query);
        let outcomes = join_all(plan.iter().map(|planned| self.api.raw_search(planned))).await;

        let mut seen = HashSet::new();
        let mut providers = Vec::new();
        for (planned, outcome) in plan.iter().zip(outcomes) {
            let records = match outcome {
                Ok(records) => records,
                Err(err) => {
                    warn!(shape = %planned.shape, error = %err, "registry search query failed");
                    continue;
                }
            };

            for record in &records {
                let summary = summarize(record, &self.options);
                if summary.npi.is_empty() {
                    debug!(shape = %planned.shape, "skipping registry record without an npi");
                    continue;
                }
                if seen.insert(summary.npi.clone()) {
                    providers.push(summary);
                }
            }
        }

        info!(
            queries = plan.len(),
            returned = providers.len(),
            "provider search completed"
        );
        Ok(providers)
    }

    async fn get_provider(&self, npi: &str) -> Result<Option<ProviderDetail>, UpstreamError> {
        let record = self.api.raw_get_by_number(npi).await?;
        Ok(record.map(|record| detail(&record, &self.options)))
    }
}
