//! Fan-out planning for free-text provider searches
//!
//! The registry only matches structured fields, so a free-text query is tried
//! against each plausible field combination and the results merged afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::model::EnumerationKind;

pub const REGISTRY_API_VERSION: &str = "2.1";
pub const SEARCH_PAGE_SIZE: u32 = 50;
const WILDCARD: char = '*';

/// Caller-facing search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// `organization_name=<query>*`
    OrganizationName,
    /// `last_name=<token>*`, or `first_name=<first>&last_name=<last>*`
    IndividualName,
}

/// Shapes tried for every search, in execution order.
pub const SEARCH_SHAPES: [QueryShape; 2] =
    [QueryShape::OrganizationName, QueryShape::IndividualName];

impl QueryShape {
    fn build(self, search: &SearchQuery) -> Option<RegistryQuery> {
        match self {
            Self::OrganizationName => Some(
                RegistryQuery::new(self, EnumerationKind::Organization)
                    .with("organization_name", wildcard(&search.query)),
            ),
            Self::IndividualName => {
                let tokens = search.query.split_whitespace().collect::<Vec<_>>();
                let query = RegistryQuery::new(self, EnumerationKind::Individual);
                match tokens.as_slice() {
                    [] => None,
                    [last] => Some(query.with("last_name", wildcard(last))),
                    [first, .., last] => Some(
                        query
                            .with("first_name", (*first).to_string())
                            .with("last_name", wildcard(last)),
                    ),
                }
            }
        }
    }
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrganizationName => f.write_str("organization_name"),
            Self::IndividualName => f.write_str("individual_name"),
        }
    }
}

/// One upstream parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryQuery {
    pub shape: QueryShape,
    pub params: Vec<(&'static str, String)>,
}

impl RegistryQuery {
    fn new(shape: QueryShape, kind: EnumerationKind) -> Self {
        Self {
            shape,
            params: vec![
                ("version", REGISTRY_API_VERSION.to_string()),
                ("enumeration_type", kind.registry_code().to_string()),
            ],
        }
    }

    fn with(mut self, key: &'static str, value: String) -> Self {
        self.params.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}

pub fn plan_queries(search: &SearchQuery) -> Vec<RegistryQuery> {
    SEARCH_SHAPES
        .iter()
        .filter_map(|shape| shape.build(search))
        .map(|query| apply_common_filters(query, search))
        .collect()
}

fn apply_common_filters(mut query: RegistryQuery, search: &SearchQuery) -> RegistryQuery {
    if let Some(state) = search.state.as_deref() {
        query = query.with("state", state.to_string());
    }
    // Matched against the taxonomy description upstream; codes only match by luck.
    if let Some(taxonomy) = search.taxonomy.as_deref() {
        query = query.with("taxonomy_description", taxonomy.to_string());
    }
    query.with("limit", SEARCH_PAGE_SIZE.to_string())
}

fn wildcard(value: &str) -> String {
    format!("{value}{WILDCARD}")
}
