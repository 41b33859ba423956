//! Normalized provider records returned to MCP and REST callers

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnumerationKind {
    Individual,
    Organization,
}

impl EnumerationKind {
    /// Registry code `NPI-1` is an individual; every other code is treated as an organization.
    pub fn from_registry_code(code: Option<&str>) -> Self {
        match code {
            Some("NPI-1") => Self::Individual,
            _ => Self::Organization,
        }
    }

    pub fn registry_code(self) -> &'static str {
        match self {
            Self::Individual => "NPI-1",
            Self::Organization => "NPI-2",
        }
    }
}

impl fmt::Display for EnumerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => f.write_str("INDIVIDUAL"),
            Self::Organization => f.write_str("ORGANIZATION"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    #[serde(alias = "address_1")]
    pub line1: String,
    #[serde(default, alias = "address_2")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(alias = "country_code")]
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            line1: String::new(),
            line2: None,
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: "US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Taxonomy {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderSummary {
    pub npi: String,
    pub full_name: String,
    pub enumeration_type: EnumerationKind,
    #[serde(default)]
    pub primary_taxonomy: Option<String>,
    #[serde(default)]
    pub primary_specialty: Option<String>,
    pub primary_address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderDetail {
    pub npi: String,
    pub full_name: String,
    pub enumeration_type: EnumerationKind,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub taxonomies: Vec<Taxonomy>,
}
