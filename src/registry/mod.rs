//! NPI Registry normalization, search planning and lookup
//!
//! Turns loosely typed registry payloads into stable provider records and
//! approximates free-text search by fanning out structured registry queries.

pub mod directory;
pub mod model;
pub mod normalize;
pub mod planner;

pub use directory::{ProviderDirectory, RegistryDirectory};
pub use model::{Address, EnumerationKind, ProviderDetail, ProviderSummary, Taxonomy};
pub use normalize::{NormalizeOptions, PostalCodeFormat};
pub use planner::SearchQuery;
