//! Tool definitions and argument handling
//!
//! Exposes provider search and lookup over the MCP protocol.

pub mod tools;
pub mod utils;
