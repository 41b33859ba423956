//! HTTP transport layer
//!
//! Provides the external API routing: the `/mcp` listener, the REST provider
//! routes, and metadata endpoints.

pub mod handlers;
