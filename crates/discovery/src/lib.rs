//! Shodan-backed endpoint discovery.
//!
//! Queries the Shodan search API for hosts exposing an ADB daemon and
//! returns their `ip:port` addresses.

pub mod client;
pub mod types;

// Re-export primary types.
pub use client::ShodanClient;
pub use types::{DEFAULT_QUERY, SearchResponse, ShodanHost};

/// Errors for discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum ShodanError {
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("configuration error: {0}")]
    Config(String),
}
