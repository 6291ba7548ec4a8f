//! Shodan search client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::ShodanError;
use crate::types::{SearchResponse, ShodanHost};

/// Base URL for the Shodan REST API.
const API_BASE: &str = "https://api.shodan.io";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Queries the Shodan search API for candidate hosts.
pub struct ShodanClient {
    http: Client,
    api_key: String,
}

impl ShodanClient {
    /// Creates a client for the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ShodanError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ShodanError::Config("Shodan API key is not set".into()));
        }
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShodanError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, api_key })
    }

    /// Searches Shodan and returns the matching hosts.
    ///
    /// Non-success statuses surface as [`ShodanError::Api`] with the response
    /// body (Shodan reports auth and quota problems as 401/403/429).
    pub async fn search(&self, query: &str) -> Result<Vec<ShodanHost>, ShodanError> {
        let url = format!("{API_BASE}/shodan/host/search");
        debug!(query = %query, "querying shodan");

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("query", query)])
            .send()
            .await
            .map_err(|e| ShodanError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShodanError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| ShodanError::Api {
            status: status.as_u16(),
            message: format!("malformed response: {e}"),
        })?;

        debug!(
            matches = body.matches.len(),
            total = body.total,
            "shodan search complete"
        );
        Ok(body.matches)
    }
}
