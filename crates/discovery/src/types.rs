//! Shodan API response types.

use serde::Deserialize;

/// Default search query for internet-exposed ADB daemons.
pub const DEFAULT_QUERY: &str = "product:adb";

/// One host match from a Shodan search.
#[derive(Debug, Clone, Deserialize)]
pub struct ShodanHost {
    pub ip_str: String,
    pub port: u16,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

impl ShodanHost {
    /// The `ip:port` address for connecting to this host.
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip_str, self.port)
    }
}

/// Body of `GET /shodan/host/search`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub matches: Vec<ShodanHost>,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_address() {
        let host = ShodanHost {
            ip_str: "10.0.0.1".into(),
            port: 5555,
            org: None,
            product: None,
        };
        assert_eq!(host.address(), "10.0.0.1:5555");
    }

    #[test]
    fn deserialize_search_response() {
        let body = r#"{
            "matches": [
                {"ip_str": "1.2.3.4", "port": 5555, "org": "ExampleNet", "product": "Android Debug Bridge"},
                {"ip_str": "5.6.7.8", "port": 5037}
            ],
            "total": 2
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.total, 2);
        assert_eq!(response.matches.len(), 2);
        assert_eq!(response.matches[0].address(), "1.2.3.4:5555");
        assert_eq!(response.matches[0].org.as_deref(), Some("ExampleNet"));
        assert!(response.matches[1].product.is_none());
    }

    #[test]
    fn deserialize_tolerates_missing_fields() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.matches.is_empty());
        assert_eq!(response.total, 0);
    }
}
