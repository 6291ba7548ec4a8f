//! Bridges from the concrete discovery/adb crates to the fleet traits.
//!
//! The fleet engine only knows [`DiscoveryProvider`] and [`EndpointClient`];
//! these adapters implement them over [`ShodanClient`] and [`AdbClient`] and
//! map the crate-local errors onto the engine's taxonomy.

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use adbherd_adb::{AdbClient, AdbError};
use adbherd_discovery::{ShodanClient, ShodanError};
use adbherd_fleet::{ClientError, DiscoveryError, DiscoveryProvider, EndpointClient};

/// Shodan-backed discovery provider.
///
/// Built without a usable API key it still constructs; every search then
/// degrades to a configuration error, which the engine surfaces as an event.
pub struct ShodanDiscovery {
    client: Option<ShodanClient>,
}

impl ShodanDiscovery {
    pub fn new(api_key: &str) -> Self {
        let client = match ShodanClient::new(api_key) {
            Ok(client) => Some(client),
            Err(err) => {
                warn!(error = %err, "discovery unavailable");
                None
            }
        };
        Self { client }
    }
}

impl DiscoveryProvider for ShodanDiscovery {
    fn search(
        &self,
        query: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DiscoveryError>> + Send + '_>> {
        let query = query.to_string();
        Box::pin(async move {
            let Some(client) = &self.client else {
                return Err(DiscoveryError::Config("Shodan API key is not set".into()));
            };
            let hosts = client.search(&query).await.map_err(map_shodan)?;
            Ok(hosts.into_iter().map(|h| h.address()).collect())
        })
    }
}

fn map_shodan(err: ShodanError) -> DiscoveryError {
    match err {
        ShodanError::Api { .. } => DiscoveryError::Api(err.to_string()),
        ShodanError::Network(message) => DiscoveryError::Network(message),
        ShodanError::Config(message) => DiscoveryError::Config(message),
    }
}

/// adb-backed endpoint client.
pub struct AdbEndpoint {
    client: AdbClient,
}

impl AdbEndpoint {
    pub fn new(client: AdbClient) -> Self {
        Self { client }
    }
}

impl EndpointClient for AdbEndpoint {
    fn connect(
        &self,
        addr: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), ClientError>> + Send + '_>> {
        let addr = addr.to_string();
        Box::pin(async move { self.client.connect(&addr).await.map_err(map_adb) })
    }

    fn run(
        &self,
        addr: &str,
        command: &str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ClientError>> + Send + '_>> {
        let addr = addr.to_string();
        let command = command.to_string();
        Box::pin(async move { self.client.run(&addr, &command).await.map_err(map_adb) })
    }
}

fn map_adb(err: AdbError) -> ClientError {
    match err {
        AdbError::Refused(message) if message.is_empty() => {
            ClientError::Connection("refused".into())
        }
        AdbError::Refused(message) => ClientError::Connection(message),
        AdbError::DeviceState { state } => ClientError::Connection(format!("device is {state}")),
        AdbError::Timeout => ClientError::Timeout,
        AdbError::Io(err) => ClientError::Protocol(err.to_string()),
        AdbError::CommandFailed(message) => ClientError::Protocol(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shodan_errors_keep_their_category() {
        assert!(matches!(
            map_shodan(ShodanError::Network("reset".into())),
            DiscoveryError::Network(_)
        ));
        assert!(matches!(
            map_shodan(ShodanError::Api {
                status: 401,
                message: "unauthorized".into()
            }),
            DiscoveryError::Api(_)
        ));
        assert!(matches!(
            map_shodan(ShodanError::Config("no key".into())),
            DiscoveryError::Config(_)
        ));
    }

    #[test]
    fn adb_refusal_is_connection_error() {
        assert!(matches!(
            map_adb(AdbError::Refused("failed to connect".into())),
            ClientError::Connection(_)
        ));
        // An empty refusal message still names the cause.
        match map_adb(AdbError::Refused(String::new())) {
            ClientError::Connection(message) => assert_eq!(message, "refused"),
            other => panic!("unexpected mapping: {other:?}"),
        }
        assert!(matches!(
            map_adb(AdbError::DeviceState {
                state: "offline".into()
            }),
            ClientError::Connection(_)
        ));
    }

    #[test]
    fn adb_timeout_and_protocol_mapping() {
        assert!(matches!(map_adb(AdbError::Timeout), ClientError::Timeout));
        assert!(matches!(
            map_adb(AdbError::CommandFailed("boom".into())),
            ClientError::Protocol(_)
        ));
    }

    #[tokio::test]
    async fn discovery_without_key_degrades_to_config_error() {
        let provider = ShodanDiscovery::new("");
        let result = provider.search("product:adb").await;
        assert!(matches!(result, Err(DiscoveryError::Config(_))));
    }
}
