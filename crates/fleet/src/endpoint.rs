//! Collaborator traits at the engine's seams.
//!
//! `DiscoveryProvider` and `EndpointClient` are implemented by the app on top
//! of the concrete discovery and adb crates. Using traits keeps the engine
//! decoupled from transport and testable with mocks.

use std::future::Future;
use std::pin::Pin;

/// Errors from the discovery layer.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("search API error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from a single-endpoint connect or run.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The remote was unreachable or refused the connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The remote answered with something unexpected.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The operation did not finish within the client's deadline.
    #[error("timed out")]
    Timeout,
}

/// Search service returning candidate endpoint addresses.
pub trait DiscoveryProvider: Send + Sync {
    /// Searches for candidate endpoints, returning `host:port` address strings.
    fn search(
        &self,
        query: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DiscoveryError>> + Send + '_>>;
}

/// Connect/run primitives against a single remote endpoint.
///
/// Implementations own their timeout policy; both calls must eventually
/// return rather than hang.
pub trait EndpointClient: Send + Sync {
    /// Establishes a connection to the endpoint at `addr`.
    fn connect(
        &self,
        addr: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), ClientError>> + Send + '_>>;

    /// Runs `command` on the endpoint at `addr` and returns its output.
    fn run(
        &self,
        addr: &str,
        command: &str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ClientError>> + Send + '_>>;
}
