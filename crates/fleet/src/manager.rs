//! Fleet manager orchestrating discovery, connection, and broadcast.
//!
//! Every network operation runs in its own spawned task; the methods the UI
//! drives return immediately. Connect tasks are bulkhead-isolated: they share
//! nothing mutable except the registry, so one endpoint failing never affects
//! another.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bus::EventBus;
use crate::endpoint::{ClientError, DiscoveryProvider, EndpointClient};
use crate::registry::Registry;
use crate::types::{ConnectionState, EndpointId, EndpointRecord, EventKind, FleetEvent};

/// Orchestrates the discovery → connect → broadcast pipeline.
///
/// Owns the [`Registry`] and the [`EventBus`]; exposes the control surface
/// the presentation layer drives.
pub struct FleetManager {
    registry: Arc<Registry>,
    bus: Arc<EventBus>,
    provider: Arc<dyn DiscoveryProvider>,
    client: Arc<dyn EndpointClient>,
    query: String,
    cancel: CancellationToken,
}

impl FleetManager {
    /// Creates a manager with an empty registry and an open bus.
    pub fn new(
        provider: Arc<dyn DiscoveryProvider>,
        client: Arc<dyn EndpointClient>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            bus: Arc::new(EventBus::new()),
            provider,
            client,
            query: query.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// The registry handle, for callers that need direct reads.
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Copy of all endpoint records, ordered by address.
    pub fn snapshot(&self) -> Vec<EndpointRecord> {
        self.registry.snapshot()
    }

    /// All events published since the last drain, in arrival order.
    pub fn drain_events(&self) -> Vec<FleetEvent> {
        self.bus.drain()
    }

    /// Starts a discovery-and-connect pass in the background.
    ///
    /// Reentrant: a scan while a previous one is still resolving simply adds
    /// more connect tasks. Endpoints already Connecting or Connected are
    /// skipped; Failed and Errored endpoints are retried.
    pub fn scan(&self) {
        let registry = self.registry.clone();
        let bus = self.bus.clone();
        let provider = self.provider.clone();
        let client = self.client.clone();
        let query = self.query.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            bus.publish(EventKind::Info(format!("searching for '{query}'")));

            let addresses = tokio::select! {
                result = provider.search(&query) => match result {
                    Ok(addresses) => addresses,
                    Err(err) => {
                        warn!(error = %err, "discovery failed");
                        bus.publish(EventKind::Error {
                            id: None,
                            message: format!("discovery failed: {err}"),
                        });
                        return;
                    }
                },
                _ = cancel.cancelled() => return,
            };

            info!(candidates = addresses.len(), "discovery complete");

            let mut dispatched = 0usize;
            for addr in addresses {
                let id = match EndpointId::parse(&addr) {
                    Ok(id) => id,
                    Err(err) => {
                        bus.publish(EventKind::Error {
                            id: None,
                            message: err.to_string(),
                        });
                        continue;
                    }
                };
                bus.publish(EventKind::Found(id.clone()));

                if !registry.begin_connect(&id) {
                    debug!(endpoint = %id, "already connecting or connected, skipping");
                    continue;
                }
                dispatched += 1;

                let registry = registry.clone();
                let bus = bus.clone();
                let client = client.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    Self::connect_one(&registry, &bus, client.as_ref(), &id, &cancel).await;
                });
            }

            bus.publish(EventKind::Info(format!(
                "scan dispatched {dispatched} connect attempt(s)"
            )));
        });
    }

    /// One connect attempt. The caller has already claimed the record via
    /// `begin_connect`, so this task owns the Connecting → terminal move.
    async fn connect_one(
        registry: &Registry,
        bus: &EventBus,
        client: &dyn EndpointClient,
        id: &EndpointId,
        cancel: &CancellationToken,
    ) {
        bus.publish(EventKind::Attempt(id.clone()));

        let result = tokio::select! {
            result = client.connect(id.as_str()) => result,
            _ = cancel.cancelled() => {
                debug!(endpoint = %id, "connect abandoned on shutdown");
                return;
            }
        };

        match result {
            Ok(()) => {
                registry.upsert(id, |r| r.state = ConnectionState::Connected);
                info!(endpoint = %id, "connected");
                bus.publish(EventKind::Success(id.clone()));
            }
            Err(err) => {
                let state = match &err {
                    ClientError::Connection(reason) => ConnectionState::Failed(reason.clone()),
                    other => ConnectionState::Errored(other.to_string()),
                };
                warn!(endpoint = %id, error = %err, "connect failed");
                registry.upsert(id, |r| r.state = state);
                bus.publish(EventKind::Error {
                    id: Some(id.clone()),
                    message: err.to_string(),
                });
            }
        }
    }

    /// Broadcasts `command` to every connected endpoint in the background.
    ///
    /// One execute task per endpoint, none waiting on another. A failed
    /// command leaves the endpoint Connected — command failures and
    /// connection failures are distinct concerns. With zero connected
    /// endpoints this returns without spawning anything.
    pub fn broadcast(&self, command: &str) {
        let targets = self.registry.connected_ids();
        if targets.is_empty() {
            self.bus
                .publish(EventKind::Info("no connected endpoints".into()));
            return;
        }

        self.bus.publish(EventKind::Info(format!(
            "executing on {} endpoint(s): {command}",
            targets.len()
        )));

        for id in targets {
            let registry = self.registry.clone();
            let bus = self.bus.clone();
            let client = self.client.clone();
            let cancel = self.cancel.clone();
            let command = command.to_string();
            tokio::spawn(async move {
                Self::run_one(&registry, &bus, client.as_ref(), &id, &command, &cancel).await;
            });
        }
    }

    /// One command execution against one endpoint.
    async fn run_one(
        registry: &Registry,
        bus: &EventBus,
        client: &dyn EndpointClient,
        id: &EndpointId,
        command: &str,
        cancel: &CancellationToken,
    ) {
        let result = tokio::select! {
            result = client.run(id.as_str(), command) => result,
            _ = cancel.cancelled() => {
                debug!(endpoint = %id, "command abandoned on shutdown");
                return;
            }
        };

        match result {
            Ok(output) => {
                registry.upsert(id, |r| r.last_output = Some(output.clone()));
                bus.publish(EventKind::Output {
                    id: id.clone(),
                    text: output,
                });
            }
            Err(err) => {
                warn!(endpoint = %id, error = %err, "command failed");
                registry.upsert(id, |r| {
                    r.last_output = Some(format!("command error: {err}"))
                });
                bus.publish(EventKind::Error {
                    id: Some(id.clone()),
                    message: err.to_string(),
                });
            }
        }
    }

    /// Cancels outstanding work and closes the event bus.
    ///
    /// In-flight network calls are abandoned, not awaited.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.bus.close();
        info!("fleet manager shut down");
    }
}
