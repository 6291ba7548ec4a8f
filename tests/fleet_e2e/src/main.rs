fn main() {
    println!("Run `cargo test -p fleet-e2e` to execute fleet pipeline tests.");
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use adbherd_fleet::{
        ClientError, ConnectionState, DiscoveryError, DiscoveryProvider, EndpointClient,
        EndpointId, EventKind, FleetManager,
    };

    /// Discovery provider answering from a fixed list.
    struct ScriptedProvider {
        addresses: Vec<String>,
    }

    impl ScriptedProvider {
        fn new(addresses: &[&str]) -> Self {
            Self {
                addresses: addresses.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl DiscoveryProvider for ScriptedProvider {
        fn search(
            &self,
            _query: &str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, DiscoveryError>> + Send + '_>>
        {
            let addresses = self.addresses.clone();
            Box::pin(async move { Ok(addresses) })
        }
    }

    /// Endpoint client with per-address refusals and a scripted run output.
    struct ScriptedClient {
        refuse: HashSet<String>,
        output: String,
        runs: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClient {
        fn new(output: &str) -> Self {
            Self {
                refuse: HashSet::new(),
                output: output.to_string(),
                runs: Mutex::new(Vec::new()),
            }
        }

        fn refusing(mut self, addrs: &[&str]) -> Self {
            self.refuse = addrs.iter().map(|s| s.to_string()).collect();
            self
        }

        fn run_count(&self) -> usize {
            self.runs.lock().unwrap().len()
        }
    }

    impl EndpointClient for ScriptedClient {
        fn connect(
            &self,
            addr: &str,
        ) -> Pin<Box<dyn Future<Output = Result<(), ClientError>> + Send + '_>> {
            let refused = self.refuse.contains(addr);
            Box::pin(async move {
                if refused {
                    Err(ClientError::Connection("refused".into()))
                } else {
                    Ok(())
                }
            })
        }

        fn run(
            &self,
            addr: &str,
            command: &str,
        ) -> Pin<Box<dyn Future<Output = Result<String, ClientError>> + Send + '_>> {
            self.runs
                .lock()
                .unwrap()
                .push((addr.to_string(), command.to_string()));
            let output = self.output.clone();
            Box::pin(async move { Ok(output) })
        }
    }

    fn fleet(provider: ScriptedProvider, client: ScriptedClient) -> (FleetManager, Arc<ScriptedClient>) {
        let client = Arc::new(client);
        let manager = FleetManager::new(Arc::new(provider), client.clone(), "product:adb");
        (manager, client)
    }

    /// Polls until `done` returns true or a second has passed.
    async fn wait_until(done: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached within 1s");
    }

    fn id(addr: &str) -> EndpointId {
        EndpointId::parse(addr).unwrap()
    }

    #[tokio::test]
    async fn scan_then_broadcast_device_model() {
        let (manager, _client) = fleet(
            ScriptedProvider::new(&["10.0.0.1:5555", "10.0.0.2:5555"]),
            ScriptedClient::new("Pixel"),
        );

        manager.scan();
        let registry = manager.registry();
        wait_until(|| registry.connected_ids().len() == 2).await;

        manager.broadcast("getprop ro.product.model");
        wait_until(|| {
            manager
                .snapshot()
                .iter()
                .all(|r| r.last_output.as_deref() == Some("Pixel"))
        })
        .await;

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.len(), 2);
        for record in &snapshot {
            assert!(record.state.is_connected());
            assert_eq!(record.last_output.as_deref(), Some("Pixel"));
        }
    }

    #[tokio::test]
    async fn no_endpoint_left_connecting_after_scan() {
        let (manager, _client) = fleet(
            ScriptedProvider::new(&["10.0.0.1:5555", "10.0.0.2:5555", "10.0.0.3:5555"]),
            ScriptedClient::new("OK").refusing(&["10.0.0.2:5555"]),
        );

        manager.scan();
        let registry = manager.registry();
        wait_until(|| {
            let snap = registry.snapshot();
            snap.len() == 3 && snap.iter().all(|r| !r.state.is_connecting())
        })
        .await;

        for record in manager.snapshot() {
            assert!(
                matches!(
                    record.state,
                    ConnectionState::Connected
                        | ConnectionState::Failed(_)
                        | ConnectionState::Errored(_)
                ),
                "{}: unexpected state {:?}",
                record.id,
                record.state
            );
        }
    }

    #[tokio::test]
    async fn refused_endpoint_never_appears_connected() {
        let (manager, _client) = fleet(
            ScriptedProvider::new(&["10.0.0.1:5555"]),
            ScriptedClient::new("OK").refusing(&["10.0.0.1:5555"]),
        );

        manager.scan();
        let registry = manager.registry();
        wait_until(|| {
            matches!(
                registry.get(&id("10.0.0.1:5555")).map(|r| r.state),
                Some(ConnectionState::Failed(_))
            )
        })
        .await;

        let record = manager.registry().get(&id("10.0.0.1:5555")).unwrap();
        assert_eq!(record.state, ConnectionState::Failed("refused".into()));
        assert!(
            manager.snapshot().iter().all(|r| !r.state.is_connected()),
            "a refused endpoint must not show up as connected"
        );
    }

    #[tokio::test]
    async fn broadcast_with_nothing_connected_is_a_noop() {
        let (manager, client) = fleet(ScriptedProvider::new(&[]), ScriptedClient::new("OK"));

        manager.broadcast("echo");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(client.run_count(), 0);
    }

    #[tokio::test]
    async fn broadcast_produces_one_output_per_endpoint() {
        let (manager, client) = fleet(
            ScriptedProvider::new(&["10.0.0.1:5555", "10.0.0.2:5555", "10.0.0.3:5555"]),
            ScriptedClient::new("OK"),
        );

        manager.scan();
        let registry = manager.registry();
        wait_until(|| registry.connected_ids().len() == 3).await;
        manager.drain_events();

        manager.broadcast("echo");
        wait_until(|| client.run_count() == 3).await;
        wait_until(|| {
            manager
                .snapshot()
                .iter()
                .all(|r| r.last_output.as_deref() == Some("OK"))
        })
        .await;

        let events = manager.drain_events();
        let outputs = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Output { .. }))
            .count();
        assert_eq!(outputs, 3);
    }

    #[tokio::test]
    async fn drain_with_no_new_events_is_empty() {
        let (manager, _client) = fleet(
            ScriptedProvider::new(&["10.0.0.1:5555"]),
            ScriptedClient::new("OK"),
        );

        manager.scan();
        let registry = manager.registry();
        wait_until(|| registry.connected_ids().len() == 1).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!manager.drain_events().is_empty());
        assert!(manager.drain_events().is_empty());
    }

    #[tokio::test]
    async fn overlapping_scans_settle_to_one_record_per_address() {
        let (manager, _client) = fleet(
            ScriptedProvider::new(&["10.0.0.1:5555", "10.0.0.2:5555"]),
            ScriptedClient::new("OK"),
        );

        manager.scan();
        manager.scan();
        let registry = manager.registry();
        wait_until(|| registry.connected_ids().len() == 2).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|r| r.state.is_connected()));
    }
}
