//! Endpoint registry — the single source of truth for fleet state.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::types::{ConnectionState, EndpointId, EndpointRecord};

/// Thread-safe map from endpoint identity to its record.
///
/// All mutation happens under one write guard, so readers never observe a
/// partially-written record. Records are created on first sight and never
/// removed within a session.
#[derive(Debug, Default)]
pub struct Registry {
    records: RwLock<HashMap<EndpointId, EndpointRecord>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically creates-or-updates the record for `id`.
    ///
    /// Stamps `last_updated` and returns a copy of the updated record.
    pub fn upsert<F>(&self, id: &EndpointId, mutate: F) -> EndpointRecord
    where
        F: FnOnce(&mut EndpointRecord),
    {
        let mut records = self.records.write().unwrap();
        let record = records
            .entry(id.clone())
            .or_insert_with(|| EndpointRecord::new(id.clone()));
        mutate(record);
        record.last_updated = Utc::now();
        record.clone()
    }

    /// Returns the current record for `id`, if any.
    pub fn get(&self, id: &EndpointId) -> Option<EndpointRecord> {
        self.records.read().unwrap().get(id).cloned()
    }

    /// Claims `id` for a connect attempt.
    ///
    /// Creates the record if missing and transitions it to Connecting,
    /// returning true. Returns false when the endpoint is already Connecting
    /// or Connected, so overlapping scans never double-connect. Failed and
    /// Errored endpoints are claimable again (retry on rescan).
    pub fn begin_connect(&self, id: &EndpointId) -> bool {
        let mut records = self.records.write().unwrap();
        let record = records
            .entry(id.clone())
            .or_insert_with(|| EndpointRecord::new(id.clone()));
        match record.state {
            ConnectionState::Connecting | ConnectionState::Connected => false,
            _ => {
                record.state = ConnectionState::Connecting;
                record.last_updated = Utc::now();
                true
            }
        }
    }

    /// Returns a copy of all records, ordered by endpoint address.
    pub fn snapshot(&self) -> Vec<EndpointRecord> {
        let mut records: Vec<EndpointRecord> =
            self.records.read().unwrap().values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    /// Identities of all currently connected endpoints.
    pub fn connected_ids(&self) -> Vec<EndpointId> {
        self.records
            .read()
            .unwrap()
            .values()
            .filter(|r| r.state.is_connected())
            .map(|r| r.id.clone())
            .collect()
    }

    /// Number of known endpoints.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether no endpoint has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }
}
