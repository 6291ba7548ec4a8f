//! Core types for the fleet engine.

use std::fmt;

use chrono::{DateTime, Utc};

/// Identity of a remote endpoint: its `host:port` address.
///
/// Immutable once created; the unique key into the [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(String);

impl EndpointId {
    /// Parses a `host:port` address into an endpoint identity.
    ///
    /// The port must be a valid u16; surrounding whitespace is trimmed.
    pub fn parse(addr: &str) -> Result<Self, InvalidEndpoint> {
        let trimmed = addr.trim();
        match trimmed.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(InvalidEndpoint(trimmed.to_string())),
        }
    }

    /// The `host:port` address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An address that is not a valid `host:port` pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid endpoint address: {0:?}")]
pub struct InvalidEndpoint(pub String);

/// Connection state of a single endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Discovered but no connect attempt made yet.
    Unknown,
    /// Connect attempt in flight.
    Connecting,
    /// Connected and answering.
    Connected,
    /// The remote refused or never answered the connect.
    Failed(String),
    /// The connect attempt itself misbehaved (protocol error, timeout).
    Errored(String),
}

impl ConnectionState {
    /// Whether the endpoint is a valid broadcast target.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Whether a connect attempt is currently in flight.
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Unknown => write!(f, "UNKNOWN"),
            ConnectionState::Connecting => write!(f, "CONNECTING"),
            ConnectionState::Connected => write!(f, "CONNECTED"),
            ConnectionState::Failed(reason) => write!(f, "FAILED: {reason}"),
            ConnectionState::Errored(reason) => write!(f, "ERROR: {reason}"),
        }
    }
}

/// Everything the fleet knows about one endpoint.
///
/// Created on first discovery or first connect attempt, mutated in place by
/// connect and broadcast tasks, never deleted within a session.
#[derive(Debug, Clone)]
pub struct EndpointRecord {
    pub id: EndpointId,
    pub state: ConnectionState,
    /// Output of the most recent broadcast command, or the error it produced.
    pub last_output: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl EndpointRecord {
    /// Creates a fresh record in the Unknown state.
    pub fn new(id: EndpointId) -> Self {
        Self {
            id,
            state: ConnectionState::Unknown,
            last_output: None,
            last_updated: Utc::now(),
        }
    }
}

/// A status event published by a background task.
#[derive(Debug, Clone)]
pub struct FleetEvent {
    /// When the event was published.
    pub at: DateTime<Utc>,
    pub kind: EventKind,
}

/// What happened.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// General progress message.
    Info(String),
    /// Discovery returned this candidate.
    Found(EndpointId),
    /// A connect attempt started.
    Attempt(EndpointId),
    /// A connect attempt succeeded.
    Success(EndpointId),
    /// A broadcast command produced output on this endpoint.
    Output { id: EndpointId, text: String },
    /// Something went wrong, attributed to an endpoint when one is involved.
    Error {
        id: Option<EndpointId>,
        message: String,
    },
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Info(msg) => f.write_str(msg),
            EventKind::Found(id) => write!(f, "found potential target: {id}"),
            EventKind::Attempt(id) => write!(f, "attempting to connect to {id}"),
            EventKind::Success(id) => write!(f, "successfully connected to {id}"),
            EventKind::Output { id, text } => write!(f, "output from {id}: {text}"),
            EventKind::Error {
                id: Some(id),
                message,
            } => write!(f, "error on {id}: {message}"),
            EventKind::Error { id: None, message } => f.write_str(message),
        }
    }
}
