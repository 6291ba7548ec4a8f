//! Fleet engine for adbherd.
//!
//! Discovers candidate endpoints through a [`DiscoveryProvider`], connects to
//! each one concurrently through an [`EndpointClient`], and broadcasts
//! commands to the connected fleet. State lives in the [`Registry`]; progress
//! surfaces as [`FleetEvent`]s on the [`EventBus`].

pub mod bus;
pub mod endpoint;
pub mod manager;
pub mod registry;
pub mod types;

pub use bus::EventBus;
pub use endpoint::{ClientError, DiscoveryError, DiscoveryProvider, EndpointClient};
pub use manager::FleetManager;
pub use registry::Registry;
pub use types::{
    ConnectionState, EndpointId, EndpointRecord, EventKind, FleetEvent, InvalidEndpoint,
};
