//! Event bus carrying status events from background workers to the
//! presentation layer.

use std::sync::Mutex;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::types::{EventKind, FleetEvent};

/// Unbounded FIFO channel from background tasks to the render loop.
///
/// `publish` never blocks a producer. `drain` is single-consumer by contract:
/// only the presentation layer drains, once per render tick.
#[derive(Debug)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<FleetEvent>,
    rx: Mutex<mpsc::UnboundedReceiver<FleetEvent>>,
}

impl EventBus {
    /// Creates an open bus.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Publishes an event, stamping it with the current time.
    ///
    /// After [`close`](Self::close) the event is dropped silently.
    pub fn publish(&self, kind: EventKind) {
        let event = FleetEvent {
            at: Utc::now(),
            kind,
        };
        if let Err(err) = self.tx.send(event) {
            debug!(event = %err.0.kind, "event bus closed, dropping event");
        }
    }

    /// Returns all buffered events in arrival order and empties the buffer.
    pub fn drain(&self) -> Vec<FleetEvent> {
        let mut rx = self.rx.lock().unwrap();
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Closes the bus. Later publishes become silent drops.
    pub fn close(&self) {
        self.rx.lock().unwrap().close();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
